use shellforge::catalog::{Module, ModuleCatalog, ModuleKind};
use shellforge::error::ShellForgeError;
use shellforge::leaderboard::{Bracket, Leaderboard};
use shellforge::search::{
    DrawStrategy, ProgressCallback, SearchOptions, SearchParams, ShellSearch, Silent,
};
use shellforge::shell::{DamageType, Shell};
use std::sync::atomic::{AtomicUsize, Ordering};

fn zero_length_catalog() -> ModuleCatalog {
    let module = |name: &str, kind| Module {
        name: name.to_string(),
        kind,
        max_length: 0.0,
        ..Default::default()
    };
    ModuleCatalog::new(vec![
        module("Ghost head", ModuleKind::Head),
        module("Ghost body A", ModuleKind::Body),
        module("Ghost body B", ModuleKind::Body),
    ])
}

fn base_params() -> SearchParams {
    SearchParams {
        min_gauge: 100,
        max_gauge: 100,
        heads: vec![0],
        base: None,
        fixed_counts: vec![],
        fixed_total: 0,
        variable: [1, 2],
        max_gp: 0.0,
        max_rg: 0,
        max_length: 1000.0,
        max_draw: 0.0,
        min_velocity: 0.0,
        min_range: 0.0,
        target_ac: 10.0,
        damage_type: DamageType::Kinetic,
        labels: true,
    }
}

fn standard_params() -> SearchParams {
    SearchParams {
        min_gauge: 120,
        max_gauge: 124,
        heads: vec![6, 7],
        fixed_total: 16,
        variable: [0, 1],
        max_gp: 0.4,
        max_rg: 2,
        max_length: 8000.0,
        max_draw: 2000.0,
        min_velocity: 250.0,
        target_ac: 8.0,
        ..base_params()
    }
}

fn sequential() -> SearchOptions {
    SearchOptions::default()
}

fn same_shell(a: &Shell<'_>, b: &Shell<'_>) -> bool {
    a.gauge() == b.gauge()
        && a.head() == b.head()
        && a.body_counts() == b.body_counts()
        && a.gp_casings() == b.gp_casings()
        && a.rg_casings() == b.rg_casings()
        && a.rail_draw() == b.rail_draw()
}

fn assert_same_boards(a: &Leaderboard<Shell<'_>>, b: &Leaderboard<Shell<'_>>) {
    for bracket in Bracket::ALL {
        match (a.get(bracket), b.get(bracket)) {
            (None, None) => {}
            (Some(x), Some(y)) => {
                assert_eq!(x.score, y.score, "{}", bracket);
                assert!(same_shell(&x.item, &y.item), "{}", bracket);
            }
            _ => panic!("bracket {} occupied in only one board", bracket),
        }
    }
}

#[test]
fn test_zero_length_modules_count_every_split() {
    let catalog = zero_length_catalog();
    let params = SearchParams {
        min_gauge: 500,
        max_gauge: 500,
        ..base_params()
    };
    let search = ShellSearch::new(&catalog, params).unwrap();
    let outcome = search.run(&sequential(), &Silent).unwrap();

    assert_eq!(outcome.stats.rejected_length, 0);
    assert_eq!(outcome.stats.comparisons, 231);
    assert_eq!(outcome.stats.total(), 231);
    // No propellant means zero velocity and zero score everywhere.
    assert!(outcome.leaderboard.is_empty());
    assert!(!outcome.cancelled);
}

#[test]
fn test_every_candidate_is_counted_once() {
    let catalog = ModuleCatalog::standard();
    let params = SearchParams {
        max_length: 400.0,
        min_range: 4000.0,
        ..standard_params()
    };
    let search = ShellSearch::new(&catalog, params).unwrap();
    let outcome = search.run(&sequential(), &Silent).unwrap();

    assert_eq!(outcome.stats.candidates(), search.space().total_tuples());
    assert!(outcome.stats.rejected_length > 0);
}

#[test]
fn test_parallel_matches_sequential() {
    let catalog = ModuleCatalog::standard();
    let search = ShellSearch::new(&catalog, standard_params()).unwrap();

    let one = search.run(&sequential(), &Silent).unwrap();
    let many = search
        .run(
            &SearchOptions {
                num_threads: 4,
                ..SearchOptions::default()
            },
            &Silent,
        )
        .unwrap();

    assert_eq!(one.stats, many.stats);
    assert!(!one.leaderboard.is_empty());
    assert_same_boards(&one.leaderboard, &many.leaderboard);
}

#[test]
fn test_draw_results_respect_limits() {
    let catalog = ModuleCatalog::standard();
    let params = standard_params();
    let search = ShellSearch::new(&catalog, params.clone()).unwrap();
    let outcome = search.run(&sequential(), &Silent).unwrap();

    assert!(outcome.stats.comparisons > 0);
    for (bracket, entry) in outcome.leaderboard.iter() {
        let shell = &entry.item;
        let s = shell.stats();
        assert!(entry.score > 0.0);
        assert!(shell.rail_draw() <= params.max_draw);
        assert!(shell.rail_draw() <= s.max_draw);
        assert!(s.velocity >= params.min_velocity, "{}", bracket);
        assert!(s.total_length <= bracket.max_length());
        assert_eq!(shell.rail_draw().fract(), 0.0);
    }
}

#[test]
fn test_bisection_matches_exhaustive_scores() {
    let catalog = ModuleCatalog::standard();
    let params = SearchParams {
        max_gauge: 121,
        heads: vec![6],
        max_gp: 0.2,
        max_rg: 1,
        max_draw: 1200.0,
        ..standard_params()
    };
    let search = ShellSearch::new(&catalog, params).unwrap();

    let bisected = search.run(&sequential(), &Silent).unwrap();
    let scanned = search
        .run(
            &SearchOptions {
                draw_strategy: DrawStrategy::Exhaustive,
                ..SearchOptions::default()
            },
            &Silent,
        )
        .unwrap();

    assert_eq!(bisected.stats, scanned.stats);
    for bracket in Bracket::ALL {
        let b = bisected.leaderboard.get(bracket).map_or(0.0, |e| e.score);
        let e = scanned.leaderboard.get(bracket).map_or(0.0, |e| e.score);
        assert!(b >= e * (1.0 - 1e-9), "{}: {} vs {}", bracket, b, e);
    }
}

#[test]
fn test_unreachable_velocity_counts_as_velocity_rejection() {
    let catalog = ModuleCatalog::standard();
    let params = SearchParams {
        min_velocity: 1.0e7,
        ..standard_params()
    };
    let search = ShellSearch::new(&catalog, params).unwrap();
    let outcome = search.run(&sequential(), &Silent).unwrap();

    assert_eq!(outcome.stats.comparisons, 0);
    assert_eq!(outcome.stats.rejected_range, 0);
    assert!(outcome.stats.rejected_velocity > 0);
    assert!(outcome.leaderboard.is_empty());
}

#[test]
fn test_no_draw_path_rejects_slow_shells() {
    let catalog = ModuleCatalog::standard();
    let params = SearchParams {
        max_draw: 0.0,
        min_velocity: 400.0,
        ..standard_params()
    };
    let search = ShellSearch::new(&catalog, params).unwrap();
    let outcome = search.run(&sequential(), &Silent).unwrap();

    // Shells without GP casings have no velocity at all.
    assert!(outcome.stats.rejected_velocity > 0);
    for (_, entry) in outcome.leaderboard.iter() {
        assert!(entry.item.stats().velocity >= 400.0);
        assert_eq!(entry.item.rail_draw(), 0.0);
    }
}

#[test]
fn test_no_draw_path_rejects_short_range_shells() {
    let catalog = ModuleCatalog::standard();
    let params = SearchParams {
        max_draw: 0.0,
        min_velocity: 0.0,
        min_range: 1.0e9,
        ..standard_params()
    };
    let search = ShellSearch::new(&catalog, params).unwrap();
    let outcome = search.run(&sequential(), &Silent).unwrap();

    assert_eq!(outcome.stats.rejected_range, search.space().total_tuples());
    assert_eq!(outcome.stats.rejected_velocity, 0);
    assert_eq!(outcome.stats.comparisons, 0);
    // Range rejections stay out of the total.
    assert_eq!(outcome.stats.total(), outcome.stats.rejected_length);
    assert!(outcome.leaderboard.is_empty());
}

#[test]
fn test_overflowing_fixed_counts_are_rejected() {
    let catalog = ModuleCatalog::standard();
    let mut fixed_counts = vec![0; catalog.len()];
    fixed_counts[3] = u32::MAX;
    fixed_counts[0] = 1;
    let params = SearchParams {
        fixed_counts,
        fixed_total: 5,
        ..standard_params()
    };
    assert!(matches!(
        ShellSearch::new(&catalog, params),
        Err(ShellForgeError::Validation(_))
    ));
}

#[test]
fn test_chemical_search_scores_payload() {
    let catalog = ModuleCatalog::standard();
    let params = SearchParams {
        heads: vec![9],
        variable: [2, 3],
        damage_type: DamageType::Chemical,
        ..standard_params()
    };
    let search = ShellSearch::new(&catalog, params).unwrap();
    let outcome = search.run(&sequential(), &Silent).unwrap();

    let (_, best) = outcome.leaderboard.iter().next().unwrap();
    assert!(best.score > 0.0);
    assert!(best.item.stats().chem_damage > 0.0);
}

#[test]
fn test_invalid_module_reference_is_rejected() {
    let catalog = ModuleCatalog::standard();
    let params = SearchParams {
        variable: [0, 40],
        ..standard_params()
    };
    assert!(matches!(
        ShellSearch::new(&catalog, params),
        Err(ShellForgeError::Validation(_))
    ));

    let params = SearchParams {
        fixed_counts: vec![5],
        fixed_total: 2,
        ..standard_params()
    };
    assert!(matches!(
        ShellSearch::new(&catalog, params),
        Err(ShellForgeError::Validation(_))
    ));
}

#[test]
fn test_empty_ranges_produce_empty_results() {
    let catalog = ModuleCatalog::standard();
    let params = SearchParams {
        min_gauge: 300,
        max_gauge: 200,
        ..standard_params()
    };
    let search = ShellSearch::new(&catalog, params).unwrap();
    let outcome = search.run(&sequential(), &Silent).unwrap();
    assert_eq!(outcome.stats.candidates(), 0);
    assert!(outcome.leaderboard.is_empty());
    assert_eq!(outcome.partitions_completed, 0);
}

struct StopAfter {
    limit: usize,
    seen: AtomicUsize,
}

impl ProgressCallback for StopAfter {
    fn on_partition(&self, _head: &str, _gauge: u32, _index: usize, _total: usize) -> bool {
        self.seen.fetch_add(1, Ordering::SeqCst) < self.limit
    }
}

#[test]
fn test_callback_can_cancel() {
    let catalog = ModuleCatalog::standard();
    let search = ShellSearch::new(&catalog, standard_params()).unwrap();
    let stop = StopAfter {
        limit: 3,
        seen: AtomicUsize::new(0),
    };

    let outcome = search.run(&sequential(), &stop).unwrap();
    assert!(outcome.cancelled);
    assert_eq!(outcome.partitions_completed, 3);
    assert_eq!(
        outcome.stats.candidates(),
        3 * search.space().tuples_per_partition()
    );
}

#[test]
fn test_zero_time_limit_searches_nothing() {
    let catalog = ModuleCatalog::standard();
    let search = ShellSearch::new(&catalog, standard_params()).unwrap();
    let options = SearchOptions {
        max_time: Some(std::time::Duration::ZERO),
        ..SearchOptions::default()
    };
    let outcome = search.run(&options, &Silent).unwrap();
    assert!(outcome.cancelled);
    assert_eq!(outcome.partitions_completed, 0);
}
