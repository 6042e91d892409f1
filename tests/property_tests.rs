use proptest::prelude::*;
use shellforge::leaderboard::{Bracket, Leaderboard};
use shellforge::search::draw::{bisect, scan};
use shellforge::search::{DrawWindow, PermutationSpace, MAX_SLOTS};
use shellforge::stats::RunStats;

// --- STRATEGIES ---

prop_compose! {
    fn arb_space()(
        min_gauge in 18u32..40,
        gauge_span in 0u32..3,
        heads in proptest::collection::vec(0usize..4, 0..3),
        fixed_total in 14u32..22,
        var0 in 0usize..3,
        var1 in 0usize..3,
        max_gp_hundredths in -20i32..150,
        max_rg in 0u32..4
    ) -> PermutationSpace {
        PermutationSpace {
            min_gauge,
            max_gauge: min_gauge + gauge_span,
            heads,
            fixed_total,
            variable: [var0, var1],
            max_gp: max_gp_hundredths as f64 / 100.0,
            max_rg,
        }
    }
}

prop_compose! {
    fn arb_unimodal()(
        min in 0u32..1000,
        width in 0u32..3000,
        peak_offset in -200i64..3200,
        plateau in 0u32..5,
        slope_up in 0.01f64..10.0,
        slope_down in 0.01f64..10.0
    ) -> (DrawWindow, i64, u32, f64, f64) {
        (DrawWindow { min, max: min + width }, min as i64 + peak_offset, plateau, slope_up, slope_down)
    }
}

fn tent(draw: u32, peak: i64, plateau: u32, up: f64, down: f64) -> f64 {
    let d = draw as i64;
    let top = peak + plateau as i64;
    if d < peak {
        -((peak - d) as f64) * up
    } else if d > top {
        -((d - top) as f64) * down
    } else {
        0.0
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_closed_form_count_matches_iteration(space in arb_space()) {
        prop_assert_eq!(space.iter().count() as u64, space.total_tuples());
    }

    #[test]
    fn prop_tuples_respect_slot_and_casing_caps(space in arb_space()) {
        let budget = (MAX_SLOTS as i64 - space.fixed_total as i64).max(0) as u64 * 100;
        let max_gp = (space.max_gp * 100.0).round().max(0.0) as u32;
        let duplicate = space.variable[0] == space.variable[1];

        for t in space.iter() {
            prop_assert!(t.variable_slots_hundredths() <= budget);
            prop_assert!(t.gp_hundredths <= max_gp);
            prop_assert!(t.rg <= space.max_rg);
            prop_assert!(t.gauge >= space.min_gauge && t.gauge <= space.max_gauge);
            if duplicate {
                prop_assert_eq!(t.var1, 0);
            }
        }
    }

    #[test]
    fn prop_tuples_are_unique(space in arb_space()) {
        let mut seen = std::collections::HashSet::new();
        for t in space.iter() {
            prop_assert!(seen.insert(t));
        }
    }

    #[test]
    fn prop_bisection_finds_lowest_maximum((w, peak, plateau, up, down) in arb_unimodal()) {
        let score = |d: u32| tent(d, peak, plateau, up, down);
        let fast = bisect(w, score);
        let slow = scan(w, score);

        prop_assert_eq!(fast.draw, slow.draw);
        prop_assert_eq!(fast.score, slow.score);

        let log2 = ((w.width() as f64) + 1.0).log2().ceil() as u32;
        prop_assert!(fast.evaluations <= 2 * log2 + 5);
    }

    #[test]
    fn prop_leaderboard_scores_never_decrease(
        offers in proptest::collection::vec((0.0f64..9000.0, -5.0f64..50.0, -5.0f64..50.0), 1..60)
    ) {
        let mut board: Leaderboard<usize> = Leaderboard::new();
        let mut best = [0.0f64; 6];

        for (i, &(len, score, belt)) in offers.iter().enumerate() {
            board.offer(len, score, belt, &i);

            for (slot, bracket) in Bracket::ALL.iter().enumerate() {
                let now = board.get(*bracket).map_or(0.0, |e| e.score);
                prop_assert!(now >= best[slot]);
                if let Some(e) = board.get(*bracket) {
                    prop_assert!(e.score > 0.0);
                }
                best[slot] = now;
            }
        }
    }

    #[test]
    fn prop_stats_merge_adds_counters(
        a in (0u64..1000, 0u64..1000, 0u64..1000, 0u64..1000),
        b in (0u64..1000, 0u64..1000, 0u64..1000, 0u64..1000)
    ) {
        let make = |(c, l, v, r): (u64, u64, u64, u64)| RunStats {
            comparisons: c,
            rejected_length: l,
            rejected_velocity: v,
            rejected_range: r,
        };
        let mut merged = make(a);
        merged.merge(&make(b));
        prop_assert_eq!(merged.total(), make(a).total() + make(b).total());
        prop_assert_eq!(merged.rejected_range, a.3 + b.3);
    }
}
