use super::draw::{optimal_draw, DrawStrategy, DrawWindow};
use super::params::SearchParams;
use super::permutations::{ModuleCountTuple, Partition, PermutationSpace};
use crate::catalog::ModuleCatalog;
use crate::config::Config;
use crate::error::SfResult;
use crate::leaderboard::Leaderboard;
use crate::shell::Shell;
use crate::stats::RunStats;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct SearchOptions {
    /// Worker threads. 1 runs on the calling thread.
    pub num_threads: usize,
    pub draw_strategy: DrawStrategy,
    pub max_time: Option<Duration>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            num_threads: 1,
            draw_strategy: DrawStrategy::Bisection,
            max_time: None,
        }
    }
}

impl From<&Config> for SearchOptions {
    fn from(cfg: &Config) -> Self {
        let num_threads = match cfg.run.threads {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            n => n,
        };
        Self {
            num_threads,
            draw_strategy: cfg.run.draw_strategy,
            max_time: cfg.run.time_limit.map(Duration::from_secs),
        }
    }
}

/// Receives one call per (head, gauge) partition before it is searched.
/// Returning false cancels the run; partitions already finished are kept.
pub trait ProgressCallback: Send + Sync {
    fn on_partition(&self, head: &str, gauge: u32, index: usize, total: usize) -> bool;
}

/// Callback that never cancels.
pub struct Silent;

impl ProgressCallback for Silent {
    fn on_partition(&self, _head: &str, _gauge: u32, _index: usize, _total: usize) -> bool {
        true
    }
}

pub struct SearchOutcome<'c> {
    pub leaderboard: Leaderboard<Shell<'c>>,
    pub stats: RunStats,
    pub elapsed: Duration,
    pub partitions_completed: usize,
    pub cancelled: bool,
}

/// Exhaustive search over every configuration `params` allows.
pub struct ShellSearch<'c> {
    catalog: &'c ModuleCatalog,
    params: SearchParams,
    space: PermutationSpace,
}

impl<'c> ShellSearch<'c> {
    pub fn new(catalog: &'c ModuleCatalog, params: SearchParams) -> SfResult<Self> {
        params.validate(catalog)?;
        let space = PermutationSpace::from(&params);
        Ok(Self {
            catalog,
            params,
            space,
        })
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn space(&self) -> &PermutationSpace {
        &self.space
    }

    /// Searches every partition and merges the per-partition results in
    /// enumeration order, so the outcome does not depend on `num_threads`.
    pub fn run<CB: ProgressCallback>(
        &self,
        options: &SearchOptions,
        callback: &CB,
    ) -> SfResult<SearchOutcome<'c>> {
        let start = Instant::now();
        let partitions: Vec<Partition> = self.space.partitions().collect();
        let total = partitions.len();
        let deadline = options.max_time.map(|limit| start + limit);
        let cancelled = AtomicBool::new(false);

        info!(
            "🔎 Searching {} partitions ({} candidates) on {} thread(s)",
            total,
            self.space.total_tuples(),
            options.num_threads.max(1)
        );

        let proceed = |index: usize, p: Partition| -> bool {
            if cancelled.load(Ordering::Relaxed) {
                return false;
            }
            let expired = deadline.is_some_and(|d| Instant::now() >= d);
            let go = !expired
                && callback.on_partition(self.catalog.name_of(p.head), p.gauge, index, total);
            if !go {
                cancelled.store(true, Ordering::Relaxed);
            }
            go
        };

        let work = |(index, p): (usize, &Partition)| {
            if proceed(index, *p) {
                Some(self.search_partition(*p, options.draw_strategy))
            } else {
                None
            }
        };

        let results: Vec<Option<(Leaderboard<Shell<'c>>, RunStats)>> =
            if options.num_threads <= 1 {
                partitions.iter().enumerate().map(work).collect()
            } else {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(options.num_threads)
                    .build()?;
                pool.install(|| partitions.par_iter().enumerate().map(work).collect())
            };

        let mut leaderboard = Leaderboard::new();
        let mut stats = RunStats::default();
        let mut partitions_completed = 0;
        for (board, partition_stats) in results.into_iter().flatten() {
            leaderboard.merge(board);
            stats.merge(&partition_stats);
            partitions_completed += 1;
        }

        let outcome = SearchOutcome {
            leaderboard,
            stats,
            elapsed: start.elapsed(),
            partitions_completed,
            cancelled: cancelled.load(Ordering::Relaxed),
        };

        info!(
            "🏁 Search finished in {:.2?}: {} compared, {} too long, {} too slow, {} short range",
            outcome.elapsed,
            stats.comparisons,
            stats.rejected_length,
            stats.rejected_velocity,
            stats.rejected_range
        );
        Ok(outcome)
    }

    /// One (head, gauge) cell. Reuses a single shell for every tuple.
    fn search_partition(
        &self,
        p: Partition,
        strategy: DrawStrategy,
    ) -> (Leaderboard<Shell<'c>>, RunStats) {
        let mut board = Leaderboard::new();
        let mut stats = RunStats::default();
        let mut shell = Shell::new(self.catalog, p.gauge as f64, p.head, self.params.base);

        for tuple in self.space.iter_partition(p) {
            self.evaluate(&mut shell, &tuple, strategy, &mut board, &mut stats);
        }

        debug!(
            "{} {} mm: {} compared, {} rejected",
            self.catalog.name_of(p.head),
            p.gauge,
            stats.comparisons,
            stats.candidates() - stats.comparisons
        );
        (board, stats)
    }

    fn evaluate(
        &self,
        shell: &mut Shell<'c>,
        tuple: &ModuleCountTuple,
        strategy: DrawStrategy,
        board: &mut Leaderboard<Shell<'c>>,
        stats: &mut RunStats,
    ) {
        let p = &self.params;

        shell.set_body_counts(&p.fixed_counts);
        shell.add_body_modules(p.variable[0], tuple.var0);
        shell.add_body_modules(p.variable[1], tuple.var1);
        shell.set_casings(tuple.gp_casings(), tuple.rg as f64);
        shell.set_rail_draw(0.0);

        shell.calculate_lengths();
        let fits = shell.stats().total_length <= p.max_length;
        if !fits {
            stats.reject_length();
            return;
        }

        shell.calculate_modifiers();
        shell.calculate_recoil();

        let scored = if p.uses_draw() {
            self.score_with_draw(shell, strategy, stats)
        } else {
            self.score_without_draw(shell, stats)
        };

        if scored {
            let s = shell.stats();
            board.offer(
                s.total_length,
                s.score(p.damage_type),
                s.belt_score(p.damage_type),
                &*shell,
            );
        }
    }

    /// Picks the best rail draw inside the window allowed by the velocity
    /// and range floors. Leaves `shell` fully computed at that draw.
    fn score_with_draw(
        &self,
        shell: &mut Shell<'c>,
        strategy: DrawStrategy,
        stats: &mut RunStats,
    ) -> bool {
        let p = &self.params;
        shell.calculate_max_draw();
        shell.calculate_reload_time();

        let max_draw = shell.stats().max_draw.min(p.max_draw);
        let floor = shell.minimum_draw(p.min_velocity, p.min_range, max_draw);

        let Some(window) = DrawWindow::new(floor.combined(), max_draw) else {
            if DrawWindow::new(floor.for_velocity, max_draw).is_none() {
                stats.reject_velocity();
            } else {
                stats.reject_range();
            }
            return false;
        };

        stats.record_comparison();
        let optimum = optimal_draw(strategy, window, |draw| {
            shell.score_at_draw(draw as f64, p.damage_type, p.target_ac)
        });

        shell.score_at_draw(optimum.draw as f64, p.damage_type, p.target_ac);
        shell.calculate_effective_range();
        true
    }

    /// Without rail draw the shell either meets both floors or it does not.
    fn score_without_draw(&self, shell: &mut Shell<'c>, stats: &mut RunStats) -> bool {
        let p = &self.params;

        shell.calculate_velocity();
        let fast_enough = shell.stats().velocity >= p.min_velocity;
        if !fast_enough {
            stats.reject_velocity();
            return false;
        }

        shell.calculate_effective_range();
        let reaches = shell.stats().effective_range >= p.min_range;
        if !reaches {
            stats.reject_range();
            return false;
        }

        stats.record_comparison();
        shell.calculate_max_draw();
        shell.calculate_reload_time();
        shell.calculate_volume();
        shell.calculate_damage_chain(p.damage_type, p.target_ac);
        true
    }
}
