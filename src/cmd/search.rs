use crate::reports;
use clap::Args;
use shellforge::catalog::ModuleCatalog;
use shellforge::config::Config;
use shellforge::error::SfResult;
use shellforge::search::{ProgressCallback, SearchOptions, ShellSearch};
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub config: Config,
}

struct CliProgress {
    max_gauge: u32,
}

impl ProgressCallback for CliProgress {
    fn on_partition(&self, head: &str, gauge: u32, _index: usize, _total: usize) -> bool {
        info!("Testing {} {} mm. Max {} mm.", head, gauge, self.max_gauge);
        true
    }
}

pub fn run(config: Config, catalog: &ModuleCatalog) -> SfResult<()> {
    let params = config.resolve(catalog)?;
    reports::print_parameters(catalog, &params);

    let search = ShellSearch::new(catalog, params)?;
    let options = SearchOptions::from(&config);
    let progress = CliProgress {
        max_gauge: search.params().max_gauge,
    };

    let outcome = search.run(&options, &progress)?;
    if outcome.cancelled {
        warn!(
            "⏱️  Stopped early: {} of {} partitions searched.",
            outcome.partitions_completed,
            search.space().partition_count()
        );
    }

    reports::print_results(catalog, search.params(), &outcome.leaderboard);
    reports::print_statistics(&outcome);
    Ok(())
}
