use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use shellforge::catalog::ModuleCatalog;
use shellforge::config::Config;
use std::path::Path;
use std::process;
use tracing::{error, info, warn, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Module catalog (JSON or CSV). Falls back to the built-in catalog.
    #[arg(global = true, short, long, default_value = "data/modules.json")]
    catalog: String,

    /// JSON parameter file; explicit command-line flags override it.
    #[arg(global = true, short, long)]
    params: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find the best shell per loader length.
    Search(cmd::search::SearchArgs),
    /// List the module catalog.
    Modules(cmd::modules::ModulesArgs),
}

fn load_catalog(path: &str) -> ModuleCatalog {
    if !Path::new(path).exists() {
        warn!("⚠️  Catalog '{}' not found. Using built-in modules.", path);
        return ModuleCatalog::standard();
    }

    info!("📂 Loading Catalog: {}", path);
    ModuleCatalog::load_from_file(path).unwrap_or_else(|e| {
        error!("{}", e);
        process::exit(1);
    })
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚀 Initializing ShellForge...");
    let catalog = load_catalog(&cli.catalog);

    let result = match cli.command {
        Commands::Search(args) => {
            let mut config = args.config.clone();

            if let Some(path) = &cli.params {
                info!("⚖️  Loading Parameters from: {}", path);
                let sub_matches = matches
                    .subcommand_matches("search")
                    .unwrap_or_else(|| process::exit(2));
                match Config::load_from_file(path) {
                    Ok(mut file_config) => {
                        file_config.merge_from_cli(&args.config, sub_matches);
                        config = file_config;
                    }
                    Err(e) => {
                        error!("❌ Failed to load parameters: {}", e);
                        process::exit(1);
                    }
                }
            }

            cmd::search::run(config, &catalog)
        }
        Commands::Modules(args) => cmd::modules::run(args, &catalog),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
