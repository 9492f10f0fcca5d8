//! CLI module - argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod helpers;
pub mod output;
pub mod report;

pub use args::{Cli, Commands, GlobalOpts, OutputFormat};

use miette::Result;
use tracing_subscriber::EnvFilter;

use crate::core::planner::Planner;
use crate::core::Config;

/// Install the stderr log subscriber
///
/// `RUST_LOG` takes precedence; otherwise `-v`/`-vv` raise the level from
/// warn to info/debug.
pub fn init_logging(verbosity: u8) -> Result<()> {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| miette::miette!("Failed to initialise logging: {}", e))
}

/// Load layered configuration and build a planner from it
pub fn load_planner(global: &GlobalOpts) -> Result<Planner> {
    let config = Config::load(global.config.as_deref())?;
    Ok(Planner::from_config(&config))
}

/// Run the parsed command line
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Plan(args) => commands::plan::run(args, &cli.global),
        Commands::Classify(args) => commands::classify::run(args, &cli.global),
        Commands::Batch(args) => commands::batch::run(args, &cli.global),
        Commands::Profiles(args) => commands::profiles::run(args, &cli.global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
