//! Priority tuner CLI - tabular RL controller for integer priority knobs
//!
//! This CLI provides:
//! - Simulated tuning runs against a synthetic performance surface
//! - Printing and validating agent configurations

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "priority-tuner")]
#[command(version, about = "Q-learning / SARSA tuner for priority knobs", long_about = None)]
struct Cli {
    /// Log every control cycle
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the agent against a synthetic performance surface
    Run(Box<priority_tuner::cli::commands::run::RunArgs>),

    /// Print the default configuration or validate a config file
    Config(priority_tuner::cli::commands::config::ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run(args) => priority_tuner::cli::commands::run::execute(*args),
        Commands::Config(args) => priority_tuner::cli::commands::config::execute(args),
    }
}
