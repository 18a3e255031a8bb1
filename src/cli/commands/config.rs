//! Config command - Print or validate agent configurations

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    action::Action,
    cli::output::{format_number, print_kv, print_section},
    config::AgentConfig,
};

#[derive(Parser, Debug)]
#[command(about = "Print the default configuration or validate a config file")]
pub struct ConfigArgs {
    /// Config file to validate instead of printing the defaults
    #[arg(long)]
    pub validate: Option<PathBuf>,
}

pub fn execute(args: ConfigArgs) -> Result<()> {
    let Some(path) = args.validate else {
        println!("{}", serde_json::to_string_pretty(&AgentConfig::default())?);
        return Ok(());
    };

    let config = AgentConfig::load(&path)
        .with_context(|| format!("loading agent config from {}", path.display()))?;
    let encoder = config
        .validate()
        .with_context(|| format!("{} is not a valid agent config", path.display()))?;

    print_section(&format!("{} is valid", path.display()));
    print_kv("Update rule", &config.update_rule.to_string());
    print_kv("Ranges", &format!("{:?}", encoder.ranges()));
    print_kv("States", &format_number(encoder.num_states() as u64));
    print_kv(
        "Actions",
        &Action::count(encoder.num_params()).to_string(),
    );
    print_kv(
        "Decay constant",
        &format!("{:.1} cycles", config.exploration.decay_constant()),
    );
    Ok(())
}
