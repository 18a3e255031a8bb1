//! Run command - Tune a synthetic performance surface

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};

use crate::{
    adapters::PeakSurface,
    cli::output::{format_number, print_kv, print_section, print_value_table},
    config::{AgentConfig, UpdateRule},
    pipeline::{
        ControlLoop, DEFAULT_STOP_EPSILON, JsonlObserver, LoopConfig, MetricsObserver,
        ProgressObserver,
    },
    q_learning::Agent,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RuleArg {
    /// Q-learning (off-policy TD control)
    QLearning,
    /// SARSA (on-policy TD control)
    Sarsa,
}

impl From<RuleArg> for UpdateRule {
    fn from(rule: RuleArg) -> Self {
        match rule {
            RuleArg::QLearning => UpdateRule::QLearning,
            RuleArg::Sarsa => UpdateRule::Sarsa,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    about = "Run the agent against a synthetic performance surface",
    allow_negative_numbers = true
)]
pub struct RunArgs {
    /// Agent configuration file (JSON); flags below override it
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Levels per parameter, comma separated
    #[arg(long, value_delimiter = ',')]
    pub ranges: Option<Vec<usize>>,

    /// Value-update rule
    #[arg(long, value_enum)]
    pub rule: Option<RuleArg>,

    /// Learning rate α in (0, 1]
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor γ in [0, 1]
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Cycles until epsilon decays to the residual
    #[arg(long)]
    pub horizon: Option<u64>,

    /// Epsilon remaining at the horizon
    #[arg(long)]
    pub residual: Option<f64>,

    /// Optimistic initial table value
    #[arg(long)]
    pub q_init: Option<f64>,

    /// Re-initialize the table once at this cycle (warm-up phase)
    #[arg(long)]
    pub warmup_reset: Option<u64>,

    /// Random seed for reproducibility
    #[arg(long, short = 's')]
    pub seed: Option<u64>,

    /// Surface peak levels, comma separated (default: 1,3 for two
    /// parameters, otherwise the middle of each range)
    #[arg(long, value_delimiter = ',')]
    pub peak: Option<Vec<usize>>,

    /// Surface value at the peak
    #[arg(long, default_value_t = 100.0)]
    pub baseline: f64,

    /// Penalty exponent of the surface
    #[arg(long, default_value_t = 4)]
    pub exponent: i32,

    /// Standard deviation of Gaussian measurement noise
    #[arg(long)]
    pub noise: Option<f64>,

    /// Maximum number of control cycles
    #[arg(long, default_value_t = 100_000)]
    pub max_cycles: u64,

    /// Stop once epsilon falls below this value
    #[arg(long, default_value_t = DEFAULT_STOP_EPSILON)]
    pub stop_epsilon: f64,

    /// Write a JSONL trace of every cycle
    #[arg(long)]
    pub trace: Option<PathBuf>,

    /// Write the run summary as JSON
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Print the learned value table after the run
    #[arg(long)]
    pub dump_table: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Merge the config file (if any) with command-line overrides.
pub fn build_config(args: &RunArgs) -> Result<AgentConfig> {
    let mut config = match &args.config {
        Some(path) => AgentConfig::load(path)
            .with_context(|| format!("loading agent config from {}", path.display()))?,
        None => AgentConfig::default(),
    };

    if let Some(ranges) = &args.ranges {
        config.ranges = ranges.clone();
    }
    if let Some(rule) = args.rule {
        config.update_rule = rule.into();
    }
    if let Some(alpha) = args.alpha {
        config.learning_rate = alpha;
    }
    if let Some(gamma) = args.gamma {
        config.discount_factor = gamma;
    }
    if let Some(horizon) = args.horizon {
        config.exploration.horizon = horizon;
    }
    if let Some(residual) = args.residual {
        config.exploration.residual = residual;
    }
    if let Some(q_init) = args.q_init {
        config.q_init = q_init;
    }
    if args.warmup_reset.is_some() {
        config.warmup_reset_cycle = args.warmup_reset;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    config.validate()?;
    Ok(config)
}

fn resolve_peak(args: &RunArgs, ranges: &[usize]) -> Result<Vec<usize>> {
    let peak = match &args.peak {
        Some(peak) => peak.clone(),
        None if ranges.len() == 2 && ranges.iter().all(|&range| range >= 4) => {
            PeakSurface::default().peak().to_vec()
        }
        None => ranges.iter().map(|&range| range / 2).collect(),
    };
    if peak.len() != ranges.len() {
        return Err(anyhow!(
            "--peak has {} entries but the agent tunes {} parameters",
            peak.len(),
            ranges.len()
        ));
    }
    if let Some((param, (&level, &range))) = peak
        .iter()
        .zip(ranges)
        .enumerate()
        .find(|(_, (level, range))| *level >= *range)
    {
        return Err(anyhow!(
            "peak level {level} of parameter {param} lies outside its range {range}"
        ));
    }
    Ok(peak)
}

pub fn execute(args: RunArgs) -> Result<()> {
    let config = build_config(&args)?;
    let peak = resolve_peak(&args, &config.ranges)?;

    let mut surface = PeakSurface::new(peak.clone(), args.baseline, args.exponent);
    if let Some(std_dev) = args.noise {
        // Offset the seed so noise and exploration draw from distinct streams.
        surface = surface.with_noise(std_dev, config.seed.map(|seed| seed ^ 0x5eed))?;
    }

    let mut agent = Agent::new(config.clone())?;

    let metrics = MetricsObserver::new();
    let metrics_handle = metrics.handle();
    let mut control = ControlLoop::new(LoopConfig {
        max_cycles: args.max_cycles,
        stop_epsilon: Some(args.stop_epsilon),
    })
    .with_observer(Box::new(metrics));
    if !args.no_progress {
        control = control.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.trace {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("creating trace file {}", path.display()))?;
        control = control.with_observer(Box::new(observer));
    }

    let result = control.run(&mut agent, &mut surface)?;

    print_section(&format!("{} run summary", result.controller));
    print_kv("Ranges", &format!("{:?}", config.ranges));
    print_kv("States", &format_number(agent.table().num_states() as u64));
    print_kv("Cycles", &format_number(result.cycles));
    print_kv("Final levels", &format!("{:?}", result.final_levels));
    print_kv("Surface peak", &format!("{peak:?}"));
    print_kv("Final epsilon", &format!("{:.6}", result.final_epsilon));
    if let (Some(reading), Some(levels)) = (result.best_reading, &result.best_levels) {
        print_kv("Best reading", &format!("{reading:.3} at {levels:?}"));
    }
    print_kv("Greedy action", &agent.greedy_action().to_string());
    if let Ok(metrics) = metrics_handle.lock() {
        print_kv(
            "Explored",
            &format!("{:.1}%", metrics.exploration_share() * 100.0),
        );
        print_kv("Mean reading", &format!("{:.3}", metrics.mean_reading));
    }
    if result.stopped_on_epsilon {
        println!("\nExploration finished before the cycle cap.");
    }

    if args.dump_table {
        print_value_table(&agent);
    }

    if let Some(path) = &args.summary {
        result
            .save(path)
            .with_context(|| format!("writing summary to {}", path.display()))?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> RunArgs {
        let mut argv = vec!["run"];
        argv.extend_from_slice(extra);
        RunArgs::parse_from(argv)
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = build_config(&args(&[
            "--ranges", "3,5,2", "--rule", "sarsa", "--alpha", "0.3", "--seed", "4",
        ]))
        .unwrap();
        assert_eq!(config.ranges, vec![3, 5, 2]);
        assert_eq!(config.update_rule, UpdateRule::Sarsa);
        assert_eq!(config.learning_rate, 0.3);
        assert_eq!(config.seed, Some(4));
    }

    #[test]
    fn test_invalid_override_rejected() {
        assert!(build_config(&args(&["--gamma", "1.5"])).is_err());
    }

    #[test]
    fn test_config_file_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.json");
        AgentConfig::uniform(3, 3).with_q_init(2.0).save(&path).unwrap();

        let config = build_config(&args(&[
            "--config",
            path.to_str().unwrap(),
            "--q-init",
            "5",
        ]))
        .unwrap();
        assert_eq!(config.ranges, vec![3, 3, 3]);
        assert_eq!(config.q_init, 5.0);
    }

    #[test]
    fn test_peak_defaults() {
        let run = args(&[]);
        assert_eq!(resolve_peak(&run, &[4, 4]).unwrap(), vec![1, 3]);
        assert_eq!(resolve_peak(&run, &[5, 3, 2]).unwrap(), vec![2, 1, 1]);
    }

    #[test]
    fn test_peak_validation() {
        assert!(resolve_peak(&args(&["--peak", "1"]), &[4, 4]).is_err());
        assert!(resolve_peak(&args(&["--peak", "1,4"]), &[4, 4]).is_err());
    }
}
