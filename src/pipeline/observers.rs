//! Observer pattern for control loops
//!
//! Observers allow composable data collection during a run without coupling
//! the loop to specific output formats.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    action::Action,
    pipeline::RunResult,
    ports::Observer,
    q_learning::Step,
};

/// One cycle as written to a JSONL trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepObservation {
    /// Cycle number
    pub cycle: u64,
    /// Reading that drove the cycle
    pub reading: f64,
    /// Reward derived from the reading
    pub reward: f64,
    /// Exploration rate
    pub epsilon: f64,
    /// Action taken
    pub action: Action,
    /// Whether the action was exploratory
    pub explored: bool,
    /// Levels after the action
    pub levels: Vec<usize>,
    /// TD error, if an update was applied
    pub td_error: Option<f64>,
}

impl StepObservation {
    fn new(reading: f64, step: &Step) -> Self {
        Self {
            cycle: step.cycle,
            reading,
            reward: step.reward,
            epsilon: step.epsilon,
            action: step.action,
            explored: step.explored,
            levels: step.levels.clone(),
            td_error: step.td_error,
        }
    }
}

/// Progress bar observer - Shows loop progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self { progress_bar: None }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_run_start(&mut self, expected_cycles: u64) -> Result<()> {
        let pb = ProgressBar::new(expected_cycles);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} cycles ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_step(&mut self, _reading: f64, step: &Step) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(step.cycle);
            if step.cycle.is_multiple_of(64) {
                pb.set_message(format!("ε={:.4} {:?}", step.epsilon, step.levels));
            }
        }
        Ok(())
    }

    fn on_run_end(&mut self, result: &RunResult) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!(
                "ε={:.4} {:?}",
                result.final_epsilon, result.final_levels
            ));
        }
        Ok(())
    }
}

/// Aggregate statistics collected by [`MetricsObserver`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoopMetrics {
    /// Cycles observed
    pub cycles: u64,
    /// Exploratory cycles
    pub explored: u64,
    /// Sum of rewards, equal to the last reading minus the zero baseline
    pub cumulative_reward: f64,
    /// Count per action label
    pub action_counts: BTreeMap<String, u64>,
    /// Mean reading over all cycles
    pub mean_reading: f64,
}

impl LoopMetrics {
    /// Fraction of cycles that explored
    pub fn exploration_share(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.explored as f64 / self.cycles as f64
        }
    }
}

/// Metrics observer - Tracks run statistics
///
/// The metrics live behind a shared handle so they stay readable after the
/// observer has been boxed into a [`ControlLoop`](crate::pipeline::ControlLoop).
#[derive(Default)]
pub struct MetricsObserver {
    metrics: Arc<Mutex<LoopMetrics>>,
    reading_sum: f64,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the collected metrics
    pub fn handle(&self) -> Arc<Mutex<LoopMetrics>> {
        Arc::clone(&self.metrics)
    }

    /// Snapshot of the collected metrics
    pub fn snapshot(&self) -> LoopMetrics {
        self.lock().clone()
    }

    // A reader that panicked while holding the handle must not cost us the
    // counts collected so far.
    fn lock(&self) -> MutexGuard<'_, LoopMetrics> {
        self.metrics.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("metrics lock poisoned, recovering collected metrics");
            self.metrics.clear_poison();
            poisoned.into_inner()
        })
    }
}

impl Observer for MetricsObserver {
    fn on_run_start(&mut self, _expected_cycles: u64) -> Result<()> {
        *self.lock() = LoopMetrics::default();
        self.reading_sum = 0.0;
        Ok(())
    }

    fn on_step(&mut self, reading: f64, step: &Step) -> Result<()> {
        self.reading_sum += reading;
        let reading_sum = self.reading_sum;
        let mut metrics = self.lock();
        metrics.cycles += 1;
        if step.explored {
            metrics.explored += 1;
        }
        metrics.cumulative_reward += step.reward;
        *metrics
            .action_counts
            .entry(step.action.to_string())
            .or_insert(0) += 1;
        metrics.mean_reading = reading_sum / metrics.cycles as f64;
        Ok(())
    }
}

/// JSONL observer - Writes one observation per cycle
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self { writer })
    }
}

impl Observer for JsonlObserver {
    fn on_step(&mut self, reading: f64, step: &Step) -> Result<()> {
        // Write as JSONL (one JSON object per line)
        serde_json::to_writer(&mut self.writer, &StepObservation::new(reading, step))?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_run_end(&mut self, _result: &RunResult) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
