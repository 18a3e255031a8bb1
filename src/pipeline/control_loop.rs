//! Closed control loop driving a controller against a performance source

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::{Controller, Observer, PerformanceSource},
};

/// Epsilon below which exploration is considered finished.
pub const DEFAULT_STOP_EPSILON: f64 = 0.0003;

/// Loop configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopConfig {
    /// Hard cap on the number of cycles
    pub max_cycles: u64,

    /// Stop once a step reports epsilon below this value
    pub stop_epsilon: Option<f64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_cycles: 100_000,
            stop_epsilon: Some(DEFAULT_STOP_EPSILON),
        }
    }
}

/// Result of a control run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Controller name
    pub controller: String,

    /// Source name
    pub source: String,

    /// Cycles completed
    pub cycles: u64,

    /// Levels applied when the loop stopped
    pub final_levels: Vec<usize>,

    /// Epsilon after the last cycle
    pub final_epsilon: f64,

    /// Highest reading observed
    pub best_reading: Option<f64>,

    /// Levels that produced `best_reading`
    pub best_levels: Option<Vec<usize>>,

    /// Cycles whose action was a random exploration
    pub explored_steps: u64,

    /// Whether the loop ended on the epsilon floor rather than the cycle cap
    pub stopped_on_epsilon: bool,
}

impl RunResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Control loop: measure, step, notify, repeat
///
/// Each cycle measures the source at the controller's current levels and
/// feeds that reading back to the controller, which returns the levels to
/// apply next.
pub struct ControlLoop {
    config: LoopConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl ControlLoop {
    /// Create a new control loop
    pub fn new(config: LoopConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the loop
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Run until the cycle cap or the epsilon floor is reached.
    ///
    /// # Errors
    ///
    /// Propagates measurement, controller, and observer errors; the loop
    /// stops at the first one.
    pub fn run(
        &mut self,
        controller: &mut dyn Controller,
        source: &mut dyn PerformanceSource,
    ) -> Result<RunResult> {
        tracing::info!(
            controller = controller.name(),
            source = source.name(),
            max_cycles = self.config.max_cycles,
            stop_epsilon = ?self.config.stop_epsilon,
            "control loop starting"
        );
        let expected_cycles = self
            .config
            .stop_epsilon
            .and_then(|floor| controller.cycles_until_epsilon(floor))
            .map_or(self.config.max_cycles, |cycles| {
                cycles.min(self.config.max_cycles)
            });
        for observer in &mut self.observers {
            observer.on_run_start(expected_cycles)?;
        }

        let mut cycles = 0;
        let mut explored_steps = 0;
        let mut best: Option<(f64, Vec<usize>)> = None;
        let mut stopped_on_epsilon = false;

        while cycles < self.config.max_cycles {
            let applied = controller.levels().to_vec();
            let reading = source.measure(&applied)?;
            if best.as_ref().is_none_or(|(best_reading, _)| reading > *best_reading) {
                best = Some((reading, applied));
            }

            let step = controller.step(reading)?;
            cycles += 1;
            if step.explored {
                explored_steps += 1;
            }

            for observer in &mut self.observers {
                observer.on_step(reading, &step)?;
            }

            if self
                .config
                .stop_epsilon
                .is_some_and(|floor| step.epsilon < floor)
            {
                stopped_on_epsilon = true;
                break;
            }
        }

        let (best_reading, best_levels) = match best {
            Some((reading, levels)) => (Some(reading), Some(levels)),
            None => (None, None),
        };
        let result = RunResult {
            controller: controller.name().to_string(),
            source: source.name().to_string(),
            cycles,
            final_levels: controller.levels().to_vec(),
            final_epsilon: controller.epsilon(),
            best_reading,
            best_levels,
            explored_steps,
            stopped_on_epsilon,
        };

        for observer in &mut self.observers {
            observer.on_run_end(&result)?;
        }
        tracing::info!(
            cycles = result.cycles,
            final_levels = ?result.final_levels,
            stopped_on_epsilon,
            "control loop finished"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adapters::ReplaySource, config::AgentConfig, q_learning::Agent};

    #[test]
    fn test_feeds_readings_in_order() {
        let mut agent = Agent::new(AgentConfig::uniform(1, 4).with_seed(5)).unwrap();
        let mut source = ReplaySource::new([5.0, 8.0, 6.0]);
        let mut control = ControlLoop::new(LoopConfig {
            max_cycles: 3,
            stop_epsilon: None,
        });

        let result = control.run(&mut agent, &mut source).unwrap();

        assert_eq!(result.cycles, 3);
        assert_eq!(result.best_reading, Some(8.0));
        assert_eq!(source.applied()[0], vec![0]);
        assert_eq!(result.final_levels, agent.levels());
        assert!(!result.stopped_on_epsilon);
    }

    #[test]
    fn test_zero_cycles() {
        let mut agent = Agent::new(AgentConfig::uniform(1, 4)).unwrap();
        let mut source = ReplaySource::default();
        let result = ControlLoop::new(LoopConfig {
            max_cycles: 0,
            stop_epsilon: None,
        })
        .run(&mut agent, &mut source)
        .unwrap();
        assert_eq!(result.cycles, 0);
        assert_eq!(result.best_reading, None);
        assert_eq!(result.final_epsilon, 1.0);
    }
}
