//! Observer port - abstraction for control-loop observation
//!
//! Observers collect data while a [`ControlLoop`](crate::pipeline::ControlLoop)
//! runs without coupling the loop to any output format.

use crate::{Result, pipeline::RunResult, q_learning::Step};

/// Observer trait for monitoring a control loop
///
/// # Event Sequence
///
/// 1. `on_run_start(expected_cycles)` - Once at the beginning
/// 2. `on_step(reading, step)` - After every completed cycle
/// 3. `on_run_end(result)` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use priority_tuner::{ports::Observer, q_learning::Step};
///
/// struct HoldCounter {
///     holds: usize,
/// }
///
/// impl Observer for HoldCounter {
///     fn on_step(&mut self, _reading: f64, step: &Step) -> priority_tuner::Result<()> {
///         if step.action == priority_tuner::Action::None {
///             self.holds += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when the loop starts, with the number of cycles the run is
    /// expected to take: the cycle cap, or fewer when the epsilon floor is
    /// reached first.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_run_start(&mut self, _expected_cycles: u64) -> Result<()> {
        Ok(())
    }

    /// Called after each cycle with the reading that produced `step`.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_step(&mut self, _reading: f64, _step: &Step) -> Result<()> {
        Ok(())
    }

    /// Called when the loop stops.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to flush outputs or report summaries.
    fn on_run_end(&mut self, _result: &RunResult) -> Result<()> {
        Ok(())
    }
}
