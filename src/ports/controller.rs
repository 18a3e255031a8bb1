//! Controller port - abstraction over per-cycle tuning agents

use crate::{Result, q_learning::Step};

/// Anything that turns one performance reading into one knob adjustment.
///
/// # Examples
///
/// ```no_run
/// use priority_tuner::ports::Controller;
///
/// fn drive<C: Controller>(controller: &mut C, readings: &[f64]) -> priority_tuner::Result<()> {
///     for &reading in readings {
///         let step = controller.step(reading)?;
///         println!("{} -> {:?}", step.action, step.levels);
///     }
///     Ok(())
/// }
/// ```
pub trait Controller: Send {
    /// Consume the reading for the currently applied levels and decide the
    /// next adjustment.
    ///
    /// # Errors
    ///
    /// Returns an error if the reading is rejected (e.g. not finite).
    fn step(&mut self, reading: f64) -> Result<Step>;

    /// Levels the caller should currently have applied.
    fn levels(&self) -> &[usize];

    /// Current exploration rate.
    fn epsilon(&self) -> f64;

    /// Cycles until the exploration rate drops below `floor`, if the
    /// controller follows a known schedule.
    fn cycles_until_epsilon(&self, _floor: f64) -> Option<u64> {
        None
    }

    /// Controller name, used in logs and summaries.
    fn name(&self) -> &str;

    /// Reset to initial conditions.
    ///
    /// The default implementation does nothing, suitable for stateless
    /// controllers.
    fn reset(&mut self) -> Result<()> {
        Ok(())
    }

    /// Enable downcasting to concrete types.
    ///
    /// ```no_run
    /// use priority_tuner::{ports::Controller, q_learning::Agent};
    ///
    /// fn table_size(controller: &dyn Controller) -> Option<usize> {
    ///     controller
    ///         .as_any()
    ///         .downcast_ref::<Agent>()
    ///         .map(|agent| agent.table().num_states())
    /// }
    /// ```
    fn as_any(&self) -> &dyn std::any::Any;
}
