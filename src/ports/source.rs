//! Performance source port - where readings come from

use crate::Result;

/// External measurement of the controlled subsystem.
///
/// Implementations translate `levels` into whatever the real subsystem
/// needs (priorities, bandwidth shares), apply them, and report a scalar
/// where higher is better: a performance counter, a simulator, or a
/// scripted sequence in tests.
pub trait PerformanceSource: Send {
    /// Apply `levels` and return the resulting performance reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the measurement cannot be taken.
    fn measure(&mut self, levels: &[usize]) -> Result<f64>;

    /// Source name, used in logs and summaries.
    fn name(&self) -> &str;
}
