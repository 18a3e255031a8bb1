//! Exponential exploration decay

use crate::config::ExplorationConfig;

/// Epsilon as a function of the cycle counter: `exp(-t / C)`.
///
/// Starts at `1.0` for `t = 0` and is non-increasing in `t`. Long runs never
/// reach zero: the decay bottoms out at `f64::MIN_POSITIVE`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplorationSchedule {
    decay_constant: f64,
}

impl ExplorationSchedule {
    pub fn new(config: &ExplorationConfig) -> Self {
        Self::with_constant(config.decay_constant())
    }

    /// Schedule with an explicit decay constant in cycles.
    pub fn with_constant(decay_constant: f64) -> Self {
        debug_assert!(decay_constant > 0.0);
        Self { decay_constant }
    }

    pub fn epsilon(&self, cycle: u64) -> f64 {
        (-(cycle as f64) / self.decay_constant)
            .exp()
            .max(f64::MIN_POSITIVE)
    }

    pub fn decay_constant(&self) -> f64 {
        self.decay_constant
    }

    /// First cycle at which epsilon drops strictly below `threshold`.
    ///
    /// Returns `u64::MAX` for thresholds that are never crossed (at or below
    /// `f64::MIN_POSITIVE`, or NaN).
    pub fn cycles_until(&self, threshold: f64) -> u64 {
        if threshold.is_nan() || threshold <= f64::MIN_POSITIVE {
            return u64::MAX;
        }
        if threshold > 1.0 {
            return 1;
        }
        let mut cycle = ((-(threshold.ln()) * self.decay_constant).floor() as u64).max(1);
        // The closed form can be off by one either way after rounding.
        while cycle > 1 && self.epsilon(cycle - 1) < threshold {
            cycle -= 1;
        }
        while self.epsilon(cycle) >= threshold {
            cycle += 1;
        }
        cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_one() {
        let schedule = ExplorationSchedule::with_constant(600.0);
        assert_eq!(schedule.epsilon(0), 1.0);
    }

    #[test]
    fn test_monotone_non_increasing() {
        let schedule = ExplorationSchedule::new(&ExplorationConfig::default());
        let mut previous = schedule.epsilon(0);
        for cycle in 1..20_000 {
            let epsilon = schedule.epsilon(cycle);
            assert!(epsilon <= previous);
            assert!(epsilon >= 0.0);
            previous = epsilon;
        }
    }

    #[test]
    fn test_reaches_residual_at_horizon() {
        let config = ExplorationConfig::new(5_000, 0.0003);
        let schedule = ExplorationSchedule::new(&config);
        assert!((schedule.epsilon(5_000) - 0.0003).abs() < 1e-9);
        assert!(schedule.epsilon(4_999) > 0.0003);
    }

    #[test]
    fn test_long_runs_stay_positive() {
        let schedule = ExplorationSchedule::new(&ExplorationConfig::default());
        for cycle in [468_457, 10_000_000, u64::MAX] {
            let epsilon = schedule.epsilon(cycle);
            assert!(epsilon > 0.0 && epsilon <= 1.0, "cycle {cycle}: {epsilon}");
        }
        assert_eq!(schedule.epsilon(u64::MAX), f64::MIN_POSITIVE);
        assert_eq!(schedule.cycles_until(f64::MIN_POSITIVE), u64::MAX);
        assert_eq!(schedule.cycles_until(0.0), u64::MAX);
    }

    #[test]
    fn test_cycles_until() {
        let schedule = ExplorationSchedule::with_constant(100.0);
        let cycle = schedule.cycles_until(0.5);
        assert!(schedule.epsilon(cycle) < 0.5);
        assert!(schedule.epsilon(cycle - 1) >= 0.5);
    }
}
