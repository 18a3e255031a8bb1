//! Common test utilities for the priority tuner test suite.

#![allow(dead_code)]

use priority_tuner::{Agent, AgentConfig, ExplorationConfig, UpdateRule};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Performance peaked at level 2 of a single parameter: `-(level - 2)^2`.
pub fn single_peak_reading(levels: &[usize]) -> f64 {
    let offset = levels[0] as f64 - 2.0;
    -(offset * offset)
}

/// One-parameter, four-level agent that explores for 6000 cycles.
pub fn single_knob_agent(rule: UpdateRule, alpha: f64, gamma: f64, seed: u64) -> Agent {
    Agent::new(
        AgentConfig::uniform(1, 4)
            .with_update_rule(rule)
            .with_learning_rate(alpha)
            .with_discount_factor(gamma)
            .with_exploration(ExplorationConfig::new(6_000, 0.001))
            .with_seed(seed),
    )
    .unwrap()
}

/// Drive `agent` for `cycles` cycles, feeding it `reading(levels)` each time.
pub fn drive(agent: &mut Agent, cycles: usize, reading: impl Fn(&[usize]) -> f64) {
    for _ in 0..cycles {
        let value = reading(agent.levels());
        agent.step(value).unwrap();
    }
}

/// Uniform noise readings from a seeded generator.
pub fn noise_readings(seed: u64, count: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.random_range(-50.0..50.0)).collect()
}
