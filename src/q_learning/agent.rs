//! Q-learning and SARSA control agent
//!
//! The agent owns the discretized parameter levels, the value table, the
//! exploration schedule and its random stream. Each call to [`Agent::step`]
//! consumes one performance reading and emits the next knob adjustment.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    action::{self, Action},
    config::{AgentConfig, UpdateRule},
    ports::Controller,
    q_learning::{
        exploration::ExplorationSchedule,
        policy::{EpsilonGreedy, Selection},
        q_table::QTable,
    },
    state::StateEncoder,
};

/// Transition whose update SARSA defers by one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: usize,
    pub action: usize,
    pub reward: f64,
}

/// Result of one control cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Cycle number, starting at 1
    pub cycle: u64,
    /// Action taken this cycle
    pub action: Action,
    /// Parameter levels after applying `action`
    pub levels: Vec<usize>,
    /// Performance delta since the previous reading
    pub reward: f64,
    /// Exploration rate used for the selection
    pub epsilon: f64,
    /// Whether the action was a random exploration
    pub explored: bool,
    /// TD error of the table update, if one was applied
    pub td_error: Option<f64>,
}

/// Tabular control agent (Q-learning or SARSA)
///
/// # Examples
///
/// ```
/// use priority_tuner::{config::AgentConfig, q_learning::Agent};
///
/// let mut agent = Agent::new(AgentConfig::uniform(2, 4).with_seed(7)).unwrap();
/// let step = agent.step(1.25).unwrap();
/// assert_eq!(step.cycle, 1);
/// assert!(step.levels.iter().all(|&level| level < 4));
/// ```
#[derive(Debug, Clone)]
pub struct Agent {
    config: AgentConfig,
    encoder: StateEncoder,
    q_table: QTable,
    policy: EpsilonGreedy,
    schedule: ExplorationSchedule,
    levels: Vec<usize>,
    state: usize,
    epsilon: f64,
    cycle: u64,
    previous_reading: f64,
    transition: Option<Transition>,
}

impl Agent {
    /// Create an agent in its reset state.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation.
    pub fn new(config: AgentConfig) -> Result<Self> {
        let encoder = config.validate()?;
        let num_actions = Action::count(encoder.num_params());

        tracing::info!(
            rule = %config.update_rule,
            num_params = encoder.num_params(),
            ranges = ?encoder.ranges(),
            num_states = encoder.num_states(),
            num_actions,
            decay_constant = config.exploration.decay_constant(),
            "agent initialized"
        );

        Ok(Self {
            q_table: QTable::new(
                encoder.num_states(),
                num_actions,
                config.learning_rate,
                config.discount_factor,
                config.q_init,
            ),
            policy: EpsilonGreedy::new(config.seed),
            schedule: ExplorationSchedule::new(&config.exploration),
            levels: vec![0; encoder.num_params()],
            state: 0,
            epsilon: 1.0,
            cycle: 0,
            previous_reading: 0.0,
            transition: None,
            encoder,
            config,
        })
    }

    /// Return to the initial condition: all levels zero, optimistic table,
    /// no transition memory, epsilon `1.0`, cycle counter zero.
    pub fn reset(&mut self) {
        self.levels.fill(0);
        self.state = self.encoder.encode(&self.levels);
        self.q_table.reset();
        self.transition = None;
        self.epsilon = 1.0;
        self.cycle = 0;
        self.previous_reading = 0.0;
        self.policy.reset();
        tracing::info!(rule = %self.config.update_rule, "agent reset");
    }

    /// Run one control cycle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonFiniteReading`] for NaN or infinite readings. The
    /// agent is left exactly as it was before the call.
    pub fn step(&mut self, reading: f64) -> Result<Step> {
        if !reading.is_finite() {
            return Err(Error::NonFiniteReading {
                cycle: self.cycle + 1,
                reading,
            });
        }

        self.cycle += 1;
        self.epsilon = self.schedule.epsilon(self.cycle);

        let reward = reading - self.previous_reading;
        self.previous_reading = reading;

        let state = self.state;
        let current = self.levels.clone();
        let Selection { action, explored } = self.select_action(state, &current);
        let chosen = Action::from_index(action);
        chosen.apply(&mut self.levels);
        let next_state = match chosen {
            Action::None => state,
            Action::Increment(param) => state + self.encoder.stride(param),
            Action::Decrement(param) => state - self.encoder.stride(param),
        };
        debug_assert_eq!(next_state, self.encoder.encode(&self.levels));

        let td_error = match self.config.update_rule {
            UpdateRule::QLearning => {
                let next_legal = action::legal_actions(&self.levels, self.encoder.ranges());
                Some(
                    self.q_table
                        .q_learning_update(state, action, reward, next_state, &next_legal),
                )
            }
            UpdateRule::Sarsa => {
                let td_error = self.transition.map(|previous| {
                    self.q_table.sarsa_update(
                        previous.state,
                        previous.action,
                        previous.reward,
                        state,
                        action,
                    )
                });
                self.transition = Some(Transition {
                    state,
                    action,
                    reward,
                });
                td_error
            }
        };

        if self.config.warmup_reset_cycle == Some(self.cycle) {
            tracing::warn!(cycle = self.cycle, "warm-up complete, discarding value table");
            self.q_table.reset();
        }

        self.state = next_state;

        tracing::debug!(
            cycle = self.cycle,
            epsilon = self.epsilon,
            action = %chosen,
            explored,
            reward,
            levels = ?self.levels,
            "control step"
        );

        Ok(Step {
            cycle: self.cycle,
            action: chosen,
            levels: self.levels.clone(),
            reward,
            epsilon: self.epsilon,
            explored,
            td_error,
        })
    }

    /// ε-greedy choice for `state` given its `levels`, at the current epsilon.
    ///
    /// Only actions legal for `levels` are considered. Advances the random
    /// stream.
    pub fn select_action(&mut self, state: usize, levels: &[usize]) -> Selection {
        let legal = self.legal_actions(levels);
        self.policy
            .select(&self.q_table, state, &legal, self.epsilon)
    }

    /// Legal action indices for `levels`, in enumeration order.
    pub fn legal_actions(&self, levels: &[usize]) -> Vec<usize> {
        action::legal_actions(levels, self.encoder.ranges())
    }

    /// Greedy action for the current state, without touching the random stream.
    pub fn greedy_action(&self) -> Action {
        let legal = self.legal_actions(&self.levels);
        Action::from_index(self.q_table.greedy_action(self.state, &legal))
    }

    pub fn levels(&self) -> &[usize] {
        &self.levels
    }

    pub fn state_index(&self) -> usize {
        self.state
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Cycles left until a step reports epsilon below `floor`, counting the
    /// step that crosses it.
    pub fn cycles_until_epsilon(&self, floor: f64) -> u64 {
        self.schedule
            .cycles_until(floor)
            .saturating_sub(self.cycle)
            .max(1)
    }

    pub fn table(&self) -> &QTable {
        &self.q_table
    }

    pub fn encoder(&self) -> &StateEncoder {
        &self.encoder
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn update_rule(&self) -> UpdateRule {
        self.config.update_rule
    }

    /// Transition awaiting its SARSA update; always `None` under Q-learning.
    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }
}

impl Controller for Agent {
    fn step(&mut self, reading: f64) -> Result<Step> {
        Agent::step(self, reading)
    }

    fn levels(&self) -> &[usize] {
        &self.levels
    }

    fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn cycles_until_epsilon(&self, floor: f64) -> Option<u64> {
        Some(Agent::cycles_until_epsilon(self, floor))
    }

    fn name(&self) -> &str {
        match self.config.update_rule {
            UpdateRule::QLearning => "Q-Learning",
            UpdateRule::Sarsa => "SARSA",
        }
    }

    fn reset(&mut self) -> Result<()> {
        Agent::reset(self);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
