//! Configuration types for agent creation.

use std::{fmt, fs::File, path::Path, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, state::StateEncoder};

/// Default upper bound on the number of table rows.
pub const DEFAULT_MAX_STATES: usize = 1 << 20;

/// Value-update strategy applied by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateRule {
    /// Off-policy: bootstrap from the best legal action in the next state.
    #[default]
    QLearning,
    /// On-policy: bootstrap from the action actually chosen next, one cycle late.
    Sarsa,
}

impl fmt::Display for UpdateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UpdateRule::QLearning => "q_learning",
            UpdateRule::Sarsa => "sarsa",
        };
        f.write_str(label)
    }
}

impl FromStr for UpdateRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalised = s.trim().to_ascii_lowercase();
        match normalised.as_str() {
            "q_learning" | "q-learning" | "qlearning" | "q" => Ok(UpdateRule::QLearning),
            "sarsa" => Ok(UpdateRule::Sarsa),
            _ => Err(Error::ParseUpdateRule {
                input: s.to_string(),
                expected: "q_learning, sarsa".to_string(),
            }),
        }
    }
}

/// Exploration decay: `epsilon(t) = exp(-t / C)`.
///
/// `C` is chosen so that epsilon equals `residual` after `horizon` cycles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExplorationConfig {
    /// Cycles until epsilon has decayed to `residual`
    pub horizon: u64,
    /// Epsilon remaining at the horizon
    pub residual: f64,
}

impl ExplorationConfig {
    pub fn new(horizon: u64, residual: f64) -> Self {
        Self { horizon, residual }
    }

    /// Derive the horizon from a wall-clock exploration window and the
    /// control period of the caller's loop.
    pub fn from_period(window: Duration, period: Duration, residual: f64) -> Self {
        let horizon = if period.is_zero() {
            0
        } else {
            (window.as_secs_f64() / period.as_secs_f64()).round() as u64
        };
        Self { horizon, residual }
    }

    /// Decay constant `C`, in cycles.
    pub fn decay_constant(&self) -> f64 {
        self.horizon as f64 / (1.0 / self.residual).ln()
    }

    fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(Error::config("exploration horizon must be at least one cycle"));
        }
        if !(self.residual > 0.0 && self.residual < 1.0) {
            return Err(Error::config(format!(
                "exploration residual {} must lie in (0, 1)",
                self.residual
            )));
        }
        Ok(())
    }
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            horizon: 5_000,
            residual: 0.0003,
        }
    }
}

/// Configuration for creating an [`Agent`](crate::q_learning::Agent).
///
/// # Examples
///
/// ```
/// use priority_tuner::config::{AgentConfig, UpdateRule};
///
/// let config = AgentConfig::uniform(4, 4)
///     .with_update_rule(UpdateRule::Sarsa)
///     .with_learning_rate(0.3)
///     .with_discount_factor(0.7)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// Number of levels per parameter
    pub ranges: Vec<usize>,
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_factor: f64,
    /// Exploration schedule
    pub exploration: ExplorationConfig,
    /// Optimistic initial value for every state-action pair
    pub q_init: f64,
    /// Update strategy
    pub update_rule: UpdateRule,
    /// Re-initialize the table once when this cycle completes (warm-up phase)
    pub warmup_reset_cycle: Option<u64>,
    /// Largest state space the agent may allocate
    pub max_states: usize,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Create a configuration with explicit per-parameter ranges.
    pub fn new(ranges: Vec<usize>) -> Self {
        Self {
            ranges,
            ..Self::default()
        }
    }

    /// Create a configuration with `num_params` parameters sharing one range.
    pub fn uniform(num_params: usize, range: usize) -> Self {
        Self::new(vec![range; num_params])
    }

    pub fn with_learning_rate(mut self, alpha: f64) -> Self {
        self.learning_rate = alpha;
        self
    }

    pub fn with_discount_factor(mut self, gamma: f64) -> Self {
        self.discount_factor = gamma;
        self
    }

    pub fn with_exploration(mut self, exploration: ExplorationConfig) -> Self {
        self.exploration = exploration;
        self
    }

    /// Set the exploration horizon, keeping the residual.
    pub fn with_exploration_horizon(mut self, horizon: u64) -> Self {
        self.exploration.horizon = horizon;
        self
    }

    pub fn with_q_init(mut self, q_init: f64) -> Self {
        self.q_init = q_init;
        self
    }

    pub fn with_update_rule(mut self, rule: UpdateRule) -> Self {
        self.update_rule = rule;
        self
    }

    /// Enable a one-off table re-initialization at `cycle`.
    pub fn with_warmup_reset(mut self, cycle: u64) -> Self {
        self.warmup_reset_cycle = Some(cycle);
        self
    }

    pub fn with_max_states(mut self, max_states: usize) -> Self {
        self.max_states = max_states;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn num_params(&self) -> usize {
        self.ranges.len()
    }

    /// Check every bound and return the state encoder the configuration implies.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] or [`Error::StateSpaceTooLarge`].
    pub fn validate(&self) -> Result<StateEncoder> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::config(format!(
                "learning rate {} must lie in (0, 1]",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(Error::config(format!(
                "discount factor {} must lie in [0, 1]",
                self.discount_factor
            )));
        }
        if !self.q_init.is_finite() {
            return Err(Error::config("initial value must be finite"));
        }
        if self.warmup_reset_cycle == Some(0) {
            return Err(Error::config("warm-up reset cycle must be at least 1"));
        }
        self.exploration.validate()?;
        StateEncoder::new(&self.ranges, self.max_states)
    }

    /// Load a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config {}", path.display()),
            source,
        })?;
        Ok(serde_json::from_reader(file)?)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create config {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            ranges: vec![4, 4],
            learning_rate: 0.9,
            discount_factor: 0.4,
            exploration: ExplorationConfig::default(),
            q_init: 10.0,
            update_rule: UpdateRule::default(),
            warmup_reset_cycle: None,
            max_states: DEFAULT_MAX_STATES,
            seed: None,
        }
    }
}
