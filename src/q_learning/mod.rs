//! Q-learning and SARSA temporal difference control
//!
//! This module implements the tabular learning agent that tunes integer
//! priority knobs. Every cycle the agent turns a performance reading into a
//! reward (the delta since the previous reading), updates its value table,
//! and emits the next adjustment.
//!
//! ## Algorithms
//!
//! - **Q-learning**: Off-policy TD control, updates the pair just taken
//!   toward the best legal next action
//! - **SARSA**: On-policy TD control, updates the previous pair toward the
//!   action actually chosen next, one cycle later
//!
//! ## Key Differences
//!
//! | Aspect | Q-learning | SARSA |
//! |--------|------------|-------|
//! | Policy | Off-policy (learns Q*) | On-policy (learns Q^π) |
//! | Update | Uses max_a' Q(s',a') over legal a' | Uses Q(s,a) of the chosen action |
//! | Timing | Same cycle | Deferred by one cycle |
//! | First cycle | Updates | Records only |
//!
//! ## Usage Example
//!
//! ```no_run
//! use priority_tuner::{
//!     config::{AgentConfig, UpdateRule},
//!     q_learning::Agent,
//! };
//!
//! let mut agent = Agent::new(
//!     AgentConfig::uniform(4, 4)
//!         .with_update_rule(UpdateRule::Sarsa)
//!         .with_learning_rate(0.3)
//!         .with_discount_factor(0.7),
//! )?;
//!
//! let ipc = 1.7; // read from a performance counter
//! let step = agent.step(ipc)?;
//! // apply step.levels to the hardware
//! # Ok::<(), priority_tuner::Error>(())
//! ```
//!
//! ## Scaling
//!
//! The table holds `Π ranges[i]` rows of `2 * num_params + 1` values, which is
//! exponential in the number of parameters; `AgentConfig::max_states` caps it.

pub mod agent;
pub mod exploration;
pub mod policy;
pub mod q_table;

// Public re-exports
pub use agent::{Agent, Step, Transition};
pub use exploration::ExplorationSchedule;
pub use policy::{EpsilonGreedy, Selection};
pub use q_table::QTable;
