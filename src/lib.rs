//! Tabular reinforcement-learning tuner for integer priority knobs
//!
//! This crate provides:
//! - Mixed-radix discretization of a small set of integer parameters
//! - Epsilon-greedy action selection with boundary masking
//! - Q-learning and SARSA value updates over a dense table
//! - A control loop and observers for driving the agent against a
//!   performance source (hardware counter, simulator, or test script)
//!
//! The agent sees nothing but one scalar reading per cycle, higher is better,
//! and answers with one adjustment: raise or lower a single parameter by one
//! level, or hold.

pub mod action;
pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod state;

pub use action::Action;
pub use config::{AgentConfig, ExplorationConfig, UpdateRule};
pub use error::{Error, Result};
pub use q_learning::{Agent, Step};
pub use state::StateEncoder;
