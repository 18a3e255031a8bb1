//! CLI infrastructure for the priority tuner
//!
//! This module provides the command-line interface for running the agent in
//! simulation and inspecting configurations.

pub mod commands;
pub mod output;
