//! Adapters implementing the performance-source port.
//!
//! Real deployments read a hardware counter; these adapters stand in for the
//! controlled subsystem in simulations and tests.

pub mod replay;
pub mod synthetic;

pub use replay::ReplaySource;
pub use synthetic::PeakSurface;
