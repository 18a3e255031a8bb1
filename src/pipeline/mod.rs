//! Control-loop pipeline abstractions
//!
//! This module provides:
//! - A closed loop driving a controller against a performance source
//! - Observers recording progress, metrics, and per-cycle traces

pub mod control_loop;
pub mod observers;

pub use control_loop::{ControlLoop, DEFAULT_STOP_EPSILON, LoopConfig, RunResult};
// Re-export observer implementations (adapters)
pub use observers::{
    JsonlObserver, LoopMetrics, MetricsObserver, ProgressObserver, StepObservation,
};

pub use crate::ports::{Controller, Observer, PerformanceSource};
