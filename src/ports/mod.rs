//! Ports (trait boundaries) for external collaborators.
//!
//! The agent core only ever sees a scalar reading per cycle and returns an
//! action. These traits describe everything on the other side of that
//! boundary: the controller being driven, the measurement source feeding it,
//! and observers of the loop.

pub mod controller;
pub mod observer;
pub mod source;

pub use controller::Controller;
pub use observer::Observer;
pub use source::PerformanceSource;
