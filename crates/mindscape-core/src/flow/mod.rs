//! Interval timer alternating flow and break phases.

mod engine;

pub use engine::{format_duration, FlowPhase, FlowState, FlowTimer, MAX_DURATION_SECS};
