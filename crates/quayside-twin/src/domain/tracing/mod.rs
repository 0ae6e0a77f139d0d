//! Structured notifications
//!
//! The terminal reports every notable step (arrival, berth and crane grants,
//! container moves, hatch completion, departure) as a [`PortEvent`] pushed to
//! each registered [`EventSink`]. Formatting and persistence belong to the
//! sink; [`EventTracer`] simply keeps them in memory.

pub mod event;
pub mod tracer;

pub use event::{EventKind, InspectionPhase, PortEvent};
pub use tracer::{shared_tracer, EventLog, EventSink, EventTracer, SharedTracer, TracerConfig, TracingError};

/// Version of the event JSON format
pub const TRACING_FORMAT_VERSION: u32 = 1;

/// Maximum events per trace (default)
pub const DEFAULT_MAX_EVENTS: usize = 100_000;
