//! Domain Layer
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Domain Layer                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  Clock                         Kernel                       │
//! │  ├─ VirtualClock<P, B>         ├─ Simulation<W>             │
//! │  └─ HeapBackend                ├─ Process<W> / Step / Wake  │
//! │                                └─ Context                   │
//! │  Resources                                                  │
//! │  └─ ResourcePool (FIFO, capacity-bounded)                   │
//! │                                                             │
//! │  Port                          Yard                         │
//! │  ├─ Port / Terminal            ├─ YardPlanner               │
//! │  ├─ VesselProcess              ├─ YardBlock / Stack         │
//! │  ├─ CraneAssignment            ├─ ContainerLocationRegistry │
//! │  └─ HatchProcessing            └─ PlacementStrategy         │
//! │                                                             │
//! │  Tracing · Stats · Duration                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here performs I/O. Time is virtual and only moves when the
//! kernel pops the next wake-up, so a run is a pure function of its
//! configuration and seed.

pub mod clock;
pub mod duration;
pub mod error;
pub mod kernel;
pub mod port;
pub mod resources;
pub mod stats;
pub mod tracing;
pub mod yard;

pub use clock::{ClockBackend, ClockError, HeapBackend, ScheduledEvent, Sequence, SimTime, VirtualClock};
pub use duration::{DurationSource, Fixed};
pub use error::SimError;
pub use kernel::{Context, Process, ProcessFailure, ProcessId, ProcessState, RunReport, Simulation, Step, Wake};
pub use resources::{Grant, RequestOutcome, ResourceError, ResourceId, ResourcePool};
pub use stats::{Metric, StatsCollector, Summary};
