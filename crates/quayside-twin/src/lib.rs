//! Quayside Digital Twin
//!
//! # Overview
//!
//! `quayside-twin` is a deterministic discrete-event simulator of a
//! container terminal. Vessels arrive on a schedule, contend for a
//! capacity-limited berth and a pool of exclusive cranes, and exchange
//! containers with a stacked storage yard.
//!
//! # Layers
//!
//! - **Domain**: event kernel, resource pools, vessel and crane processes,
//!   yard stacking and retrieval
//! - **Infrastructure**: service-time distributions and JSON scenarios
//! - **Adapters**: scenario bootstrap and run summaries
//!
//! # Guarantees
//!
//! - Simulation time never decreases; events at the same instant run in
//!   the order they were scheduled
//! - Exactly one process runs at a time, so pool transitions are atomic
//! - A pool never has more holders than its capacity, and waiters are
//!   served first come, first served
//! - A yard stack exceeds its tier bound only while a retrieval parks a
//!   container on it
//! - The same configuration and seed always produce the same event
//!   sequence
//!
//! # Usage
//!
//! ```rust
//! use quayside_twin::adapters::run_scenario;
//! use quayside_twin::domain::tracing::{shared_tracer, EventSink};
//! use quayside_twin::infrastructure::{DurationSpec, ScenarioConfig};
//!
//! let mut config = ScenarioConfig::default();
//! config.until = None;
//! for crane in &mut config.cranes {
//!     crane.loading_time = DurationSpec::Fixed { value: 1.0 };
//!     crane.unloading_time = DurationSpec::Fixed { value: 1.0 };
//! }
//!
//! let tracer = shared_tracer();
//! let sink: Box<dyn EventSink> = Box::new(tracer.clone());
//! let run = run_scenario(&config, vec![sink]).unwrap();
//! assert_eq!(run.outcome.departed, 2);
//! assert!(!tracer.lock().is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod adapters;
pub mod domain;
pub mod infrastructure;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Re-export Primary Types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

// Kernel types
pub use domain::{Context, Process, ProcessId, RunReport, SimError, SimTime, Simulation, Step, VirtualClock, Wake};

// Port types
pub use domain::port::{Port, ScheduleEntry, Terminal, Vessel, VesselState};

// Yard types
pub use domain::yard::{Container, ContainerId, ContainerSize, ContainerType, YardBlock, YardError, YardPlanner};

// Bootstrap
pub use adapters::{run_scenario, RunOutcome};
pub use infrastructure::ScenarioConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_defined() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_primary_types_exported() {
        let _pid = ProcessId::new(0);
        let _size = ContainerSize::FortyFt;
        let _state = VesselState::Scheduled;
        let config = ScenarioConfig::default();
        assert_eq!(config.vessels.len(), 2);
    }
}
