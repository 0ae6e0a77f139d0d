//! Port operations: berth, cranes, vessels and their processes
//!
//! ```text
//! schedule ──▶ VesselProcess ──acquire──▶ Berth
//!                   │
//!                   └─spawn──▶ CraneAssignment ──acquire──▶ Crane
//!                                    │
//!                                    └─spawn──▶ HatchProcessing ──▶ YardPlanner
//! ```
//!
//! Completion flows back the other way: the last crane release activates
//! the vessel, which runs post-inspection and releases the berth.

pub mod berth;
pub mod crane_ops;
pub mod hatch;
pub mod lifecycle;
pub mod terminal;
pub mod vessel;

pub use berth::{Berth, Crane, CraneId};
pub use crane_ops::{CraneAssignment, HatchProcessing};
pub use hatch::{HatchError, HatchProfile, HatchRow, Operation};
pub use lifecycle::VesselProcess;
pub use terminal::{PlacementFailurePolicy, Port, ScheduleEntry, Terminal};
pub use vessel::{Vessel, VesselId, VesselState};
