//! Event Kernel
//!
//! Cooperative, single-threaded process scheduling on top of the
//! [`VirtualClock`](crate::domain::clock::VirtualClock).
//!
//! Suspension points:
//! - [`Step::Sleep`]: timed wait
//! - [`Step::Acquire`]: resource request that may queue
//! - [`Step::Passivate`]: wait until another process reports completion
//!
//! Processes are never cancelled; once spawned they run until they return
//! [`Step::Finish`] or an error.

mod process;
mod simulation;

pub use process::{Process, ProcessId, ProcessState, Step, Wake};
pub use simulation::{Context, ProcessFailure, RunReport, Simulation, Wakeup};
