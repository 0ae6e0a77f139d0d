//! Errors that abort a simulation process

use crate::domain::clock::ClockError;
use crate::domain::kernel::{ProcessId, Wake};
use crate::domain::port::{CraneId, HatchError, VesselId};
use crate::domain::resources::ResourceError;
use crate::domain::yard::YardError;
use thiserror::Error;

/// Failure returned by [`Process::resume`](crate::domain::kernel::Process::resume)
///
/// The kernel drops the offending process and records the error; other
/// processes keep running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Scheduling rejected by the clock
    #[error(transparent)]
    Clock(#[from] ClockError),

    /// Resource protocol violation
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Yard operation failed
    #[error(transparent)]
    Yard(#[from] YardError),

    /// Malformed hatch profile
    #[error(transparent)]
    Hatch(#[from] HatchError),

    /// Process id the kernel never issued
    #[error("unknown process {0}")]
    UnknownProcess(ProcessId),

    /// A process was resumed for a reason its current state cannot handle
    #[error("{process} cannot handle wake-up {wake:?}")]
    UnexpectedWake {
        /// Process label and state
        process: String,
        /// Offending wake reason
        wake: Wake,
    },

    /// Vessel id not registered with the terminal
    #[error("unknown vessel {0}")]
    UnknownVessel(VesselId),

    /// Vessel already has a port call on the schedule
    #[error("vessel {0} is already scheduled")]
    AlreadyScheduled(VesselId),

    /// Crane id not registered with the terminal
    #[error("unknown crane {0}")]
    UnknownCrane(CraneId),
}
