//! Process abstraction
//!
//! A process is a resumable state machine. Each call to
//! [`Process::resume`] runs the process from its saved continuation point up
//! to its next suspension point and returns a [`Step`] describing how it
//! wants to be woken again. The process keeps its own continuation in its
//! fields; the kernel only stores the boxed process and a [`Wake`] reason.

use super::simulation::Context;
use crate::domain::clock::SimTime;
use crate::domain::error::SimError;
use crate::domain::resources::{Grant, ResourceId};
use std::fmt;

/// Process identifier (index into the kernel's process arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(pub usize);

impl ProcessId {
    /// Create a new process identifier
    #[inline(always)]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying usize value
    #[inline(always)]
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Why a process is being resumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// First activation after spawn
    Start,
    /// A [`Step::Sleep`] elapsed
    Timeout,
    /// A [`Step::Acquire`] was satisfied
    Granted(Grant),
    /// Another process called [`Context::activate`] on a passive process
    Activated,
}

/// Suspension point returned from [`Process::resume`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Resume with [`Wake::Timeout`] after the given delay
    Sleep(SimTime),
    /// Resume with [`Wake::Granted`] once the pool has a slot for this process
    Acquire(ResourceId),
    /// Stay suspended until another process activates this one
    Passivate,
    /// Logic ran to completion; the process is dropped
    Finish,
}

/// Thread of control scheduled by the kernel
///
/// `W` is the world state shared by every process of a simulation.
pub trait Process<W> {
    /// Human-readable name used in logs and failure reports
    fn label(&self) -> String;

    /// Run until the next suspension point
    ///
    /// # Errors
    /// Any error aborts this process only; the kernel records it and keeps
    /// running the others.
    fn resume(&mut self, wake: Wake, cx: &mut Context<'_, W>) -> Result<Step, SimError>;
}

/// Lifecycle of a process slot in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// A wake-up is queued on the clock
    Scheduled,
    /// Currently executing
    Running,
    /// Queued on a resource pool
    Waiting(ResourceId),
    /// Suspended until activated
    Passive,
    /// Ran to completion
    Finished,
    /// Returned an error and was dropped
    Aborted,
}

impl ProcessState {
    /// Whether the process can still run
    pub fn is_alive(self) -> bool {
        !matches!(self, Self::Finished | Self::Aborted)
    }
}
