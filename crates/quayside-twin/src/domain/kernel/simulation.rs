//! Simulation kernel
//!
//! ```text
//! Simulation<W>
//!   ├─ core: KernelCore<W>
//!   │    ├─ clock: VirtualClock<Wakeup>     time + pending wake-ups
//!   │    ├─ pools: ResourceTable            berths, cranes, ...
//!   │    └─ slots: Vec<Slot<W>>             process arena
//!   └─ world: W                             domain state
//! ```
//!
//! One event is handled at a time. The woken process is taken out of its
//! slot, resumed with a [`Context`] borrowing the core and the world, and put
//! back according to the [`Step`] it returns. Nothing else runs in between,
//! so every pool transition a process performs is atomic with respect to the
//! other processes.

use super::process::{Process, ProcessId, ProcessState, Step, Wake};
use crate::domain::clock::{ClockError, SimTime, VirtualClock};
use crate::domain::error::SimError;
use crate::domain::resources::{Grant, RequestOutcome, ResourceError, ResourceId, ResourcePool, ResourceTable};
use serde::Serialize;

/// Continuation stored on the clock
#[derive(Debug, Clone, Copy)]
pub struct Wakeup {
    /// Process to resume
    pub pid: ProcessId,
    /// Reason passed to [`Process::resume`]
    pub wake: Wake,
}

struct Slot<W> {
    label: String,
    state: ProcessState,
    process: Option<Box<dyn Process<W>>>,
}

/// Kernel state reachable from a running process
pub(crate) struct KernelCore<W> {
    clock: VirtualClock<Wakeup>,
    pools: ResourceTable,
    slots: Vec<Slot<W>>,
}

impl<W> KernelCore<W> {
    fn new() -> Self {
        Self {
            clock: VirtualClock::new(),
            pools: ResourceTable::new(),
            slots: Vec::new(),
        }
    }

    fn spawn(&mut self, process: Box<dyn Process<W>>) -> Result<ProcessId, ClockError> {
        let pid = ProcessId::new(self.slots.len());
        self.clock.schedule_after(0.0, Wakeup { pid, wake: Wake::Start })?;
        self.slots.push(Slot {
            label: process.label(),
            state: ProcessState::Scheduled,
            process: Some(process),
        });
        Ok(pid)
    }

    fn slot_mut(&mut self, pid: ProcessId) -> Result<&mut Slot<W>, SimError> {
        self.slots
            .get_mut(pid.as_usize())
            .ok_or(SimError::UnknownProcess(pid))
    }

    fn activate(&mut self, pid: ProcessId) -> Result<bool, SimError> {
        if self.slot_mut(pid)?.state != ProcessState::Passive {
            return Ok(false);
        }
        self.clock.schedule_after(0.0, Wakeup { pid, wake: Wake::Activated })?;
        self.slot_mut(pid)?.state = ProcessState::Scheduled;
        Ok(true)
    }

    fn release(&mut self, grant: Grant) -> Result<(), SimError> {
        let handed_over = self.pools.get_mut(grant.resource())?.release(grant)?;
        if let Some((next, next_grant)) = handed_over {
            self.clock.schedule_after(
                0.0,
                Wakeup {
                    pid: next,
                    wake: Wake::Granted(next_grant),
                },
            )?;
            self.slot_mut(next)?.state = ProcessState::Scheduled;
        }
        Ok(())
    }

    fn put_back(&mut self, pid: ProcessId, process: Box<dyn Process<W>>, state: ProcessState) {
        if let Some(slot) = self.slots.get_mut(pid.as_usize()) {
            slot.process = Some(process);
            slot.state = state;
        }
    }
}

/// Handle given to a process while it runs
pub struct Context<'a, W> {
    pid: ProcessId,
    core: &'a mut KernelCore<W>,
    world: &'a mut W,
}

impl<W: 'static> Context<'_, W> {
    /// Current simulation time
    pub fn now(&self) -> SimTime {
        self.core.clock.now()
    }

    /// Id of the running process
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Shared world state
    pub fn world(&self) -> &W {
        &*self.world
    }

    /// Shared world state, mutably
    pub fn world_mut(&mut self) -> &mut W {
        &mut *self.world
    }

    /// Spawn a new process; it starts at the current time, after every
    /// wake-up already queued for this instant
    ///
    /// # Errors
    /// Propagates clock scheduling failures.
    pub fn spawn<P: Process<W> + 'static>(&mut self, process: P) -> Result<ProcessId, SimError> {
        Ok(self.core.spawn(Box::new(process))?)
    }

    /// Wake a passive process at the current time
    ///
    /// Returns `false` (and does nothing) if the process is not passive.
    ///
    /// # Errors
    /// [`SimError::UnknownProcess`] for an id the kernel never issued.
    pub fn activate(&mut self, pid: ProcessId) -> Result<bool, SimError> {
        self.core.activate(pid)
    }

    /// Give a grant back to its pool; the next waiter, if any, is woken at
    /// the current time
    ///
    /// # Errors
    /// [`ResourceError::InvalidRelease`] if the grant is not held.
    pub fn release(&mut self, grant: Grant) -> Result<(), SimError> {
        self.core.release(grant)
    }

    /// Inspect a pool
    ///
    /// # Errors
    /// [`ResourceError::UnknownResource`] for an id never issued.
    pub fn pool(&self, id: ResourceId) -> Result<&ResourcePool, ResourceError> {
        self.core.pools.get(id)
    }
}

/// A process that returned an error and was dropped
#[derive(Debug, Clone)]
pub struct ProcessFailure {
    /// Failed process
    pub pid: ProcessId,
    /// Its label
    pub label: String,
    /// Simulation time of the failure
    pub time: SimTime,
    /// What went wrong
    pub error: SimError,
}

/// Summary returned by [`Simulation::run`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunReport {
    /// Events handled since the simulation was created
    pub events_processed: u64,
    /// Clock value when the run stopped
    pub final_time: SimTime,
    /// Processes that ran to completion
    pub completed: usize,
    /// Processes aborted by an error
    pub aborted: usize,
    /// Processes still suspended
    pub live: usize,
    /// Wake-ups left on the clock
    pub pending_events: usize,
}

/// Discrete-event simulation over world state `W`
pub struct Simulation<W> {
    core: KernelCore<W>,
    world: W,
    events_processed: u64,
    failures: Vec<ProcessFailure>,
}

impl<W: 'static> Simulation<W> {
    /// Create a simulation at time zero
    pub fn new(world: W) -> Self {
        Self {
            core: KernelCore::new(),
            world,
            events_processed: 0,
            failures: Vec::new(),
        }
    }

    /// Current simulation time
    pub fn now(&self) -> SimTime {
        self.core.clock.now()
    }

    /// World state
    pub fn world(&self) -> &W {
        &self.world
    }

    /// World state, mutably
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Consume the simulation, keeping the world
    pub fn into_world(self) -> W {
        self.world
    }

    /// Register a capacity-bounded pool
    ///
    /// # Errors
    /// [`ResourceError::ZeroCapacity`] if `capacity` is 0.
    pub fn add_resource(&mut self, name: impl Into<String>, capacity: usize) -> Result<ResourceId, ResourceError> {
        self.core.pools.add(name, capacity)
    }

    /// Inspect a pool
    ///
    /// # Errors
    /// [`ResourceError::UnknownResource`] for an id never issued.
    pub fn pool(&self, id: ResourceId) -> Result<&ResourcePool, ResourceError> {
        self.core.pools.get(id)
    }

    /// Every registered pool
    pub fn resources(&self) -> &ResourceTable {
        &self.core.pools
    }

    /// Spawn a process at the current time
    ///
    /// # Errors
    /// Propagates clock scheduling failures.
    pub fn spawn<P: Process<W> + 'static>(&mut self, process: P) -> Result<ProcessId, SimError> {
        Ok(self.core.spawn(Box::new(process))?)
    }

    /// State of a process
    pub fn process_state(&self, pid: ProcessId) -> Option<ProcessState> {
        self.core.slots.get(pid.as_usize()).map(|slot| slot.state)
    }

    /// Processes aborted so far
    pub fn failures(&self) -> &[ProcessFailure] {
        &self.failures
    }

    /// Whether no wake-up is pending
    pub fn is_idle(&self) -> bool {
        self.core.clock.is_idle()
    }

    /// Handle the next event, returning `false` if there was none
    pub fn step(&mut self) -> bool {
        let Some(event) = self.core.clock.tick() else {
            return false;
        };
        self.events_processed += 1;
        self.dispatch(event.payload.pid, event.payload.wake);
        true
    }

    /// Run until no event is pending or the next one is at or past `until`
    ///
    /// When the horizon stops the run, the clock is moved to `until`.
    pub fn run(&mut self, until: Option<SimTime>) -> RunReport {
        while let Some(next) = self.core.clock.peek_time() {
            if let Some(limit) = until {
                if next >= limit {
                    self.core.clock.advance_to(limit);
                    break;
                }
            }
            self.step();
        }
        self.report()
    }

    /// Run until no event is pending
    pub fn run_until_idle(&mut self) -> RunReport {
        self.run(None)
    }

    /// Snapshot of kernel counters
    pub fn report(&self) -> RunReport {
        let count = |wanted: ProcessState| {
            self.core
                .slots
                .iter()
                .filter(|slot| slot.state == wanted)
                .count()
        };
        RunReport {
            events_processed: self.events_processed,
            final_time: self.now(),
            completed: count(ProcessState::Finished),
            aborted: count(ProcessState::Aborted),
            live: self.core.slots.iter().filter(|slot| slot.state.is_alive()).count(),
            pending_events: self.core.clock.pending_events(),
        }
    }

    fn dispatch(&mut self, pid: ProcessId, mut wake: Wake) {
        loop {
            let Some(slot) = self.core.slots.get_mut(pid.as_usize()) else {
                tracing::warn!(%pid, "wake-up for unknown process");
                return;
            };
            let Some(mut process) = slot.process.take() else {
                tracing::debug!(%pid, ?wake, "wake-up for a process that already ended");
                return;
            };
            slot.state = ProcessState::Running;

            let result = {
                let mut cx = Context {
                    pid,
                    core: &mut self.core,
                    world: &mut self.world,
                };
                process.resume(wake, &mut cx)
            };

            match result {
                Ok(Step::Sleep(delay)) => {
                    self.core.put_back(pid, process, ProcessState::Scheduled);
                    if let Err(error) = self
                        .core
                        .clock
                        .schedule_after(delay, Wakeup { pid, wake: Wake::Timeout })
                    {
                        self.abort(pid, error.into());
                    }
                    return;
                }
                Ok(Step::Acquire(resource)) => {
                    let outcome = match self.core.pools.get_mut(resource) {
                        Ok(pool) => pool.request(pid),
                        Err(error) => {
                            self.abort(pid, error.into());
                            return;
                        }
                    };
                    match outcome {
                        RequestOutcome::Granted(grant) => {
                            self.core.put_back(pid, process, ProcessState::Running);
                            wake = Wake::Granted(grant);
                        }
                        RequestOutcome::Queued { position } => {
                            tracing::trace!(%pid, %resource, position, "queued for resource");
                            self.core.put_back(pid, process, ProcessState::Waiting(resource));
                            return;
                        }
                    }
                }
                Ok(Step::Passivate) => {
                    self.core.put_back(pid, process, ProcessState::Passive);
                    return;
                }
                Ok(Step::Finish) => {
                    if let Some(slot) = self.core.slots.get_mut(pid.as_usize()) {
                        slot.state = ProcessState::Finished;
                    }
                    return;
                }
                Err(error) => {
                    self.abort(pid, error);
                    return;
                }
            }
        }
    }

    fn abort(&mut self, pid: ProcessId, error: SimError) {
        let time = self.now();
        let Some(slot) = self.core.slots.get_mut(pid.as_usize()) else {
            return;
        };
        slot.state = ProcessState::Aborted;
        slot.process = None;
        tracing::error!(%pid, label = %slot.label, time, %error, "process aborted");
        self.failures.push(ProcessFailure {
            pid,
            label: slot.label.clone(),
            time,
            error,
        });
    }
}
