//! Terminal world state and the port facade
//!
//! [`Terminal`] is the world `W` every process of a port simulation
//! borrows: berth, cranes, vessels, schedule, yard and the run's random
//! stream. [`Port`] wraps a `Simulation<Terminal>` with the bootstrap
//! operations (add cranes, vessels, schedule entries) and
//! [`Port::process_arrivals`].

use super::berth::{Berth, Crane, CraneId};
use super::lifecycle::VesselProcess;
use super::vessel::{Vessel, VesselId};
use crate::domain::clock::SimTime;
use crate::domain::duration::DurationSource;
use crate::domain::error::SimError;
use crate::domain::kernel::{RunReport, Simulation};
use crate::domain::resources::{ResourceError, ResourceId};
use crate::domain::stats::StatsCollector;
use crate::domain::tracing::{EventKind, EventSink, PortEvent};
use crate::domain::yard::{Container, ContainerFactory, YardBlock, YardPlanner};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// What a crane does with a discharged container the yard cannot take
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementFailurePolicy {
    /// Warn, notify, keep the container aside and carry on
    #[default]
    Skip,
    /// Abort the crane's process with the yard error
    Abort,
}

/// One scheduled port call
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    /// Calling vessel
    pub vessel: VesselId,
    /// Arrival time
    pub arrival_time: SimTime,
    /// Berthing point (informational)
    pub berth_position: u32,
    /// Names of the cranes to work the vessel
    pub cranes: Vec<String>,
    /// Pre-inspection duration
    pub pre_pcat: SimTime,
    /// Post-inspection duration
    pub post_pcat: SimTime,
}

/// Shared state of a port simulation
#[derive(Debug)]
pub struct Terminal {
    pub(crate) berth: Berth,
    pub(crate) cranes: Vec<Crane>,
    pub(crate) vessels: Vec<Vessel>,
    pub(crate) schedule: Vec<ScheduleEntry>,
    pub(crate) yard: YardPlanner,
    pub(crate) factory: ContainerFactory,
    pub(crate) rng: StdRng,
    pub(crate) stats: StatsCollector,
    pub(crate) placement_failure: PlacementFailurePolicy,
    pub(crate) unplaced: Vec<Container>,
    sinks: Vec<Box<dyn EventSink>>,
}

impl Terminal {
    /// Berth
    pub fn berth(&self) -> &Berth {
        &self.berth
    }

    /// Cranes in registration order
    pub fn cranes(&self) -> &[Crane] {
        &self.cranes
    }

    /// Vessels in registration order
    pub fn vessels(&self) -> &[Vessel] {
        &self.vessels
    }

    /// Port calls in insertion order
    pub fn schedule(&self) -> &[ScheduleEntry] {
        &self.schedule
    }

    /// Storage yard
    pub fn yard(&self) -> &YardPlanner {
        &self.yard
    }

    /// Mutable storage yard
    pub fn yard_mut(&mut self) -> &mut YardPlanner {
        &mut self.yard
    }

    /// Berth-level statistics (waiting and turnaround times)
    pub fn stats(&self) -> &StatsCollector {
        &self.stats
    }

    /// Containers created so far
    pub fn containers_created(&self) -> u64 {
        self.factory.issued()
    }

    /// Discharged containers the yard could not take
    pub fn unplaced(&self) -> &[Container] {
        &self.unplaced
    }

    /// Crane registered under `name`
    pub fn crane_by_name(&self, name: &str) -> Option<CraneId> {
        self.cranes.iter().position(|c| c.name() == name).map(CraneId)
    }

    /// Vessel registered under `name`
    pub fn vessel_by_name(&self, name: &str) -> Option<VesselId> {
        self.vessels.iter().position(|v| v.name() == name).map(VesselId)
    }

    /// Vessel by id
    pub fn vessel(&self, id: VesselId) -> Option<&Vessel> {
        self.vessels.get(id.0)
    }

    /// Crane by id
    pub fn crane(&self, id: CraneId) -> Option<&Crane> {
        self.cranes.get(id.0)
    }

    pub(crate) fn vessel_mut(&mut self, id: VesselId) -> Result<&mut Vessel, SimError> {
        self.vessels.get_mut(id.0).ok_or(SimError::UnknownVessel(id))
    }

    pub(crate) fn crane_mut(&mut self, id: CraneId) -> Result<&mut Crane, SimError> {
        self.cranes.get_mut(id.0).ok_or(SimError::UnknownCrane(id))
    }

    pub(crate) fn vessel_name(&self, id: VesselId) -> String {
        self.vessel(id).map(|v| v.name().to_owned()).unwrap_or_else(|| id.to_string())
    }

    pub(crate) fn crane_name(&self, id: CraneId) -> String {
        self.crane(id).map(|c| c.name().to_owned()).unwrap_or_else(|| id.to_string())
    }

    /// Fan a notification out to every sink
    pub(crate) fn emit(&mut self, time: SimTime, kind: EventKind) {
        let event = PortEvent { time, kind };
        tracing::debug!(time, kind = event.kind.name(), vessel = event.kind.vessel(), "port event");
        for sink in &mut self.sinks {
            sink.record(&event);
        }
    }
}

/// A port simulation ready to be populated and run
pub struct Port {
    sim: Simulation<Terminal>,
    dispatched: usize,
}

impl std::fmt::Debug for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Port")
            .field("now", &self.sim.now())
            .field("dispatched", &self.dispatched)
            .finish_non_exhaustive()
    }
}

impl Port {
    /// Create a port with its single berth
    ///
    /// # Errors
    /// [`ResourceError::ZeroCapacity`] for a zero-capacity berth.
    pub fn new(
        berth_name: impl Into<String>,
        berth_capacity: usize,
        yard: YardPlanner,
        seed: u64,
    ) -> Result<Self, ResourceError> {
        let berth_name = berth_name.into();
        let mut sim = Simulation::new(Terminal {
            berth: Berth::new(berth_name.clone(), ResourceId(0), berth_capacity),
            cranes: Vec::new(),
            vessels: Vec::new(),
            schedule: Vec::new(),
            yard,
            factory: ContainerFactory::new(),
            rng: StdRng::seed_from_u64(seed),
            stats: StatsCollector::new(),
            placement_failure: PlacementFailurePolicy::default(),
            unplaced: Vec::new(),
            sinks: Vec::new(),
        });
        let resource = sim.add_resource(berth_name.clone(), berth_capacity)?;
        sim.world_mut().berth = Berth::new(berth_name, resource, berth_capacity);
        Ok(Self { sim, dispatched: 0 })
    }

    /// Register a crane (capacity-1 pool)
    ///
    /// # Errors
    /// Propagates pool creation errors.
    pub fn add_crane(
        &mut self,
        name: impl Into<String>,
        loading_time: Box<dyn DurationSource>,
        unloading_time: Box<dyn DurationSource>,
    ) -> Result<CraneId, ResourceError> {
        let name = name.into();
        let resource = self.sim.add_resource(name.clone(), 1)?;
        let cranes = &mut self.sim.world_mut().cranes;
        cranes.push(Crane::new(name, resource, loading_time, unloading_time));
        Ok(CraneId(cranes.len() - 1))
    }

    /// Register a yard block; placement scans blocks in this order
    pub fn add_block(&mut self, block: YardBlock) {
        self.sim.world_mut().yard.add_block(block);
    }

    /// Register a vessel
    pub fn add_vessel(&mut self, vessel: Vessel) -> VesselId {
        let vessels = &mut self.sim.world_mut().vessels;
        vessels.push(vessel);
        VesselId(vessels.len() - 1)
    }

    /// Append a port call
    ///
    /// Crane names are resolved when the vessel starts cargo operations,
    /// and the arrival time is only compared with the clock at dispatch.
    /// A vessel makes at most one call per run: its berth grant, crane
    /// bookkeeping and process handle live on the vessel itself.
    ///
    /// # Errors
    /// [`SimError::UnknownVessel`] if `entry.vessel` is not registered,
    /// [`SimError::AlreadyScheduled`] if it already has a call.
    pub fn add_schedule(&mut self, entry: ScheduleEntry) -> Result<(), SimError> {
        let world = self.sim.world_mut();
        if world.vessel(entry.vessel).is_none() {
            return Err(SimError::UnknownVessel(entry.vessel));
        }
        if world.schedule.iter().any(|call| call.vessel == entry.vessel) {
            return Err(SimError::AlreadyScheduled(entry.vessel));
        }
        world.schedule.push(entry);
        Ok(())
    }

    /// Attach a notification sink
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sim.world_mut().sinks.push(sink);
    }

    /// Choose how cranes react to a full yard
    pub fn set_placement_failure_policy(&mut self, policy: PlacementFailurePolicy) {
        self.sim.world_mut().placement_failure = policy;
    }

    /// Spawn one vessel process per not-yet-dispatched schedule entry
    ///
    /// # Errors
    /// Propagates kernel spawn errors.
    pub fn process_arrivals(&mut self) -> Result<usize, SimError> {
        let total = self.sim.world().schedule.len();
        let start = self.dispatched;
        for index in start..total {
            let vessel = self.sim.world().schedule[index].vessel;
            let label = format!("vessel:{}", self.sim.world().vessel_name(vessel));
            let pid = self.sim.spawn(VesselProcess::new(index, vessel, label))?;
            self.sim.world_mut().vessel_mut(vessel)?.process = Some(pid);
        }
        self.dispatched = total;
        Ok(total - start)
    }

    /// Run the kernel; see [`Simulation::run`]
    pub fn run(&mut self, until: Option<SimTime>) -> RunReport {
        self.sim.run(until)
    }

    /// World state
    pub fn terminal(&self) -> &Terminal {
        self.sim.world()
    }

    /// Mutable world state
    pub fn terminal_mut(&mut self) -> &mut Terminal {
        self.sim.world_mut()
    }

    /// Underlying kernel
    pub fn simulation(&self) -> &Simulation<Terminal> {
        &self.sim
    }

    /// Current simulation time
    pub fn now(&self) -> SimTime {
        self.sim.now()
    }

    /// Consume the port, keeping the world
    pub fn into_terminal(self) -> Terminal {
        self.sim.into_world()
    }
}
