//! Vessels and their lifecycle states

use super::berth::CraneId;
use super::hatch::{HatchProfile, Operation};
use crate::domain::clock::SimTime;
use crate::domain::kernel::ProcessId;
use crate::domain::resources::Grant;
use serde::Serialize;
use std::fmt;

/// Index of a vessel in the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VesselId(pub usize);

impl fmt::Display for VesselId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Port-call state machine
///
/// ```text
/// Scheduled → Arrived → AwaitingBerth → PreInspecting → OperatingCargo
///           → AwaitingCraneRelease → PostInspecting → Departed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VesselState {
    /// Waiting for the arrival time
    Scheduled,
    /// At the terminal
    Arrived,
    /// Queued for the berth
    AwaitingBerth,
    /// Holding the berth, inspection running
    PreInspecting,
    /// Crane assignments in progress
    OperatingCargo,
    /// Some cranes released, others still held or queued
    AwaitingCraneRelease,
    /// All cranes released, inspection running
    PostInspecting,
    /// Berth released
    Departed,
}

/// A vessel and its port-call bookkeeping
#[derive(Debug, Clone)]
pub struct Vessel {
    name: String,
    length: f64,
    width: f64,
    pub(crate) pre_pcat: SimTime,
    pub(crate) post_pcat: SimTime,
    pub(crate) arrival_time: SimTime,
    hatch_profiles: Vec<HatchProfile>,
    finished_hatches: usize,
    finished_hatch_profiles: Vec<HatchProfile>,
    pub(crate) state: VesselState,
    pub(crate) berth_grant: Option<Grant>,
    pub(crate) crane_grants: Vec<(CraneId, Grant)>,
    pub(crate) pending_cranes: usize,
    pub(crate) process: Option<ProcessId>,
    pub(crate) arrived_at: Option<SimTime>,
    pub(crate) berthed_at: Option<SimTime>,
    pub(crate) departed_at: Option<SimTime>,
}

impl Vessel {
    /// Default length in metres
    pub const DEFAULT_LENGTH: f64 = 300.0;
    /// Default width in metres
    pub const DEFAULT_WIDTH: f64 = 30.0;

    /// New vessel with no hatches
    pub fn new(name: impl Into<String>, length: f64, width: f64) -> Self {
        Self {
            name: name.into(),
            length,
            width,
            pre_pcat: 0.0,
            post_pcat: 0.0,
            arrival_time: 0.0,
            hatch_profiles: Vec::new(),
            finished_hatches: 0,
            finished_hatch_profiles: Vec::new(),
            state: VesselState::Scheduled,
            berth_grant: None,
            crane_grants: Vec::new(),
            pending_cranes: 0,
            process: None,
            arrived_at: None,
            berthed_at: None,
            departed_at: None,
        }
    }

    /// Append a hatch; the last added is worked first
    pub fn add_hatch_profile(&mut self, profile: HatchProfile) {
        self.hatch_profiles.push(profile);
    }

    /// Name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length in metres
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Width in metres
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Pre-inspection duration of the current port call
    pub fn pre_pcat(&self) -> SimTime {
        self.pre_pcat
    }

    /// Post-inspection duration of the current port call
    pub fn post_pcat(&self) -> SimTime {
        self.post_pcat
    }

    /// Scheduled arrival
    pub fn arrival_time(&self) -> SimTime {
        self.arrival_time
    }

    /// Hatches still to be worked
    pub fn hatch_profiles(&self) -> &[HatchProfile] {
        &self.hatch_profiles
    }

    /// Number of worked hatches
    pub fn finished_hatches(&self) -> usize {
        self.finished_hatches
    }

    /// Worked hatches, in completion order
    pub fn finished_hatch_profiles(&self) -> &[HatchProfile] {
        &self.finished_hatch_profiles
    }

    /// Lifecycle state
    pub fn state(&self) -> VesselState {
        self.state
    }

    /// Berth grant while moored
    pub fn berth_grant(&self) -> Option<Grant> {
        self.berth_grant
    }

    /// Cranes currently bound to this vessel
    pub fn held_cranes(&self) -> impl Iterator<Item = CraneId> + '_ {
        self.crane_grants.iter().map(|(crane, _)| *crane)
    }

    /// Crane assignments queued but not yet granted
    pub fn pending_cranes(&self) -> usize {
        self.pending_cranes
    }

    /// Arrival timestamp
    pub fn arrived_at(&self) -> Option<SimTime> {
        self.arrived_at
    }

    /// Berth grant timestamp
    pub fn berthed_at(&self) -> Option<SimTime> {
        self.berthed_at
    }

    /// Departure timestamp
    pub fn departed_at(&self) -> Option<SimTime> {
        self.departed_at
    }

    /// Summed `(min, max)` containers to load over pending hatches
    pub fn load_range(&self) -> (u32, u32) {
        self.range(Operation::Load)
    }

    /// Summed `(min, max)` containers to discharge over pending hatches
    pub fn discharge_range(&self) -> (u32, u32) {
        self.range(Operation::Discharge)
    }

    fn range(&self, operation: Operation) -> (u32, u32) {
        self.hatch_profiles
            .iter()
            .map(|h| h.range(operation))
            .fold((0, 0), |(lo, hi), (a, b)| (lo + a, hi + b))
    }

    pub(crate) fn take_hatch(&mut self) -> Option<HatchProfile> {
        self.hatch_profiles.pop()
    }

    pub(crate) fn finish_hatch(&mut self, hatch: HatchProfile) {
        self.finished_hatches += 1;
        self.finished_hatch_profiles.push(hatch);
    }

    /// No crane held and none queued
    pub(crate) fn cranes_done(&self) -> bool {
        self.crane_grants.is_empty() && self.pending_cranes == 0
    }
}

impl fmt::Display for Vessel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vessel: {}, Length: {}, Width: {}", self.name, self.length, self.width)
    }
}
