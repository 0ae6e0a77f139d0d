//! Berth and crane resources
//!
//! Both are kernel resource pools; these structs add the domain side:
//! names, who is being served, service-time sources and per-crane stats.
//! Relations to vessels are id lookups, never references.

use super::vessel::VesselId;
use crate::domain::duration::DurationSource;
use crate::domain::resources::ResourceId;
use crate::domain::stats::StatsCollector;
use serde::Serialize;
use std::fmt;

/// Index of a crane in the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CraneId(pub usize);

impl fmt::Display for CraneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Mooring resource shared by all vessels
#[derive(Debug)]
pub struct Berth {
    name: String,
    resource: ResourceId,
    capacity: usize,
    pub(crate) occupied_by: Vec<VesselId>,
}

impl Berth {
    pub(crate) fn new(name: String, resource: ResourceId, capacity: usize) -> Self {
        Self {
            name,
            resource,
            capacity,
            occupied_by: Vec::new(),
        }
    }

    /// Berth name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing kernel pool
    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    /// Simultaneous vessels
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Vessels currently moored, in grant order
    pub fn occupied_by(&self) -> &[VesselId] {
        &self.occupied_by
    }
}

/// Exclusive container-transfer resource
#[derive(Debug)]
pub struct Crane {
    name: String,
    resource: ResourceId,
    pub(crate) serving: Option<VesselId>,
    pub(crate) loading_time: Box<dyn DurationSource>,
    pub(crate) unloading_time: Box<dyn DurationSource>,
    pub(crate) stats: StatsCollector,
}

impl Crane {
    pub(crate) fn new(
        name: String,
        resource: ResourceId,
        loading_time: Box<dyn DurationSource>,
        unloading_time: Box<dyn DurationSource>,
    ) -> Self {
        Self {
            name,
            resource,
            serving: None,
            loading_time,
            unloading_time,
            stats: StatsCollector::new(),
        }
    }

    /// Crane name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing kernel pool (capacity 1)
    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    /// Vessel currently served, `None` when idle
    pub fn serving(&self) -> Option<VesselId> {
        self.serving
    }

    /// Loading/unloading samples of this crane
    pub fn stats(&self) -> &StatsCollector {
        &self.stats
    }
}
