//! Container location index
//!
//! One registry exists per simulation run. It is owned by the
//! [`YardPlanner`](super::YardPlanner) and lent to each block, and maps a
//! container id to its last known position. It never owns containers.
//! Entries are only written or removed by explicit store/relocate/remove
//! calls; nothing expires on its own.

use super::container::{ContainerId, Location};
use dashmap::DashMap;

/// Concurrent id → location map
#[derive(Debug, Default)]
pub struct ContainerLocationRegistry {
    locations: DashMap<ContainerId, Location>,
}

impl ContainerLocationRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) a position
    pub fn register(&self, id: ContainerId, location: Location) {
        self.locations.insert(id, location);
    }

    /// Last known position
    pub fn location(&self, id: ContainerId) -> Option<Location> {
        self.locations.get(&id).map(|entry| entry.value().clone())
    }

    /// Forget a container
    pub fn remove(&self, id: ContainerId) -> Option<Location> {
        self.locations.remove(&id).map(|(_, location)| location)
    }

    /// Number of tracked containers
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
