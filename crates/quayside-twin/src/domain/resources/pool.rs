//! Capacity-bounded FIFO pools
//!
//! ```text
//!            request(pid)
//!                 │
//!     holders < capacity ? ──yes──► Granted(grant)       (fast path)
//!                 │ no
//!                 ▼
//!          queue.push_back(pid) ──► Queued
//!
//!            release(grant)
//!                 │
//!     holders.remove(grant)  (InvalidRelease if absent)
//!                 │
//!     queue.pop_front() ──► Some((pid, new grant))        (hand-over)
//! ```
//!
//! A freed slot is handed to the head of the queue inside `release`, before
//! any other request can observe it, so waiters are served strictly in
//! arrival order.

use super::types::{Grant, ResourceError, ResourceId};
use crate::domain::kernel::ProcessId;
use std::collections::VecDeque;

/// Result of a resource request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Slot granted immediately
    Granted(Grant),

    /// Requester appended to the waiting queue
    Queued {
        /// Zero-based position in the queue
        position: usize,
    },
}

/// A single capacity-bounded pool
#[derive(Debug)]
pub struct ResourcePool {
    id: ResourceId,
    name: String,
    capacity: usize,
    holders: Vec<Grant>,
    queue: VecDeque<ProcessId>,
    next_serial: u64,
}

impl ResourcePool {
    /// Create an empty pool
    ///
    /// # Errors
    /// [`ResourceError::ZeroCapacity`] if `capacity` is 0.
    pub fn new(id: ResourceId, name: impl Into<String>, capacity: usize) -> Result<Self, ResourceError> {
        let name = name.into();
        if capacity == 0 {
            return Err(ResourceError::ZeroCapacity { name });
        }
        Ok(Self {
            id,
            name,
            capacity,
            holders: Vec::with_capacity(capacity),
            queue: VecDeque::new(),
            next_serial: 0,
        })
    }

    /// Pool identifier
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Pool name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum number of concurrent holders
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Grants currently held
    pub fn holders(&self) -> &[Grant] {
        &self.holders
    }

    /// Number of current holders
    pub fn count(&self) -> usize {
        self.holders.len()
    }

    /// Processes waiting for a slot, head first
    pub fn waiting(&self) -> impl Iterator<Item = ProcessId> + '_ {
        self.queue.iter().copied()
    }

    /// Number of waiting processes
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Whether `grant` is currently held
    pub fn is_held(&self, grant: Grant) -> bool {
        self.holders.contains(&grant)
    }

    fn issue(&mut self) -> Grant {
        let grant = Grant::new(self.id, self.next_serial);
        self.next_serial += 1;
        self.holders.push(grant);
        grant
    }

    /// Request a slot on behalf of `requester`
    pub fn request(&mut self, requester: ProcessId) -> RequestOutcome {
        if self.holders.len() < self.capacity && self.queue.is_empty() {
            return RequestOutcome::Granted(self.issue());
        }
        self.queue.push_back(requester);
        RequestOutcome::Queued {
            position: self.queue.len() - 1,
        }
    }

    /// Release `grant`, handing the freed slot to the head of the queue
    ///
    /// Returns the process that received the slot, with its new grant.
    ///
    /// # Errors
    /// [`ResourceError::InvalidRelease`] if `grant` is not currently held.
    pub fn release(&mut self, grant: Grant) -> Result<Option<(ProcessId, Grant)>, ResourceError> {
        let Some(index) = self.holders.iter().position(|held| *held == grant) else {
            return Err(ResourceError::InvalidRelease {
                name: self.name.clone(),
                grant,
            });
        };
        self.holders.swap_remove(index);

        Ok(self.queue.pop_front().map(|next| (next, self.issue())))
    }
}

/// All pools registered with a simulation
#[derive(Debug, Default)]
pub struct ResourceTable {
    pools: Vec<ResourcePool>,
}

impl ResourceTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pool
    ///
    /// # Errors
    /// [`ResourceError::ZeroCapacity`] if `capacity` is 0.
    pub fn add(&mut self, name: impl Into<String>, capacity: usize) -> Result<ResourceId, ResourceError> {
        let id = ResourceId::new(self.pools.len());
        self.pools.push(ResourcePool::new(id, name, capacity)?);
        Ok(id)
    }

    /// Look up a pool
    ///
    /// # Errors
    /// [`ResourceError::UnknownResource`] for an id this table never issued.
    pub fn get(&self, id: ResourceId) -> Result<&ResourcePool, ResourceError> {
        self.pools.get(id.as_usize()).ok_or(ResourceError::UnknownResource(id))
    }

    /// Look up a pool mutably
    ///
    /// # Errors
    /// [`ResourceError::UnknownResource`] for an id this table never issued.
    pub fn get_mut(&mut self, id: ResourceId) -> Result<&mut ResourcePool, ResourceError> {
        self.pools
            .get_mut(id.as_usize())
            .ok_or(ResourceError::UnknownResource(id))
    }

    /// Iterate over every pool
    pub fn iter(&self) -> impl Iterator<Item = &ResourcePool> {
        self.pools.iter()
    }

    /// Number of pools
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Whether no pool has been registered
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(n: usize) -> ProcessId {
        ProcessId::new(n)
    }

    #[test]
    fn test_fast_path_until_full() {
        let mut pool = ResourcePool::new(ResourceId::new(0), "Berth1", 2).unwrap();

        assert!(matches!(pool.request(pid(0)), RequestOutcome::Granted(_)));
        assert!(matches!(pool.request(pid(1)), RequestOutcome::Granted(_)));
        assert_eq!(pool.request(pid(2)), RequestOutcome::Queued { position: 0 });
        assert_eq!(pool.request(pid(3)), RequestOutcome::Queued { position: 1 });
        assert_eq!(pool.count(), 2);
        assert_eq!(pool.queue_len(), 2);
    }

    #[test]
    fn test_release_hands_slot_to_queue_head() {
        let mut pool = ResourcePool::new(ResourceId::new(0), "Crane1", 1).unwrap();
        let RequestOutcome::Granted(first) = pool.request(pid(0)) else {
            panic!("expected immediate grant");
        };
        pool.request(pid(1));
        pool.request(pid(2));

        let (next, second) = pool.release(first).unwrap().unwrap();
        assert_eq!(next, pid(1));
        assert!(pool.is_held(second));
        assert!(!pool.is_held(first));
        assert_eq!(pool.count(), 1);

        let (next, third) = pool.release(second).unwrap().unwrap();
        assert_eq!(next, pid(2));
        assert_eq!(pool.release(third).unwrap(), None);
        assert_eq!(pool.count(), 0);
    }

    #[test]
    fn test_double_release_is_rejected() {
        let mut pool = ResourcePool::new(ResourceId::new(3), "Crane2", 1).unwrap();
        let RequestOutcome::Granted(grant) = pool.request(pid(0)) else {
            panic!("expected immediate grant");
        };
        pool.release(grant).unwrap();

        let err = pool.release(grant).unwrap_err();
        assert!(matches!(err, ResourceError::InvalidRelease { .. }));
    }

    #[test]
    fn test_foreign_grant_is_rejected() {
        let mut table = ResourceTable::new();
        let a = table.add("A", 1).unwrap();
        let b = table.add("B", 1).unwrap();

        let RequestOutcome::Granted(grant_a) = table.get_mut(a).unwrap().request(pid(0)) else {
            panic!("expected immediate grant");
        };
        assert!(table.get_mut(b).unwrap().release(grant_a).is_err());
        assert!(table.get(a).unwrap().is_held(grant_a));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut table = ResourceTable::new();
        assert_eq!(
            table.add("Empty", 0),
            Err(ResourceError::ZeroCapacity { name: "Empty".into() })
        );
        assert!(table.is_empty());
        assert!(table.get(ResourceId::new(7)).is_err());
    }
}
