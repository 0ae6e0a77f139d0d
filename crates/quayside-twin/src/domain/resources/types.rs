//! Core Types for Resource Pools

use std::fmt;

/// Resource identifier (index into the kernel's resource table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub usize);

impl ResourceId {
    /// Create a new resource identifier
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

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Proof of holding one slot of a resource pool
///
/// A grant is a plain value: whoever holds it may release it, which is how a
/// crane slot acquired by one process is handed back by another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grant {
    resource: ResourceId,
    serial: u64,
}

impl Grant {
    pub(crate) const fn new(resource: ResourceId, serial: u64) -> Self {
        Self { resource, serial }
    }

    /// Pool this grant belongs to
    #[inline(always)]
    pub const fn resource(&self) -> ResourceId {
        self.resource
    }

    /// Per-pool serial number, unique for the lifetime of the pool
    #[inline(always)]
    pub const fn serial(&self) -> u64 {
        self.serial
    }
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.resource, self.serial)
    }
}

/// Error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    /// Resource ID out of bounds
    #[error("unknown resource {0}")]
    UnknownResource(ResourceId),

    /// Release of a grant the pool does not currently hold
    #[error("grant {grant} is not held by resource '{name}'")]
    InvalidRelease {
        /// Pool name
        name: String,
        /// The offending grant
        grant: Grant,
    },

    /// Pools must admit at least one holder
    #[error("resource '{name}' must have a capacity of at least 1")]
    ZeroCapacity {
        /// Pool name
        name: String,
    },
}
