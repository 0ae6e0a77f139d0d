//! Resource Pools
//!
//! Berths and cranes are both instances of one primitive: a pool with a fixed
//! capacity, a set of outstanding grants and a FIFO queue of waiting
//! processes. The kernel drives pools on behalf of processes
//! ([`Step::Acquire`](crate::domain::kernel::Step::Acquire) and
//! [`Context::release`](crate::domain::kernel::Context::release)); the pools
//! themselves know nothing about time.
//!
//! # Invariants
//! - `holders.len() <= capacity` at all times.
//! - Waiters are granted in the order they queued.
//! - Releasing a grant that is not held is an error, never a no-op.

pub mod pool;
pub mod types;

pub use pool::{RequestOutcome, ResourcePool, ResourceTable};
pub use types::{Grant, ResourceError, ResourceId};
