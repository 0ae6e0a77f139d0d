//! Virtual Clock Module
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │  Kernel                                                │
//! │  clock.schedule_after(delay, wakeup);                  │
//! │  while let Some(event) = clock.tick() { ... }          │
//! └────────────────────────────────────────────────────────┘
//!                      │
//!             VirtualClock<P, B>
//!                      │
//!               HeapBackend<P>
//!          (BinaryHeap, min by time then seq)
//! ```
//!
//! # Invariants
//! - Time never decreases.
//! - Events with equal times fire in the order they were scheduled.

mod backend;
mod engine;
mod heap_backend;
mod types;

pub use backend::ClockBackend;
pub use engine::VirtualClock;
pub use heap_backend::HeapBackend;
pub use types::{ClockError, ScheduledEvent, Sequence, SimTime};
