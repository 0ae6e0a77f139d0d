//! Virtual Clock Types
//!
//! Time is a plain `f64` of simulated seconds. Events are totally ordered by
//! `(time, sequence)`, where the sequence number is handed out at scheduling
//! time and never reused, so two wake-ups for the same instant always fire in
//! the order they were scheduled.

use std::cmp::Ordering;

/// Simulated time in seconds
pub type SimTime = f64;

/// Strictly increasing tie-breaker assigned to every scheduled event
pub type Sequence = u64;

/// Scheduled event in the event queue
#[derive(Debug, Clone)]
pub struct ScheduledEvent<P> {
    /// When this event should fire (virtual time)
    pub at: SimTime,

    /// Creation order, used to break ties between equal times
    pub seq: Sequence,

    /// Continuation carried by the event
    pub payload: P,
}

impl<P> ScheduledEvent<P> {
    /// Create a new scheduled event
    pub fn new(at: SimTime, seq: Sequence, payload: P) -> Self {
        Self { at, seq, payload }
    }
}

/// Event ordering for the min-heap.
///
/// `BinaryHeap` is a max-heap, so the comparison is reversed: the earliest
/// time compares greatest, and among equal times the smallest sequence does.
impl<P> PartialEq for ScheduledEvent<P> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl<P> Eq for ScheduledEvent<P> {}

impl<P> PartialOrd for ScheduledEvent<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for ScheduledEvent<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        match other.at.total_cmp(&self.at) {
            Ordering::Equal => other.seq.cmp(&self.seq),
            ord => ord,
        }
    }
}

/// Errors raised when scheduling an event
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ClockError {
    /// Delay was NaN, infinite or negative
    #[error("invalid delay {delay}: delays must be finite and non-negative")]
    InvalidDelay {
        /// The rejected delay
        delay: SimTime,
    },
}
