//! Clock Backend Abstraction Layer
//!
//! The backend owns the raw state (current time and pending events); the
//! [`VirtualClock`](super::VirtualClock) engine layers validation and
//! sequence allocation on top. Backends are selected statically, so the
//! engine compiles down to direct calls into the concrete queue.

use super::types::{ScheduledEvent, SimTime};

/// Storage for clock state
pub trait ClockBackend<P> {
    /// Current simulation time
    fn current_time(&self) -> SimTime;

    /// Overwrite the current time (only ever moved forward by the engine)
    fn set_time(&mut self, time: SimTime);

    /// Add event to queue
    fn push_event(&mut self, event: ScheduledEvent<P>);

    /// Remove and return the next event (earliest time, then lowest sequence)
    fn pop_event(&mut self) -> Option<ScheduledEvent<P>>;

    /// Time of the next event without removing it
    fn peek_time(&self) -> Option<SimTime>;

    /// Get queue size
    fn queue_len(&self) -> usize;

    /// Check if event queue is empty
    fn is_empty(&self) -> bool {
        self.queue_len() == 0
    }
}
