//! Virtual Clock Engine
//!
//! ```text
//! schedule_after(delay, payload)        tick()
//!          │                               │
//!          ▼                               ▼
//!   validate delay ──► seq += 1 ──► backend.push   backend.pop ──► now = event.at
//! ```
//!
//! Time only moves when an event is popped (or when a run horizon is hit via
//! [`VirtualClock::advance_to`]), and never backwards.

use super::backend::ClockBackend;
use super::heap_backend::HeapBackend;
use super::types::{ClockError, ScheduledEvent, Sequence, SimTime};
use std::marker::PhantomData;

/// Virtual clock with pluggable backend
///
/// # Type Parameters
/// - `P`: payload carried by each event (the continuation to run)
/// - `B`: storage backend, [`HeapBackend`] unless stated otherwise
pub struct VirtualClock<P, B: ClockBackend<P> = HeapBackend<P>> {
    backend: B,

    /// Next sequence number to hand out
    next_seq: Sequence,

    _payload: PhantomData<P>,
}

impl<P> VirtualClock<P> {
    /// Create a clock backed by a binary heap
    pub fn new() -> Self {
        Self::with_backend(HeapBackend::new())
    }
}

impl<P> Default for VirtualClock<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, B: ClockBackend<P>> VirtualClock<P, B> {
    /// Create clock with a custom backend
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            next_seq: 0,
            _payload: PhantomData,
        }
    }

    /// Current virtual time
    pub fn now(&self) -> SimTime {
        self.backend.current_time()
    }

    /// Pending events count
    pub fn pending_events(&self) -> usize {
        self.backend.queue_len()
    }

    /// Time of the next pending event
    pub fn peek_time(&self) -> Option<SimTime> {
        self.backend.peek_time()
    }

    /// Register `payload` to fire at `now + delay`
    ///
    /// # Errors
    /// [`ClockError::InvalidDelay`] when `delay` is negative, NaN or infinite.
    pub fn schedule_after(&mut self, delay: SimTime, payload: P) -> Result<Sequence, ClockError> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(ClockError::InvalidDelay { delay });
        }
        let at = self.now() + delay;
        Ok(self.push(at, payload))
    }

    fn push(&mut self, at: SimTime, payload: P) -> Sequence {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.backend.push_event(ScheduledEvent::new(at, seq, payload));
        seq
    }

    /// Pop the next event and advance time to it
    pub fn tick(&mut self) -> Option<ScheduledEvent<P>> {
        let event = self.backend.pop_event()?;

        assert!(
            event.at >= self.backend.current_time(),
            "time monotonicity violated: {} < {}",
            event.at,
            self.backend.current_time()
        );
        self.backend.set_time(event.at);

        Some(event)
    }

    /// Move the clock forward to `time` without firing anything
    ///
    /// Ignored if `time` is not ahead of the current time.
    pub fn advance_to(&mut self, time: SimTime) {
        if time > self.backend.current_time() {
            self.backend.set_time(time);
        }
    }

    /// Check if idle
    pub fn is_idle(&self) -> bool {
        self.backend.is_empty()
    }
}
