//! Binary-heap clock backend
//!
//! O(log n) insertion and extraction, unbounded capacity. The ordering is
//! entirely carried by `ScheduledEvent`'s `Ord` implementation.

use super::backend::ClockBackend;
use super::types::{ScheduledEvent, SimTime};
use std::collections::BinaryHeap;

/// Heap-allocated clock backend
#[derive(Debug)]
pub struct HeapBackend<P> {
    now: SimTime,
    event_queue: BinaryHeap<ScheduledEvent<P>>,
}

impl<P> HeapBackend<P> {
    /// Create an empty backend at time zero
    pub fn new() -> Self {
        Self {
            now: 0.0,
            event_queue: BinaryHeap::new(),
        }
    }
}

impl<P> Default for HeapBackend<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> ClockBackend<P> for HeapBackend<P> {
    fn current_time(&self) -> SimTime {
        self.now
    }

    fn set_time(&mut self, time: SimTime) {
        self.now = time;
    }

    fn push_event(&mut self, event: ScheduledEvent<P>) {
        self.event_queue.push(event);
    }

    fn pop_event(&mut self) -> Option<ScheduledEvent<P>> {
        self.event_queue.pop()
    }

    fn peek_time(&self) -> Option<SimTime> {
        self.event_queue.peek().map(|e| e.at)
    }

    fn queue_len(&self) -> usize {
        self.event_queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heap_backend_basic() {
        let mut backend = HeapBackend::new();

        assert_eq!(backend.current_time(), 0.0);
        assert!(backend.is_empty());

        backend.push_event(ScheduledEvent::new(100.0, 0, 'a'));
        assert!(!backend.is_empty());
        assert_eq!(backend.queue_len(), 1);
        assert_eq!(backend.peek_time(), Some(100.0));
    }

    #[test]
    fn test_heap_backend_ordering() {
        let mut backend = HeapBackend::new();

        // Insert in arbitrary order
        backend.push_event(ScheduledEvent::new(200.0, 0, 'c'));
        backend.push_event(ScheduledEvent::new(100.0, 1, 'a'));
        backend.push_event(ScheduledEvent::new(150.0, 2, 'b'));
        backend.push_event(ScheduledEvent::new(100.0, 3, 'x'));

        let order: Vec<char> = std::iter::from_fn(|| backend.pop_event())
            .map(|e| e.payload)
            .collect();
        assert_eq!(order, vec!['a', 'x', 'b', 'c']);
    }
}
