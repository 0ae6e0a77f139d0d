//! Event sinks and the bounded recorder

use super::event::PortEvent;
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Receives every notification the terminal emits
pub trait EventSink: Send + fmt::Debug {
    /// Handle one event
    fn record(&mut self, event: &PortEvent);
}

/// Configuration for the event tracer
#[derive(Debug, Clone, Copy)]
pub struct TracerConfig {
    /// Maximum number of events to store
    pub max_events: usize,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            max_events: super::DEFAULT_MAX_EVENTS,
        }
    }
}

/// Errors that can occur during tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TracingError {
    /// Event buffer is full
    #[error("event buffer is full")]
    BufferFull,
}

/// Recording sink with a fixed capacity
///
/// Events past the capacity are counted but not stored.
#[derive(Debug, Default)]
pub struct EventTracer {
    config: TracerConfig,
    events: Vec<PortEvent>,
    dropped: u64,
}

impl EventTracer {
    /// Create a tracer with the given configuration
    pub fn new(config: TracerConfig) -> Self {
        Self {
            config,
            events: Vec::new(),
            dropped: 0,
        }
    }

    /// Store an event
    ///
    /// # Errors
    /// [`TracingError::BufferFull`] once `max_events` are stored.
    pub fn try_record(&mut self, event: PortEvent) -> Result<(), TracingError> {
        if self.events.len() >= self.config.max_events {
            self.dropped += 1;
            return Err(TracingError::BufferFull);
        }
        self.events.push(event);
        Ok(())
    }

    /// Recorded events in emission order
    pub fn events(&self) -> &[PortEvent] {
        &self.events
    }

    /// Number of stored events
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing was stored
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events rejected because the buffer was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// `(time, kind)` pairs, the replay fingerprint of a run
    pub fn timeline(&self) -> Vec<(f64, &'static str)> {
        self.events.iter().map(|e| (e.time, e.kind.name())).collect()
    }

    /// Versioned, serializable view of the recorded events
    pub fn export(&self) -> EventLog<'_> {
        EventLog {
            format_version: super::TRACING_FORMAT_VERSION,
            dropped: self.dropped,
            events: &self.events,
        }
    }

    /// Forget everything recorded so far
    pub fn clear(&mut self) {
        self.events.clear();
        self.dropped = 0;
    }
}

impl EventSink for EventTracer {
    fn record(&mut self, event: &PortEvent) {
        // Overflow is tracked in `dropped`.
        let _ = self.try_record(event.clone());
    }
}

/// JSON document written for a recorded run
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EventLog<'a> {
    /// Layout version of this document
    pub format_version: u32,
    /// Events lost to the buffer bound
    pub dropped: u64,
    /// Events in emission order
    pub events: &'a [PortEvent],
}

/// Tracer handle that stays readable after the simulation took a sink
pub type SharedTracer = Arc<Mutex<EventTracer>>;

/// Create a shared tracer with default capacity
pub fn shared_tracer() -> SharedTracer {
    Arc::new(Mutex::new(EventTracer::default()))
}

impl EventSink for SharedTracer {
    fn record(&mut self, event: &PortEvent) {
        self.lock().record(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tracing::event::EventKind;

    fn departed(time: f64) -> PortEvent {
        PortEvent {
            time,
            kind: EventKind::VesselDeparted {
                vessel: "V".into(),
            },
        }
    }

    #[test]
    fn test_bounded_buffer() {
        let mut tracer = EventTracer::new(TracerConfig { max_events: 2 });
        tracer.record(&departed(1.0));
        tracer.record(&departed(2.0));
        assert_eq!(tracer.try_record(departed(3.0)), Err(TracingError::BufferFull));

        assert_eq!(tracer.len(), 2);
        assert_eq!(tracer.dropped(), 1);
        assert_eq!(tracer.timeline(), vec![(1.0, "vessel_departed"), (2.0, "vessel_departed")]);
    }

    #[test]
    fn test_export_carries_format_version() {
        let mut tracer = EventTracer::new(TracerConfig { max_events: 1 });
        tracer.record(&departed(1.0));
        tracer.record(&departed(2.0));

        let json = serde_json::to_value(tracer.export()).unwrap();
        assert_eq!(json["format_version"], crate::domain::tracing::TRACING_FORMAT_VERSION);
        assert_eq!(json["dropped"], 1);
        assert_eq!(json["events"][0]["kind"], "vessel_departed");
        assert_eq!(json["events"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_shared_handle_sees_events() {
        let shared = shared_tracer();
        let mut sink: Box<dyn EventSink> = Box::new(Arc::clone(&shared));
        sink.record(&departed(4.0));
        assert_eq!(shared.lock().len(), 1);
    }
}
