//! The emission half of the record pipeline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::model::{SchemaId, TraceEventId};
use crate::trace::eventbuf::EventBuffer;
use crate::trace::sink::TraceEvent;

// A global event id counter.
static EVENT_ID: AtomicU64 = AtomicU64::new(1);

/// Handle through which records are emitted.
///
/// Cloning is cheap; clones share the same collector channel and drop
/// counter. A [`Tracer::noop`] tracer reports disabled and discards
/// everything without work.
#[derive(Debug, Clone)]
pub struct Tracer {
    tx: Option<tokio::sync::mpsc::UnboundedSender<TraceEvent>>,
    dropped: Arc<AtomicU64>,
}

impl Tracer {
    pub(super) fn new(tx: tokio::sync::mpsc::UnboundedSender<TraceEvent>) -> Self {
        Self {
            tx: Some(tx),
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// A tracer with no collector attached; every emission is a no-op.
    pub fn noop() -> Self {
        Self {
            tx: None,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Whether a collector is attached.
    ///
    /// Call sites check this before doing any serialization work.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Number of records dropped because the collector was gone.
    pub fn dropped_records(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Hands one completed record to the collector.
    ///
    /// Never blocks and never fails from the caller's point of view: if the
    /// collector has gone away the record is counted and discarded.
    #[inline]
    pub fn send(&self, schema: SchemaId, eb: EventBuffer) -> TraceEventId {
        // Make sure the event id is never 0, as it's used to indicate "no event" in the protocol.
        let mut id = EVENT_ID.fetch_add(1, Ordering::SeqCst);
        if id == 0 {
            id = EVENT_ID.fetch_add(1, Ordering::SeqCst);
        }
        let id = TraceEventId(id);

        if let Some(tx) = &self.tx {
            let event = TraceEvent {
                schema,
                id,
                data: eb.freeze(),
                ts: tokio::time::Instant::now(),
            };
            if tx.send(event).is_err() && self.dropped.fetch_add(1, Ordering::Relaxed) == 0 {
                log::warn!("trace collector is gone; dropping further records");
            }
        }

        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IntKind;

    #[test]
    fn test_noop_tracer_is_disabled() {
        let tracer = Tracer::noop();
        assert!(!tracer.is_enabled());

        // Sending through a noop tracer is harmless and still stamps an id.
        let mut eb = EventBuffer::with_capacity(4);
        eb.uint(IntKind::U32, 7);
        let id = tracer.send(SchemaId(1), eb);
        assert_ne!(id.0, 0);
        assert_eq!(tracer.dropped_records(), 0);
    }

    #[test]
    fn test_event_ids_are_unique_and_nonzero() {
        let tracer = Tracer::noop();
        let a = tracer.send(SchemaId(1), EventBuffer::with_capacity(0));
        let b = tracer.send(SchemaId(1), EventBuffer::with_capacity(0));
        assert_ne!(a, b);
        assert_ne!(a.0, 0);
        assert_ne!(b.0, 0);
    }

    #[test]
    fn test_send_after_collector_gone_counts_drops() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let tracer = Tracer::new(tx);
        drop(rx);

        let _ = tracer.send(SchemaId(1), EventBuffer::with_capacity(0));
        let _ = tracer.send(SchemaId(1), EventBuffer::with_capacity(0));
        assert_eq!(tracer.dropped_records(), 2);
    }
}
