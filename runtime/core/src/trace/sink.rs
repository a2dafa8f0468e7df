//! Collector handoff: pairs a [`Tracer`] with the stream the collector
//! drains, and frames each record for the wire.
//!
//! Each record becomes one contiguous byte sequence: a fixed 24-byte header
//! followed by the field data. The header layout, all little-endian:
//!
//! | Offset | Size | Field                              |
//! |--------|------|------------------------------------|
//! | 0      | 4    | Schema id                          |
//! | 4      | 8    | Event id                           |
//! | 12     | 8    | Nanotime (zigzag, anchor-relative) |
//! | 20     | 4    | Data length                        |
//!
//! Because a record is framed into a single buffer before it is handed over,
//! the collector can never observe a partial record or an interleaving of
//! two records' bytes.

use bytes::{BufMut, Bytes, BytesMut};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::model::{SchemaId, TraceEventId};
use crate::trace::eventbuf::signed_to_unsigned_i64;
use crate::trace::time_anchor::TimeAnchor;
use crate::trace::Tracer;

/// Size of the wire header preceding each record's data.
pub const RECORD_HEADER_SIZE: usize = 24;

/// One emitted record, as handed from the emission path to the collector.
#[derive(Debug)]
pub(super) struct TraceEvent {
    pub schema: SchemaId,
    pub id: TraceEventId,
    pub data: Bytes,
    pub ts: tokio::time::Instant,
}

/// Creates a connected tracer/stream pair.
///
/// The [`Tracer`] half is handed to emitting code; the [`RecordStream`] half
/// is drained by the collector. Dropping every tracer clone ends the stream.
pub fn streaming_tracer() -> (Tracer, RecordStream) {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let tracer = Tracer::new(tx);

    let stream = RecordStream {
        rx,
        anchor: TimeAnchor::new(),
    };
    (tracer, stream)
}

/// The collector's end of the record pipeline.
#[derive(Debug)]
pub struct RecordStream {
    rx: UnboundedReceiver<TraceEvent>,
    anchor: TimeAnchor,
}

impl RecordStream {
    /// The anchor correlating record nanotimes with wall-clock time.
    pub fn anchor(&self) -> &TimeAnchor {
        &self.anchor
    }

    /// Receives the next record, framed for the wire.
    ///
    /// Returns `None` once every tracer clone has been dropped.
    pub async fn next_record(&mut self) -> Option<Bytes> {
        let event = self.rx.recv().await?;
        Some(encode_record(&event, &self.anchor))
    }

    /// Non-blocking variant of [`next_record`](Self::next_record).
    pub fn try_next_record(&mut self) -> Option<Bytes> {
        let event = self.rx.try_recv().ok()?;
        Some(encode_record(&event, &self.anchor))
    }

    /// Blocking variant of [`next_record`](Self::next_record), for threads
    /// outside an async runtime.
    pub fn blocking_next_record(&mut self) -> Option<Bytes> {
        let event = self.rx.blocking_recv()?;
        Some(encode_record(&event, &self.anchor))
    }
}

fn encode_record(event: &TraceEvent, anchor: &TimeAnchor) -> Bytes {
    // Compute the timestamp, relative to the anchor's timestamp.
    let ts = event
        .ts
        .saturating_duration_since(anchor.instant)
        .as_nanos() as i64;
    let ts = signed_to_unsigned_i64(ts);

    let mut buf = BytesMut::with_capacity(RECORD_HEADER_SIZE + event.data.len());
    buf.put_u32_le(event.schema.0);
    buf.put_u64_le(event.id.0);
    buf.put_u64_le(ts);
    buf.put_u32_le(event.data.len() as u32);
    buf.extend_from_slice(&event.data);
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::eventbuf::EventBuffer;

    fn test_event(schema: u32, id: u64, data: &[u8], ts: tokio::time::Instant) -> TraceEvent {
        TraceEvent {
            schema: SchemaId(schema),
            id: TraceEventId(id),
            data: Bytes::copy_from_slice(data),
            ts,
        }
    }

    #[test]
    fn test_record_header_format() {
        let anchor = TimeAnchor::new();
        let ts = anchor.instant + std::time::Duration::from_nanos(123_456_789);
        let event = test_event(7, 42, &[10, 20, 30], ts);

        let record = encode_record(&event, &anchor);
        assert_eq!(record.len(), RECORD_HEADER_SIZE + 3);

        // Schema id, little-endian.
        assert_eq!(u32::from_le_bytes(record[0..4].try_into().unwrap()), 7);

        // Event id.
        assert_eq!(u64::from_le_bytes(record[4..12].try_into().unwrap()), 42);

        // Nanotime: zigzag of a non-negative offset is offset * 2.
        assert_eq!(
            u64::from_le_bytes(record[12..20].try_into().unwrap()),
            123_456_789 << 1
        );

        // Data length and payload.
        assert_eq!(u32::from_le_bytes(record[20..24].try_into().unwrap()), 3);
        assert_eq!(&record[24..], &[10, 20, 30]);
    }

    #[test]
    fn test_record_empty_payload() {
        let anchor = TimeAnchor::new();
        let event = test_event(1, 1, &[], anchor.instant);
        let record = encode_record(&event, &anchor);
        assert_eq!(record.len(), RECORD_HEADER_SIZE);
        assert_eq!(u32::from_le_bytes(record[20..24].try_into().unwrap()), 0);
    }

    #[test]
    fn test_timestamp_before_anchor_saturates_to_zero() {
        let anchor = TimeAnchor::new();
        let event = test_event(1, 1, &[], anchor.instant - std::time::Duration::from_secs(1));
        let record = encode_record(&event, &anchor);
        assert_eq!(u64::from_le_bytes(record[12..20].try_into().unwrap()), 0);
    }

    #[tokio::test]
    async fn test_stream_delivers_whole_records() {
        let (tracer, mut stream) = streaming_tracer();

        let mut eb = EventBuffer::with_capacity(8);
        eb.lp_str("hello");
        let id = tracer.send(SchemaId(3), eb);

        let record = stream.next_record().await.expect("one record");
        assert_eq!(u32::from_le_bytes(record[0..4].try_into().unwrap()), 3);
        assert_eq!(
            u64::from_le_bytes(record[4..12].try_into().unwrap()),
            id.0
        );
        assert_eq!(&record[24..], &[0x05, b'h', b'e', b'l', b'l', b'o']);

        drop(tracer);
        assert!(stream.next_record().await.is_none(), "stream ends when tracers drop");
    }

    #[tokio::test]
    async fn test_try_next_record() {
        let (tracer, mut stream) = streaming_tracer();
        assert!(stream.try_next_record().is_none());

        let _ = tracer.send(SchemaId(1), EventBuffer::with_capacity(0));
        assert!(stream.try_next_record().is_some());
        assert!(stream.try_next_record().is_none());
    }
}
