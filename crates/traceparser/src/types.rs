use std::collections::HashMap;

// === Error types ===

/// Errors that can occur during record parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Reached end of stream at a clean record boundary (no more records).
    #[error("end of stream")]
    EndOfStream,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown schema id: {0}")]
    UnknownSchema(u32),

    #[error("unexpected end of record data")]
    UnexpectedEof,

    #[error("parse error: {0}")]
    InvalidData(String),
}

// === Basic types ===

/// A timestamp represented as seconds and nanoseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

/// Converts header nanotimes to real wall-clock timestamps.
///
/// The producer anchors its monotonic clock to wall time once per stream;
/// record headers then carry offsets relative to that anchor.
#[derive(Debug, Clone)]
pub struct TimeAnchor {
    pub real: Timestamp,
    pub mono_nanos: i64,
}

impl TimeAnchor {
    /// Convert a header nanotime to a real wall-clock timestamp.
    pub fn to_real(&self, nanotime: i64) -> Timestamp {
        let delta_nanos = nanotime - self.mono_nanos;
        let total_nanos = self.real.nanos as i64 + delta_nanos;
        let extra_seconds = total_nanos.div_euclid(1_000_000_000);
        let remaining_nanos = total_nanos.rem_euclid(1_000_000_000);
        Timestamp {
            seconds: self.real.seconds + extra_seconds,
            nanos: remaining_nanos as i32,
        }
    }
}

// === Schema description ===

/// Wire type of one field, as the producer declared it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    /// uvarint byte count followed by UTF-8.
    StrLengthPrefixed,
    /// UTF-8 followed by a single 0x00 terminator.
    StrNullTerminated,
}

/// One field of an event schema: name plus wire type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub ty: FieldType,
}

/// One event schema: the provider/event names and the ordered field list.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSpec {
    pub provider: String,
    pub event: String,
    pub fields: Vec<FieldSpec>,
}

/// The out-of-band schema knowledge needed to decode a stream, keyed by
/// schema id.
#[derive(Debug, Clone, Default)]
pub struct SchemaTable {
    schemas: HashMap<u32, EventSpec>,
}

impl SchemaTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, schema_id: u32, spec: EventSpec) {
        self.schemas.insert(schema_id, spec);
    }

    pub fn get(&self, schema_id: u32) -> Option<&EventSpec> {
        self.schemas.get(&schema_id)
    }
}

// === Decoded records ===

/// A decoded field value.
///
/// Integer fields decode to the signedness class they were declared with;
/// both string framings decode to [`FieldValue::Str`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Uint(u64),
    Int(i64),
    Str(String),
}

/// One fully decoded record.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub schema_id: u32,
    pub event_id: u64,
    pub event_time: Timestamp,
    pub provider: String,
    pub event: String,
    /// Field names paired with decoded values, in declared order.
    pub fields: Vec<(String, FieldValue)>,
}
