//! Parser for the tracekit binary record stream.
//!
//! This crate decodes the records emitted by `tracekit-core` back into
//! structured values. Decoding is schema-driven: records carry only a schema
//! id, and the consumer supplies the field layouts out-of-band through a
//! [`SchemaTable`].
//!
//! # Protocol
//!
//! Each record is a 24-byte header followed by a variable-length body, all
//! little-endian:
//!
//! | Offset | Size | Field                              |
//! |--------|------|------------------------------------|
//! | 0      | 4    | Schema id                          |
//! | 4      | 8    | Event id                           |
//! | 12     | 8    | Nanotime (zigzag, anchor-relative) |
//! | 20     | 4    | Data length                        |
//! | 24     | N    | Field data, in declared order      |
//!
//! Unsigned integer fields are little-endian at their declared width; signed
//! fields are zigzag-encoded first. Length-prefixed strings are a uvarint
//! byte count followed by UTF-8; null-terminated strings are UTF-8 followed
//! by a single 0x00.
//!
//! # Usage
//!
//! ```no_run
//! use tracekit_traceparser::{parse_record, ParseError, SchemaTable, TimeAnchor, Timestamp};
//!
//! let schemas = SchemaTable::new();
//! let anchor = TimeAnchor {
//!     real: Timestamp { seconds: 1700000000, nanos: 0 },
//!     mono_nanos: 0,
//! };
//!
//! let data: &[u8] = &[/* record bytes */];
//! let mut cursor = std::io::Cursor::new(data);
//!
//! loop {
//!     match parse_record(&mut cursor, &schemas, &anchor) {
//!         Ok(record) => println!("{record:?}"),
//!         Err(ParseError::EndOfStream) => break,
//!         Err(e) => eprintln!("parse error: {e}"),
//!     }
//! }
//! ```

pub mod types;
mod parser;
mod reader;

pub use parser::parse_record;
pub use types::{
    EventSpec, FieldSpec, FieldType, FieldValue, ParseError, ParsedRecord, SchemaTable,
    TimeAnchor, Timestamp,
};
