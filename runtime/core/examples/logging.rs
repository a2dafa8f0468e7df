//! Installs the log bridge and decodes the records it produces.
//!
//! Run with `cargo run --example logging`.

use tracekit_core::schema::{FieldKind, IntKind, StrFraming};
use tracekit_core::{logging, registry};
use tracekit_traceparser::{
    parse_record, EventSpec, FieldSpec, FieldType, ParseError, SchemaTable, TimeAnchor, Timestamp,
};

fn main() {
    let (tracer, mut stream) = tracekit_core::streaming_tracer();

    // Register the bridge as the logging facility.
    logging::init(tracer);

    // Give the user a chance to list providers.
    wait_for_enter();

    log::trace!("Hello from trace");
    log::debug!("Hello from debug");
    log::info!("Hello from info");
    log::warn!("Hello from warn");
    log::error!("Hello from error");

    let table = schema_table();
    let (seconds, nanos) = stream.anchor().unix_parts();
    let anchor = TimeAnchor {
        real: Timestamp { seconds, nanos },
        mono_nanos: 0,
    };

    while let Some(record) = stream.try_next_record() {
        let mut cursor = std::io::Cursor::new(&record[..]);
        match parse_record(&mut cursor, &table, &anchor) {
            Ok(parsed) => println!("{}:{} {:?}", parsed.provider, parsed.event, parsed.fields),
            Err(ParseError::EndOfStream) => break,
            Err(e) => eprintln!("decode error: {e}"),
        }
    }
}

fn wait_for_enter() {
    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .expect("couldn't read line from stdin");
}

fn schema_table() -> SchemaTable {
    let mut table = SchemaTable::new();
    for info in registry::schemas() {
        table.insert(
            info.id.0,
            EventSpec {
                provider: info.provider.to_string(),
                event: info.event.to_string(),
                fields: info
                    .fields
                    .iter()
                    .map(|f| FieldSpec {
                        name: f.name.to_string(),
                        ty: match f.kind {
                            FieldKind::Int(IntKind::U8) => FieldType::U8,
                            FieldKind::Int(IntKind::U16) => FieldType::U16,
                            FieldKind::Int(IntKind::U32) => FieldType::U32,
                            FieldKind::Int(IntKind::U64) => FieldType::U64,
                            FieldKind::Int(IntKind::I8) => FieldType::I8,
                            FieldKind::Int(IntKind::I16) => FieldType::I16,
                            FieldKind::Int(IntKind::I32) => FieldType::I32,
                            FieldKind::Int(IntKind::I64) => FieldType::I64,
                            FieldKind::Str(StrFraming::LengthPrefixed) => {
                                FieldType::StrLengthPrefixed
                            }
                            FieldKind::Str(StrFraming::NullTerminated) => {
                                FieldType::StrNullTerminated
                            }
                        },
                    })
                    .collect(),
            },
        );
    }
    table
}
