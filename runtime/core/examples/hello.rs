//! Declares a provider, emits a handful of records, and decodes them back.
//!
//! Run with `cargo run --example hello`.

use tracekit_core::schema::{FieldKind, IntKind, StrFraming};
use tracekit_core::{provider, registry, tracepoint};
use tracekit_traceparser::{
    parse_record, EventSpec, FieldSpec, FieldType, ParseError, SchemaTable, TimeAnchor, Timestamp,
};

provider! {
    hello_world {
        my_first_tracepoint {
            my_string_field: string,
            my_integer_field: i32,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let (tracer, mut stream) = tracekit_core::streaming_tracer();

    println!("Hello, world!\nPress enter to continue...");

    // Pause so there is a chance to inspect the registered providers.
    wait_for_enter();

    tracepoint!(tracer, hello_world::my_first_tracepoint, "hi there!", 23);

    let mut x = 0i32;
    for arg in std::env::args() {
        tracepoint!(tracer, hello_world::my_first_tracepoint, arg, x);
        x += 1;
    }

    println!("Quitting now!");
    tracepoint!(tracer, hello_world::my_first_tracepoint, "x^2", x * x);
    drop(tracer);

    // Build the consumer's schema table from the producer registry and
    // decode everything the stream delivered.
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

    let (seconds, nanos) = stream.anchor().unix_parts();
    let anchor = TimeAnchor {
        real: Timestamp { seconds, nanos },
        mono_nanos: 0,
    };

    while let Some(record) = stream.next_record().await {
        let mut cursor = std::io::Cursor::new(&record[..]);
        match parse_record(&mut cursor, &table, &anchor) {
            Ok(parsed) => {
                println!(
                    "{}:{} #{} at {}.{:09}: {:?}",
                    parsed.provider,
                    parsed.event,
                    parsed.event_id,
                    parsed.event_time.seconds,
                    parsed.event_time.nanos,
                    parsed.fields,
                );
            }
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
