//! Compile-time tracepoint providers with a low-overhead emission path.
//!
//! Applications declare strongly-typed event schemas ahead of time with the
//! [`provider!`] macro and emit instances of them at runtime with
//! [`tracepoint!`]. Emitted records are serialized into self-contained byte
//! buffers and handed to a collector through a [`trace::RecordStream`].
//!
//! ```ignore
//! tracekit_core::provider! {
//!     hello_world {
//!         my_first_tracepoint {
//!             my_string_field: string,
//!             my_integer_field: i32,
//!         }
//!     }
//! }
//!
//! let (tracer, mut stream) = tracekit_core::trace::streaming_tracer();
//! tracekit_core::tracepoint!(tracer, hello_world::my_first_tracepoint, "hi there!", 23);
//! ```
//!
//! Declaring the same `(provider, event)` pair from any number of modules or
//! crates resolves to a single registered schema with one stable id; a
//! conflicting field list for an already-registered pair fails loudly on
//! first use. When a provider is disabled (or the tracer is a no-op), the
//! `tracepoint!` call site does no serialization work and does not evaluate
//! its argument expressions.

pub mod logging;
pub mod macros;
pub mod model;
pub mod registry;
pub mod schema;
pub mod trace;

pub use model::{SchemaId, TraceEventId};
pub use registry::RegistryError;
pub use schema::{FieldDescriptor, FieldKind, IntKind, StrFraming};
pub use trace::{streaming_tracer, RecordStream, Tracer};
