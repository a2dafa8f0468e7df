mod eventbuf;
mod protocol;
mod sink;
mod time_anchor;

pub use eventbuf::EventBuffer;
pub use protocol::Tracer;
pub use sink::{streaming_tracer, RecordStream, RECORD_HEADER_SIZE};
pub use time_anchor::TimeAnchor;
