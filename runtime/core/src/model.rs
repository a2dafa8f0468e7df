use std::fmt;

/// Uniquely identifies a registered event schema within the process.
///
/// Assigned by the registry on first registration of a `(provider, event)`
/// pair; every record emitted for that event carries this id so the consumer
/// can look up the field list out-of-band.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct SchemaId(pub u32);

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Uniquely identifies an emitted record within the process.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
#[must_use]
pub struct TraceEventId(pub u64);

impl fmt::Display for TraceEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
