//! Process-wide registry of tracepoint providers and event schemas.
//!
//! Registration happens once per `(provider, event)` pair no matter how many
//! modules or crates expand the same declaration: every expansion funnels
//! through [`register_event`], which deduplicates by name and hands back the
//! existing id when the layouts agree. The registry's lock is only taken for
//! registration, control operations, and snapshots; emission reads the
//! per-provider enabled flag through a cached [`EventHandle`] without any
//! locking.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use once_cell::sync::Lazy;

use crate::model::SchemaId;
use crate::schema::{layout_string, FieldDescriptor};

/// Declaration-contract violations.
///
/// These indicate a bug in the declaring code and surface loudly: the
/// macro-generated registration guard panics with the error message on the
/// first use of the conflicting declaration site.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(
        "event {provider}:{event} redeclared with a different field list: \
         registered as {existing}, redeclared as {new}"
    )]
    LayoutMismatch {
        provider: &'static str,
        event: &'static str,
        existing: String,
        new: String,
    },
}

/// Cached handle to a registered event, resolved once per declaration site.
///
/// Copies of the handle share the provider's process-wide enabled flag, so an
/// external enable/disable toggle takes effect promptly at every call site.
#[derive(Clone, Copy, Debug)]
pub struct EventHandle {
    pub id: SchemaId,
    enabled: &'static AtomicBool,
}

impl EventHandle {
    /// Whether the owning provider is currently enabled.
    ///
    /// A plain atomic load; safe on the emission hot path.
    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}

/// Per-declaration-site registration guard used by the `provider!` macro.
///
/// Ensures the structural registration runs exactly once per site regardless
/// of how many times the declaration is expanded or the event is emitted.
pub type EventCell = once_cell::sync::OnceCell<EventHandle>;

/// A registered schema, as exposed to the consumer side.
///
/// The consumer decodes records with this out-of-band knowledge; records
/// themselves carry only the schema id.
#[derive(Clone, Copy, Debug)]
pub struct SchemaInfo {
    pub id: SchemaId,
    pub provider: &'static str,
    pub event: &'static str,
    pub fields: &'static [FieldDescriptor],
}

struct Inner {
    providers: HashMap<String, &'static AtomicBool>,
    events: HashMap<(&'static str, &'static str), SchemaInfo>,
    next_id: u32,
}

impl Inner {
    fn provider_flag(&mut self, provider: &str) -> &'static AtomicBool {
        if let Some(flag) = self.providers.get(provider).copied() {
            return flag;
        }
        // Providers are few and live for the whole process; leaking the flag
        // gives every call site a lock-free 'static to load from.
        let flag: &'static AtomicBool = Box::leak(Box::new(AtomicBool::new(true)));
        self.providers.insert(provider.to_string(), flag);
        flag
    }
}

static REGISTRY: Lazy<RwLock<Inner>> = Lazy::new(|| {
    RwLock::new(Inner {
        providers: HashMap::new(),
        events: HashMap::new(),
        next_id: 1,
    })
});

fn lock_poisoned() -> ! {
    // The registry never panics while holding the lock; a poisoned lock means
    // the process is already tearing down.
    panic!("tracepoint registry lock poisoned")
}

/// Registers an event schema, deduplicating by `(provider, event)` name.
///
/// Repeated registrations with an identical field list return the same
/// handle. A different field list for an already-registered name is a
/// contract violation and returns [`RegistryError::LayoutMismatch`].
pub fn register_event(
    provider: &'static str,
    event: &'static str,
    fields: &'static [FieldDescriptor],
) -> Result<EventHandle, RegistryError> {
    let mut inner = REGISTRY.write().unwrap_or_else(|_| lock_poisoned());

    let enabled = inner.provider_flag(provider);

    if let Some(existing) = inner.events.get(&(provider, event)) {
        if existing.fields == fields {
            return Ok(EventHandle {
                id: existing.id,
                enabled,
            });
        }
        return Err(RegistryError::LayoutMismatch {
            provider,
            event,
            existing: layout_string(existing.fields),
            new: layout_string(fields),
        });
    }

    let id = SchemaId(inner.next_id);
    inner.next_id += 1;
    inner.events.insert(
        (provider, event),
        SchemaInfo {
            id,
            provider,
            event,
            fields,
        },
    );

    Ok(EventHandle { id, enabled })
}

/// Sets a provider's process-wide enabled flag.
///
/// This is the external control path; emission never writes the flag. The
/// flag is created on first mention, so disabling a provider before any of
/// its events has registered works as expected.
pub fn set_provider_enabled(provider: &str, enabled: bool) {
    let mut inner = REGISTRY.write().unwrap_or_else(|_| lock_poisoned());
    inner.provider_flag(provider).store(enabled, Ordering::Release);
}

/// Reads a provider's enabled flag through the registry.
///
/// Control-path convenience; emission uses the cached [`EventHandle`].
/// Unmentioned providers read as disabled.
pub fn provider_enabled(provider: &str) -> bool {
    let inner = REGISTRY.read().unwrap_or_else(|_| lock_poisoned());
    inner
        .providers
        .get(provider)
        .map(|flag| flag.load(Ordering::Acquire))
        .unwrap_or(false)
}

/// Snapshot of every registered schema, for handing to the consumer.
pub fn schemas() -> Vec<SchemaInfo> {
    let inner = REGISTRY.read().unwrap_or_else(|_| lock_poisoned());
    let mut out: Vec<SchemaInfo> = inner.events.values().copied().collect();
    out.sort_by_key(|s| s.id);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, IntKind, StrFraming};

    // The registry is process-global, so each test uses its own provider name.

    const FIELDS_A: &[FieldDescriptor] = &[
        FieldDescriptor::new("msg", FieldKind::Str(StrFraming::LengthPrefixed)),
        FieldDescriptor::new("code", FieldKind::Int(IntKind::I32)),
    ];

    const FIELDS_B: &[FieldDescriptor] = &[
        FieldDescriptor::new("msg", FieldKind::Str(StrFraming::LengthPrefixed)),
        FieldDescriptor::new("code", FieldKind::Int(IntKind::U64)),
    ];

    #[test]
    fn test_repeat_registration_is_idempotent() {
        let first = register_event("registry_test_idem", "ev", FIELDS_A).expect("register");
        let second = register_event("registry_test_idem", "ev", FIELDS_A).expect("re-register");
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_layout_mismatch_rejected() {
        register_event("registry_test_mismatch", "ev", FIELDS_A).expect("register");
        let err = register_event("registry_test_mismatch", "ev", FIELDS_B)
            .expect_err("conflicting layout must be rejected");
        let msg = err.to_string();
        assert!(msg.contains("registry_test_mismatch:ev"), "got: {msg}");
        assert!(msg.contains("code: i32"), "got: {msg}");
        assert!(msg.contains("code: u64"), "got: {msg}");
    }

    #[test]
    fn test_distinct_events_get_distinct_ids() {
        let a = register_event("registry_test_ids", "ev_a", FIELDS_A).expect("register a");
        let b = register_event("registry_test_ids", "ev_b", FIELDS_B).expect("register b");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_enable_disable_round_trip() {
        let handle = register_event("registry_test_toggle", "ev", FIELDS_A).expect("register");
        assert!(handle.enabled(), "providers start enabled");
        assert!(provider_enabled("registry_test_toggle"));

        set_provider_enabled("registry_test_toggle", false);
        assert!(!handle.enabled());
        assert!(!provider_enabled("registry_test_toggle"));

        set_provider_enabled("registry_test_toggle", true);
        assert!(handle.enabled());
    }

    #[test]
    fn test_unmentioned_provider_reads_disabled() {
        assert!(!provider_enabled("registry_test_nonexistent"));
    }

    #[test]
    fn test_disable_before_registration_sticks() {
        set_provider_enabled("registry_test_early", false);
        let handle = register_event("registry_test_early", "ev", FIELDS_A).expect("register");
        assert!(!handle.enabled());
    }

    #[test]
    fn test_snapshot_contains_registration() {
        let handle = register_event("registry_test_snapshot", "ev", FIELDS_A).expect("register");
        let snapshot = schemas();
        let info = snapshot
            .iter()
            .find(|s| s.id == handle.id)
            .expect("snapshot contains the registered schema");
        assert_eq!(info.provider, "registry_test_snapshot");
        assert_eq!(info.event, "ev");
        assert_eq!(info.fields, FIELDS_A);
    }
}
