//! The declaration and emission surface.
//!
//! [`provider!`](crate::provider) declares a provider and its events;
//! [`tracepoint!`](crate::tracepoint) is the call-site macro that emits one.
//!
//! A declaration expands into one module per event. The same field list is
//! deliberately walked several times by the internal rules, once per
//! generated artifact: the descriptor table, the argument list, the capacity
//! estimate, and the serialization body. Those re-expansions are pure
//! codegen; the structural registration itself sits behind a per-site
//! once-cell, so expanding the declaration any number of times (or from any
//! number of modules and crates) registers exactly one schema and yields one
//! stable id. A redeclaration with a different field list panics with the
//! registry's mismatch error on first use.

/// Declares a tracepoint provider and its event schemas.
///
/// ```ignore
/// tracekit_core::provider! {
///     hello_world {
///         my_first_tracepoint {
///             my_string_field: string,
///             my_integer_field: i32,
///         }
///     }
/// }
/// ```
///
/// Field kinds: `u8 u16 u32 u64 i8 i16 i32 i64` for fixed-width integers,
/// `string` for a length-prefixed string, `cstring` for a null-terminated
/// string. Field order is serialization order.
///
/// Each event expands to a module exposing `FIELDS`, `schema_id()`,
/// `enabled(&Tracer)`, and a typed `emit(&Tracer, ...)` whose parameters
/// mirror the declared field list: integer fields take anything convertible
/// into the field's signedness class (values wider than the declared width
/// wrap), string fields take `&str`/`String`/`Option<&str>` and friends
/// (absent strings serialize as empty).
#[macro_export]
macro_rules! provider {
    (
        $provider:ident {
            $(
                $event:ident {
                    $( $field:ident : $kind:tt ),+ $(,)?
                }
            )+
        }
    ) => {
        pub mod $provider {
            $(
                pub mod $event {
                    /// Field layout, in declared order.
                    pub const FIELDS: &[$crate::schema::FieldDescriptor] = &[
                        $( $crate::provider!(@descriptor $field : $kind) ),+
                    ];

                    static EVENT: $crate::registry::EventCell =
                        $crate::registry::EventCell::new();

                    fn handle() -> $crate::registry::EventHandle {
                        *EVENT.get_or_init(|| {
                            match $crate::registry::register_event(
                                stringify!($provider),
                                stringify!($event),
                                FIELDS,
                            ) {
                                Ok(handle) => handle,
                                Err(err) => panic!("tracepoint declaration rejected: {err}"),
                            }
                        })
                    }

                    /// The schema id assigned to this event.
                    pub fn schema_id() -> $crate::model::SchemaId {
                        handle().id
                    }

                    /// Whether emitting this event would do any work.
                    #[inline]
                    pub fn enabled(tracer: &$crate::trace::Tracer) -> bool {
                        tracer.is_enabled() && handle().enabled()
                    }

                    /// Serializes the arguments in declared field order and
                    /// hands the record to the collector. No-op when the
                    /// tracer or the provider is disabled.
                    pub fn emit(
                        tracer: &$crate::trace::Tracer,
                        $( $field: $crate::provider!(@arg_ty $kind) ),+
                    ) {
                        if !enabled(tracer) {
                            return;
                        }
                        let cap = 0usize $( + $crate::provider!(@size_hint $kind, $field) )+;
                        let mut eb = $crate::trace::EventBuffer::with_capacity(cap);
                        $( $crate::provider!(@write eb, $kind, $field); )+
                        let _ = tracer.send(schema_id(), eb);
                    }
                }
            )+
        }
    };

    // Field descriptor pass.
    (@descriptor $field:ident : u8) => {
        $crate::schema::FieldDescriptor::new(
            stringify!($field),
            $crate::schema::FieldKind::Int($crate::schema::IntKind::U8),
        )
    };
    (@descriptor $field:ident : u16) => {
        $crate::schema::FieldDescriptor::new(
            stringify!($field),
            $crate::schema::FieldKind::Int($crate::schema::IntKind::U16),
        )
    };
    (@descriptor $field:ident : u32) => {
        $crate::schema::FieldDescriptor::new(
            stringify!($field),
            $crate::schema::FieldKind::Int($crate::schema::IntKind::U32),
        )
    };
    (@descriptor $field:ident : u64) => {
        $crate::schema::FieldDescriptor::new(
            stringify!($field),
            $crate::schema::FieldKind::Int($crate::schema::IntKind::U64),
        )
    };
    (@descriptor $field:ident : i8) => {
        $crate::schema::FieldDescriptor::new(
            stringify!($field),
            $crate::schema::FieldKind::Int($crate::schema::IntKind::I8),
        )
    };
    (@descriptor $field:ident : i16) => {
        $crate::schema::FieldDescriptor::new(
            stringify!($field),
            $crate::schema::FieldKind::Int($crate::schema::IntKind::I16),
        )
    };
    (@descriptor $field:ident : i32) => {
        $crate::schema::FieldDescriptor::new(
            stringify!($field),
            $crate::schema::FieldKind::Int($crate::schema::IntKind::I32),
        )
    };
    (@descriptor $field:ident : i64) => {
        $crate::schema::FieldDescriptor::new(
            stringify!($field),
            $crate::schema::FieldKind::Int($crate::schema::IntKind::I64),
        )
    };
    (@descriptor $field:ident : string) => {
        $crate::schema::FieldDescriptor::new(
            stringify!($field),
            $crate::schema::FieldKind::Str($crate::schema::StrFraming::LengthPrefixed),
        )
    };
    (@descriptor $field:ident : cstring) => {
        $crate::schema::FieldDescriptor::new(
            stringify!($field),
            $crate::schema::FieldKind::Str($crate::schema::StrFraming::NullTerminated),
        )
    };

    // Argument-type pass.
    (@arg_ty u8) => { impl ::core::convert::Into<u64> };
    (@arg_ty u16) => { impl ::core::convert::Into<u64> };
    (@arg_ty u32) => { impl ::core::convert::Into<u64> };
    (@arg_ty u64) => { impl ::core::convert::Into<u64> };
    (@arg_ty i8) => { impl ::core::convert::Into<i64> };
    (@arg_ty i16) => { impl ::core::convert::Into<i64> };
    (@arg_ty i32) => { impl ::core::convert::Into<i64> };
    (@arg_ty i64) => { impl ::core::convert::Into<i64> };
    (@arg_ty string) => { impl $crate::schema::StringValue };
    (@arg_ty cstring) => { impl $crate::schema::StringValue };

    // Capacity pass. String sizes are measured at call time; the extra
    // bytes cover the framing (uvarint prefix or terminator).
    (@size_hint u8, $field:ident) => { 1usize };
    (@size_hint u16, $field:ident) => { 2usize };
    (@size_hint u32, $field:ident) => { 4usize };
    (@size_hint u64, $field:ident) => { 8usize };
    (@size_hint i8, $field:ident) => { 1usize };
    (@size_hint i16, $field:ident) => { 2usize };
    (@size_hint i32, $field:ident) => { 4usize };
    (@size_hint i64, $field:ident) => { 8usize };
    (@size_hint string, $field:ident) => {
        $crate::schema::StringValue::as_field_bytes(&$field).len() + 10usize
    };
    (@size_hint cstring, $field:ident) => {
        $crate::schema::StringValue::as_field_bytes(&$field).len() + 1usize
    };

    // Serialization pass, in declared order.
    (@write $eb:ident, u8, $field:ident) => {
        $eb.uint($crate::schema::IntKind::U8, ::core::convert::Into::<u64>::into($field))
    };
    (@write $eb:ident, u16, $field:ident) => {
        $eb.uint($crate::schema::IntKind::U16, ::core::convert::Into::<u64>::into($field))
    };
    (@write $eb:ident, u32, $field:ident) => {
        $eb.uint($crate::schema::IntKind::U32, ::core::convert::Into::<u64>::into($field))
    };
    (@write $eb:ident, u64, $field:ident) => {
        $eb.uint($crate::schema::IntKind::U64, ::core::convert::Into::<u64>::into($field))
    };
    (@write $eb:ident, i8, $field:ident) => {
        $eb.int($crate::schema::IntKind::I8, ::core::convert::Into::<i64>::into($field))
    };
    (@write $eb:ident, i16, $field:ident) => {
        $eb.int($crate::schema::IntKind::I16, ::core::convert::Into::<i64>::into($field))
    };
    (@write $eb:ident, i32, $field:ident) => {
        $eb.int($crate::schema::IntKind::I32, ::core::convert::Into::<i64>::into($field))
    };
    (@write $eb:ident, i64, $field:ident) => {
        $eb.int($crate::schema::IntKind::I64, ::core::convert::Into::<i64>::into($field))
    };
    (@write $eb:ident, string, $field:ident) => {
        $eb.lp_bytes($crate::schema::StringValue::as_field_bytes(&$field))
    };
    (@write $eb:ident, cstring, $field:ident) => {
        $eb.c_bytes($crate::schema::StringValue::as_field_bytes(&$field))
    };
}

/// Emits one tracepoint event.
///
/// ```ignore
/// tracekit_core::tracepoint!(tracer, hello_world::my_first_tracepoint, "hi there!", 23);
/// ```
///
/// The enabled check runs before the argument expressions are evaluated:
/// when the tracer or the provider is disabled, the arguments are untouched
/// and no serialization work happens.
#[macro_export]
macro_rules! tracepoint {
    ($tracer:expr, $($path:ident)::+, $($arg:expr),* $(,)?) => {{
        let __tracer: &$crate::trace::Tracer = &$tracer;
        if $($path)::+::enabled(__tracer) {
            $($path)::+::emit(__tracer, $($arg),*);
        }
    }};
}
