//! Event schema descriptions: field kinds, descriptors, and layout identity.

use std::fmt;

/// A fixed-width integer field kind.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum IntKind {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
}

impl IntKind {
    /// Serialized width in bytes.
    pub const fn width(self) -> usize {
        match self {
            IntKind::U8 | IntKind::I8 => 1,
            IntKind::U16 | IntKind::I16 => 2,
            IntKind::U32 | IntKind::I32 => 4,
            IntKind::U64 | IntKind::I64 => 8,
        }
    }

    pub const fn is_signed(self) -> bool {
        matches!(self, IntKind::I8 | IntKind::I16 | IntKind::I32 | IntKind::I64)
    }

    pub const fn name(self) -> &'static str {
        match self {
            IntKind::U8 => "u8",
            IntKind::U16 => "u16",
            IntKind::U32 => "u32",
            IntKind::U64 => "u64",
            IntKind::I8 => "i8",
            IntKind::I16 => "i16",
            IntKind::I32 => "i32",
            IntKind::I64 => "i64",
        }
    }
}

/// Framing rule for variable-length string fields.
///
/// The rule is part of the schema: the consumer must use it to find the end
/// of the field, since a string's size is only known at emission time.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum StrFraming {
    /// A uvarint byte length followed by the UTF-8 bytes.
    LengthPrefixed,
    /// The UTF-8 bytes followed by a single 0x00 terminator.
    NullTerminated,
}

impl StrFraming {
    pub const fn name(self) -> &'static str {
        match self {
            StrFraming::LengthPrefixed => "string",
            StrFraming::NullTerminated => "cstring",
        }
    }
}

/// The kind of one serialized field.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum FieldKind {
    Int(IntKind),
    Str(StrFraming),
}

impl FieldKind {
    /// Serialized size in bytes, when statically known.
    ///
    /// Returns `None` for string kinds, whose size is measured at call time.
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            FieldKind::Int(kind) => Some(kind.width()),
            FieldKind::Str(_) => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            FieldKind::Int(kind) => kind.name(),
            FieldKind::Str(framing) => framing.name(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One serialized field: name plus kind.
///
/// Field order is fixed by the declaration and defines serialization order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        FieldDescriptor { name, kind }
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.kind)
    }
}

/// Renders a field list the way declarations are written, for error messages.
pub(crate) fn layout_string(fields: &[FieldDescriptor]) -> String {
    let parts: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
    format!("({})", parts.join(", "))
}

/// String arguments accepted by generated emission functions.
///
/// Absent values (`None`) serialize as the empty string under either framing
/// rule; they never fault.
pub trait StringValue {
    fn as_field_bytes(&self) -> &[u8];
}

impl StringValue for &str {
    fn as_field_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl StringValue for String {
    fn as_field_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl StringValue for &String {
    fn as_field_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl StringValue for Option<&str> {
    fn as_field_bytes(&self) -> &[u8] {
        self.map(str::as_bytes).unwrap_or(&[])
    }
}

impl StringValue for Option<String> {
    fn as_field_bytes(&self) -> &[u8] {
        self.as_deref().map(str::as_bytes).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_sizes() {
        assert_eq!(FieldKind::Int(IntKind::U8).fixed_size(), Some(1));
        assert_eq!(FieldKind::Int(IntKind::I16).fixed_size(), Some(2));
        assert_eq!(FieldKind::Int(IntKind::U32).fixed_size(), Some(4));
        assert_eq!(FieldKind::Int(IntKind::I64).fixed_size(), Some(8));
        assert_eq!(FieldKind::Str(StrFraming::LengthPrefixed).fixed_size(), None);
        assert_eq!(FieldKind::Str(StrFraming::NullTerminated).fixed_size(), None);
    }

    #[test]
    fn test_layout_string() {
        let fields = [
            FieldDescriptor::new("my_string_field", FieldKind::Str(StrFraming::LengthPrefixed)),
            FieldDescriptor::new("my_integer_field", FieldKind::Int(IntKind::I32)),
        ];
        assert_eq!(
            layout_string(&fields),
            "(my_string_field: string, my_integer_field: i32)"
        );
    }

    #[test]
    fn test_string_value_absent() {
        let none: Option<&str> = None;
        assert_eq!(none.as_field_bytes(), b"");
        assert_eq!(Some("hi").as_field_bytes(), b"hi");
        assert_eq!("hi".as_field_bytes(), b"hi");
        assert_eq!(String::from("hi").as_field_bytes(), b"hi");
    }
}
