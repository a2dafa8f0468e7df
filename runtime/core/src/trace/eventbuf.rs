//! A buffer for encoding the fields of one trace record.
//!
//! Encoding rules:
//! - unsigned integers: little-endian, at the field's declared width;
//! - signed integers: zigzag-mapped to the unsigned range, then little-endian
//!   at the declared width;
//! - length-prefixed strings: uvarint byte length followed by the bytes;
//! - null-terminated strings: the bytes followed by a single 0x00.
//!
//! Values wider than the declared field width wrap (two's-complement
//! truncation). That is the documented overflow policy for emission.

use bytes::{BufMut, Bytes, BytesMut};

use crate::schema::IntKind;

/// A buffer for encoding one record's fields, in declared order.
pub struct EventBuffer {
    scratch: [u8; 10],
    buf: BytesMut,
}

impl EventBuffer {
    pub fn with_capacity(size: usize) -> Self {
        EventBuffer {
            scratch: [0; 10],
            buf: BytesMut::with_capacity(size),
        }
    }

    pub(crate) fn freeze(self) -> Bytes {
        self.buf.freeze()
    }

    /// Writes a single byte.
    #[inline]
    pub fn byte(&mut self, byte: u8) {
        self.buf.reserve(1);
        self.buf.put_u8(byte);
    }

    /// Writes an unsigned integer at the given width, wrapping if wider.
    #[inline]
    pub fn uint(&mut self, kind: IntKind, v: u64) {
        match kind.width() {
            1 => self.byte(v as u8),
            2 => self.buf.extend_from_slice(&(v as u16).to_le_bytes()),
            4 => self.buf.extend_from_slice(&(v as u32).to_le_bytes()),
            _ => self.buf.extend_from_slice(&v.to_le_bytes()),
        }
    }

    /// Writes a signed integer at the given width, wrapping if wider.
    ///
    /// The value is wrapped to the declared width first, then zigzag-mapped;
    /// the zigzag image of an N-bit signed value always fits in N bits.
    #[inline]
    pub fn int(&mut self, kind: IntKind, v: i64) {
        let wrapped: i64 = match kind.width() {
            1 => v as i8 as i64,
            2 => v as i16 as i64,
            4 => v as i32 as i64,
            _ => v,
        };
        self.uint(kind, signed_to_unsigned_i64(wrapped));
    }

    /// Writes a variable-length, length-prefixed string.
    #[inline]
    pub fn lp_str<S: AsRef<str>>(&mut self, str: S) {
        self.lp_bytes(str.as_ref().as_bytes());
    }

    /// Writes a variable-length, length-prefixed byte string.
    #[inline]
    pub fn lp_bytes(&mut self, bytes: &[u8]) {
        // 10 bytes is the maximum length of a uvarint.
        self.buf.reserve(10 + bytes.len());

        self.uvarint(bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a null-terminated string.
    ///
    /// The value is truncated at its first interior NUL so the framing stays
    /// decodable; an empty value is a lone terminator.
    #[inline]
    pub fn c_bytes(&mut self, bytes: &[u8]) {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        self.buf.reserve(end + 1);
        self.buf.put_slice(&bytes[..end]);
        self.buf.put_u8(0);
    }

    /// Writes a variable-length unsigned integer.
    #[inline]
    pub fn uvarint<U: Into<u64>>(&mut self, u: U) {
        let mut u: u64 = u.into();
        let mut i = 0;
        while u >= 0x80 {
            self.scratch[i] = (u as u8) | 0x80;
            u >>= 7;
            i += 1;
        }
        self.scratch[i] = u as u8;
        i += 1;
        self.buf.extend_from_slice(&self.scratch[..i]);
    }
}

#[inline]
pub(crate) fn signed_to_unsigned_i64(i: i64) -> u64 {
    if i < 0 {
        ((!(i as u64)) << 1) | 1 // complement i, bit 0 is 1
    } else {
        (i as u64) << 1 // do not complement i, bit 0 is 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(eb: EventBuffer) -> Vec<u8> {
        eb.freeze().to_vec()
    }

    #[test]
    fn test_zigzag_mapping() {
        assert_eq!(signed_to_unsigned_i64(0), 0);
        assert_eq!(signed_to_unsigned_i64(-1), 1);
        assert_eq!(signed_to_unsigned_i64(1), 2);
        assert_eq!(signed_to_unsigned_i64(-2), 3);
        assert_eq!(signed_to_unsigned_i64(2), 4);
        assert_eq!(signed_to_unsigned_i64(i64::MIN), u64::MAX);
    }

    #[test]
    fn test_uvarint_encoding() {
        let cases: [(u64, &[u8]); 5] = [
            (0, &[0x00]),
            (1, &[0x01]),
            (127, &[0x7F]),
            (128, &[0x80, 0x01]),
            (300, &[0xAC, 0x02]),
        ];
        for (value, expected) in cases {
            let mut eb = EventBuffer::with_capacity(10);
            eb.uvarint(value);
            assert_eq!(contents(eb), expected, "uvarint({value})");
        }
    }

    #[test]
    fn test_uint_widths() {
        let mut eb = EventBuffer::with_capacity(16);
        eb.uint(IntKind::U8, 0xAB);
        eb.uint(IntKind::U16, 0x0102);
        eb.uint(IntKind::U32, 0x01020304);
        eb.uint(IntKind::U64, 0x0102030405060708);
        assert_eq!(
            contents(eb),
            vec![
                0xAB, // u8
                0x02, 0x01, // u16 LE
                0x04, 0x03, 0x02, 0x01, // u32 LE
                0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01, // u64 LE
            ]
        );
    }

    #[test]
    fn test_uint_wraps_wider_values() {
        let mut eb = EventBuffer::with_capacity(4);
        eb.uint(IntKind::U8, 0x1FF); // wraps to 0xFF
        eb.uint(IntKind::U16, 0x1_0001); // wraps to 0x0001
        assert_eq!(contents(eb), vec![0xFF, 0x01, 0x00]);
    }

    #[test]
    fn test_int_wraps_wider_values() {
        // 300 wrapped to i8 is 44; zigzag(44) = 88.
        let mut eb = EventBuffer::with_capacity(2);
        eb.int(IntKind::I8, 300);
        assert_eq!(contents(eb), vec![88]);

        // -1 at any width is all-ones after zigzag's low bit.
        let mut eb = EventBuffer::with_capacity(2);
        eb.int(IntKind::I16, -1);
        assert_eq!(contents(eb), vec![0x01, 0x00]);
    }

    #[test]
    fn test_int_extremes_fit_declared_width() {
        let mut eb = EventBuffer::with_capacity(4);
        eb.int(IntKind::I16, i16::MIN as i64);
        eb.int(IntKind::I16, i16::MAX as i64);
        // zigzag(i16::MIN) = 0xFFFF, zigzag(i16::MAX) = 0xFFFE
        assert_eq!(contents(eb), vec![0xFF, 0xFF, 0xFE, 0xFF]);
    }

    #[test]
    fn test_lp_string_framing() {
        let mut eb = EventBuffer::with_capacity(16);
        eb.lp_str("hello");
        assert_eq!(contents(eb), vec![0x05, b'h', b'e', b'l', b'l', b'o']);
    }

    #[test]
    fn test_lp_empty_string() {
        let mut eb = EventBuffer::with_capacity(4);
        eb.lp_str("");
        assert_eq!(contents(eb), vec![0x00]);
    }

    #[test]
    fn test_c_string_framing() {
        let mut eb = EventBuffer::with_capacity(16);
        eb.c_bytes(b"hi");
        assert_eq!(contents(eb), vec![b'h', b'i', 0x00]);
    }

    #[test]
    fn test_c_string_truncates_at_interior_nul() {
        let mut eb = EventBuffer::with_capacity(16);
        eb.c_bytes(b"ab\0cd");
        assert_eq!(contents(eb), vec![b'a', b'b', 0x00]);
    }

    #[test]
    fn test_c_empty_string() {
        let mut eb = EventBuffer::with_capacity(4);
        eb.c_bytes(b"");
        assert_eq!(contents(eb), vec![0x00]);
    }
}
