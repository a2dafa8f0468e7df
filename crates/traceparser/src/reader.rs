use crate::types::ParseError;

/// Parsed record header.
pub(crate) struct Header {
    pub schema_id: u32,
    pub event_id: u64,
    pub nanotime: i64,
    pub data_len: u32,
}

const HEADER_REST_SIZE: usize = 23;

/// Read the record header from a stream reader.
/// Returns `ParseError::EndOfStream` if there are no more records (clean EOF).
pub(crate) fn read_header(reader: &mut impl std::io::Read) -> Result<Header, ParseError> {
    // Read the first header byte. EOF here means no more records.
    let mut first = [0u8; 1];
    match reader.read_exact(&mut first) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ParseError::EndOfStream);
        }
        Err(e) => return Err(ParseError::Io(e)),
    }

    // Read the remaining 23 bytes of the header.
    let mut buf = [0u8; HEADER_REST_SIZE];
    reader.read_exact(&mut buf)?;

    let schema_id = u32::from_le_bytes([first[0], buf[0], buf[1], buf[2]]);
    let event_id = u64::from_le_bytes(buf[3..11].try_into().unwrap());
    let nanotime_raw = u64::from_le_bytes(buf[11..19].try_into().unwrap());
    let nanotime = zigzag_decode(nanotime_raw);
    let data_len = u32::from_le_bytes(buf[19..23].try_into().unwrap());

    Ok(Header {
        schema_id,
        event_id,
        nanotime,
        data_len,
    })
}

/// Read the record body from a stream reader.
pub(crate) fn read_body(
    reader: &mut impl std::io::Read,
    len: u32,
) -> Result<Vec<u8>, ParseError> {
    let mut body = vec![0u8; len as usize];
    reader.read_exact(&mut body)?;
    Ok(body)
}

/// A cursor-based reader over a record body.
///
/// Uses "sticky error" semantics: once an error occurs, all subsequent reads
/// return zero/default values. The error is checked after parsing completes.
pub(crate) struct FieldReader<'a> {
    data: &'a [u8],
    pos: usize,
    err: bool,
}

impl<'a> FieldReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            err: false,
        }
    }

    pub fn has_error(&self) -> bool {
        self.err
    }

    pub fn bytes_read(&self) -> usize {
        self.pos
    }

    /// Whether the whole body has been consumed.
    pub fn at_end(&self) -> bool {
        self.pos == self.data.len()
    }

    fn set_err(&mut self) {
        self.err = true;
    }

    fn ensure(&mut self, n: usize) -> bool {
        // `pos` never exceeds `data.len()`, so the subtraction cannot wrap.
        // Comparing the remaining length keeps an oversized length prefix
        // from overflowing `pos + n`.
        if self.err || n > self.data.len() - self.pos {
            self.set_err();
            false
        } else {
            true
        }
    }

    /// Read n bytes as a slice from the data.
    fn read_bytes_slice(&mut self, n: usize) -> &'a [u8] {
        if !self.ensure(n) {
            return &[];
        }
        let start = self.pos;
        self.pos += n;
        &self.data[start..self.pos]
    }

    /// Read a single byte.
    pub fn byte(&mut self) -> u8 {
        if !self.ensure(1) {
            return 0;
        }
        let b = self.data[self.pos];
        self.pos += 1;
        b
    }

    /// Read an unsigned little-endian integer of the given byte width.
    ///
    /// Width must be 1, 2, 4, or 8.
    pub fn uint_width(&mut self, width: usize) -> u64 {
        let b = self.read_bytes_slice(width);
        if b.len() < width {
            return 0;
        }
        let mut out = [0u8; 8];
        out[..width].copy_from_slice(b);
        u64::from_le_bytes(out)
    }

    /// Read a zigzag-encoded little-endian integer of the given byte width.
    pub fn int_width(&mut self, width: usize) -> i64 {
        zigzag_decode(self.uint_width(width))
    }

    /// Read a variable-length unsigned integer.
    pub fn uvarint(&mut self) -> u64 {
        let mut result: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            if self.err {
                return 0;
            }
            let b = self.byte();
            if self.err {
                return 0;
            }
            result |= ((b & 0x7F) as u64) << shift;
            if b & 0x80 == 0 {
                return result;
            }
            shift += 7;
            if shift >= 64 {
                self.set_err();
                return 0;
            }
        }
    }

    /// Read a length-prefixed UTF-8 string. Invalid UTF-8 is replaced.
    pub fn string(&mut self) -> String {
        let len = self.uvarint() as usize;
        if len == 0 {
            return String::new();
        }
        let bytes = self.read_bytes_slice(len);
        if self.err {
            return String::new();
        }
        String::from_utf8_lossy(bytes).into_owned()
    }

    /// Read a null-terminated UTF-8 string, consuming the terminator.
    /// Invalid UTF-8 is replaced. A missing terminator is an error.
    pub fn cstring(&mut self) -> String {
        if self.err {
            return String::new();
        }
        let rest = &self.data[self.pos..];
        let Some(nul) = rest.iter().position(|&b| b == 0) else {
            self.set_err();
            return String::new();
        };
        let s = String::from_utf8_lossy(&rest[..nul]).into_owned();
        self.pos += nul + 1;
        s
    }
}

/// Zigzag decode a u64 to i64.
pub(crate) fn zigzag_decode(u: u64) -> i64 {
    if u & 1 == 0 {
        (u >> 1) as i64
    } else {
        !((u >> 1) as i64)
    }
}
