//! Forward-only cursor over a received buffer
//!
//! Every read is bounds-checked: running past the end yields
//! `ProtocolError::TruncatedBuffer` instead of garbage.

use crate::error::ProtocolError;

/// Bounds-checked little-endian reader
///
/// # Example
///
/// ```ignore
/// let mut reader = FieldReader::new(&[0x02, 0x78, 0x56, 0x34, 0x12]);
/// assert_eq!(reader.read_u8()?, 0x02);
/// assert_eq!(reader.read_u32()?, 0x1234_5678);
/// ```
pub struct FieldReader<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Bytes left after the cursor
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.offset
    }

    pub fn read_u8(&mut self) -> Result<u8, ProtocolError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u32(&mut self) -> Result<u32, ProtocolError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Borrow the next `n` bytes without copying
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ProtocolError> {
        if n > self.remaining() {
            return Err(ProtocolError::TruncatedBuffer {
                offset: self.offset,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let buffer: &'a [u8] = self.buffer;
        let bytes = &buffer[self.offset..self.offset + n];
        self.offset += n;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ProtocolError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read an `n`-byte zero-padded string region
    pub fn read_cstring(&mut self, n: usize) -> Result<String, ProtocolError> {
        Ok(decode_cstring(self.read_bytes(n)?))
    }

    /// Skip `n` bytes of padding
    pub fn skip(&mut self, n: usize) -> Result<(), ProtocolError> {
        self.read_bytes(n).map(|_| ())
    }
}

/// Decode a C string region: text up to the first zero byte
///
/// Invalid UTF-8 is replaced rather than rejected, the same way a
/// browser `TextDecoder` treats it.
pub fn decode_cstring(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
