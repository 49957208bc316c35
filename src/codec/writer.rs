//! Forward-only writer producing fixed-layout records

use bytes::{BufMut, Bytes, BytesMut};

/// Little-endian writer over a growable buffer
///
/// String fields always advance by `max_length + 1` bytes so every
/// record keeps the size of the matching firmware struct.
pub struct FieldWriter {
    buffer: BytesMut,
}

impl FieldWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Bytes written so far
    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.put_u8(value);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buffer.put_u32_le(value);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.put_slice(bytes);
    }

    /// Write `s` into a zero-filled region of `max_length + 1` bytes
    ///
    /// Input longer than `max_length` bytes is cut at the last UTF-8
    /// boundary that fits. The final byte of the region is always zero.
    pub fn write_cstring(&mut self, s: &str, max_length: usize) {
        let text = truncate_utf8(s, max_length);
        self.buffer.put_slice(text.as_bytes());
        self.buffer.put_bytes(0, max_length + 1 - text.len());
    }

    /// Zero padding, used to fill the unused part of a union
    pub fn write_zeros(&mut self, n: usize) {
        self.buffer.put_bytes(0, n);
    }

    pub fn finish(self) -> Bytes {
        self.buffer.freeze()
    }
}

/// Longest prefix of `s` that is at most `max_len` bytes and ends on a char boundary
pub fn truncate_utf8(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_u32_little_endian() {
        let mut writer = FieldWriter::with_capacity(4);
        writer.write_u32(0x1234_5678);
        assert_eq!(writer.finish().as_ref(), &[0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_cstring_zero_padded() {
        let mut writer = FieldWriter::with_capacity(6);
        writer.write_cstring("ab", 5);
        assert_eq!(writer.position(), 6);
        assert_eq!(writer.finish().as_ref(), b"ab\0\0\0\0");
    }

    #[test]
    fn test_cstring_truncated_keeps_terminator() {
        let mut writer = FieldWriter::with_capacity(4);
        writer.write_cstring("abcdef", 3);
        assert_eq!(writer.finish().as_ref(), b"abc\0");
    }

    #[test]
    fn test_cstring_advances_full_field_when_empty() {
        let mut writer = FieldWriter::with_capacity(8);
        writer.write_cstring("", 3);
        writer.write_u8(0xAA);
        assert_eq!(writer.finish().as_ref(), &[0, 0, 0, 0, 0xAA]);
    }

    #[test]
    fn test_truncate_utf8_respects_char_boundary() {
        // "é" is two bytes; cutting at 2 would split it
        assert_eq!(truncate_utf8("aé", 2), "a");
        assert_eq!(truncate_utf8("aé", 3), "aé");
        assert_eq!(truncate_utf8("", 0), "");
    }
}
