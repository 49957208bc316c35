//! Field codec for fixed-layout records
//!
//! Separates byte-level concerns from the record definitions:
//! - **FieldReader / FieldWriter**: integers and zero-padded strings
//! - **Record**: a struct with a fixed wire size built from those fields
//!
//! # Adding a new record
//!
//! 1. Define the struct in `model/`
//! 2. Implement `Record` (`ENCODED_LEN`, `read_from`, `write_to`)
//! 3. `decode`/`encode` come for free

pub mod reader;
pub mod writer;

pub use reader::{decode_cstring, FieldReader};
pub use writer::{truncate_utf8, FieldWriter};

use crate::error::ProtocolError;
use bytes::Bytes;

/// A record with a fixed wire size
///
/// The same bytes travel as a BLE characteristic value and, behind a
/// one-byte tag, as a WebSocket frame payload.
pub trait Record: Sized {
    /// Size of the encoded record in bytes
    const ENCODED_LEN: usize;

    /// Read the record at the reader's cursor
    fn read_from(reader: &mut FieldReader<'_>) -> Result<Self, ProtocolError>;

    /// Append the record to `writer`
    ///
    /// Must write exactly `ENCODED_LEN` bytes on success.
    fn write_to(&self, writer: &mut FieldWriter) -> Result<(), ProtocolError>;

    /// Decode from the start of `buffer`
    fn decode(buffer: &[u8]) -> Result<Self, ProtocolError> {
        Self::read_from(&mut FieldReader::new(buffer))
    }

    /// Encode into a fresh buffer of `ENCODED_LEN` bytes
    fn encode(&self) -> Result<Bytes, ProtocolError> {
        let mut writer = FieldWriter::with_capacity(Self::ENCODED_LEN);
        self.write_to(&mut writer)?;
        debug_assert_eq!(writer.position(), Self::ENCODED_LEN);
        Ok(writer.finish())
    }
}
