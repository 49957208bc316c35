//! Per-channel light state

use crate::codec::{FieldReader, FieldWriter, Record};
use crate::constants::{CHANNEL_COUNT, LIGHT_STATE_LENGTH};
use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};

/// On/off flag plus brightness for one channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightState {
    pub on: bool,
    pub value: u8,
}

/// R, G, B, W in that order
pub type ChannelStates = [LightState; CHANNEL_COUNT];

impl LightState {
    pub fn new(on: bool, value: u8) -> Self {
        Self { on, value }
    }

    /// Decode a single pair; the buffer must be exactly two bytes
    pub fn from_pair(buffer: &[u8]) -> Result<Self, ProtocolError> {
        if buffer.len() != LIGHT_STATE_LENGTH {
            return Err(ProtocolError::MalformedLength {
                record: "light state",
                expected: LIGHT_STATE_LENGTH,
                actual: buffer.len(),
            });
        }
        Self::decode(buffer)
    }
}

impl Record for LightState {
    const ENCODED_LEN: usize = LIGHT_STATE_LENGTH;

    fn read_from(reader: &mut FieldReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            on: reader.read_u8()? != 0,
            value: reader.read_u8()?,
        })
    }

    fn write_to(&self, writer: &mut FieldWriter) -> Result<(), ProtocolError> {
        writer.write_u8(u8::from(self.on));
        writer.write_u8(self.value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_exact_length() {
        assert_eq!(LightState::from_pair(&[1, 200]), Ok(LightState::new(true, 200)));
        assert_eq!(
            LightState::from_pair(&[1, 200, 0]),
            Err(ProtocolError::MalformedLength {
                record: "light state",
                expected: 2,
                actual: 3
            })
        );
        assert!(LightState::from_pair(&[1]).is_err());
    }

    #[test]
    fn test_nonzero_flag_is_on() {
        assert!(LightState::decode(&[0x7F, 0]).unwrap().on);
    }
}
