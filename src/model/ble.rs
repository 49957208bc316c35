//! Bluetooth radio status

use crate::codec::{FieldReader, FieldWriter, Record};
use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};

code_enum! {
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum BleStatus: "ble status" {
        Off = 0,
        Advertising = 1,
        Connected = 2,
    }
}

impl BleStatus {
    pub fn is_enabled(self) -> bool {
        self != Self::Off
    }
}

impl Record for BleStatus {
    const ENCODED_LEN: usize = 1;

    fn read_from(reader: &mut FieldReader<'_>) -> Result<Self, ProtocolError> {
        Self::try_from(reader.read_u8()?)
    }

    fn write_to(&self, writer: &mut FieldWriter) -> Result<(), ProtocolError> {
        writer.write_u8(self.code());
        Ok(())
    }
}
