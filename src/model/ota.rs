//! Firmware update progress

use crate::codec::{FieldReader, FieldWriter, Record};
use crate::constants::OTA_PROGRESS_LENGTH;
use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};
use std::fmt;

code_enum! {
    #[derive(Serialize, Deserialize)]
    pub enum OtaStatus: "ota status" {
        #[serde(rename = "Idle")]
        Idle = 0,
        #[serde(rename = "Update in progress")]
        Started = 1,
        #[serde(rename = "Update completed successfully")]
        Completed = 2,
        #[serde(rename = "Update failed")]
        Failed = 3,
    }
}

impl OtaStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Started => "Update in progress",
            Self::Completed => "Update completed successfully",
            Self::Failed => "Update failed",
        }
    }
}

impl fmt::Display for OtaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtaState {
    pub status: OtaStatus,
    pub total_bytes_expected: u32,
    pub total_bytes_received: u32,
}

impl OtaState {
    /// Whole-number progress, 0 when the total is not known yet
    pub fn percentage(&self) -> u32 {
        if self.total_bytes_expected == 0 {
            return 0;
        }
        let ratio = self.total_bytes_received as f64 / self.total_bytes_expected as f64;
        (ratio * 100.0).round() as u32
    }
}

impl fmt::Display for OtaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percentage() {
            0 => write!(f, "{}", self.status),
            p => write!(f, "{} ({}%)", self.status, p),
        }
    }
}

impl Record for OtaState {
    const ENCODED_LEN: usize = OTA_PROGRESS_LENGTH;

    fn read_from(reader: &mut FieldReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            status: OtaStatus::try_from(reader.read_u8()?)?,
            total_bytes_expected: reader.read_u32()?,
            total_bytes_received: reader.read_u32()?,
        })
    }

    fn write_to(&self, writer: &mut FieldWriter) -> Result<(), ProtocolError> {
        writer.write_u8(self.status.code());
        writer.write_u32(self.total_bytes_expected);
        writer.write_u32(self.total_bytes_received);
        Ok(())
    }
}
