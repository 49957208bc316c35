//! Alexa bridging settings

use crate::codec::{FieldReader, FieldWriter, Record};
use crate::constants::{ALEXA_DEVICE_NAME_FIELD_LENGTH, ALEXA_SETTINGS_LENGTH};
use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};

code_enum! {
    /// How the four channels are exposed to Alexa
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum AlexaIntegrationMode: "alexa integration mode" {
        Off = 0,
        RgbwDevice = 1,
        RgbDevice = 2,
        MultiDevice = 3,
    }
}

/// Integration mode plus one device name per channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlexaIntegrationSettings {
    pub integration_mode: AlexaIntegrationMode,
    pub r_device_name: String,
    pub g_device_name: String,
    pub b_device_name: String,
    pub w_device_name: String,
}

impl AlexaIntegrationSettings {
    /// Names in channel order (R, G, B, W)
    pub fn device_names(&self) -> [&str; 4] {
        [
            self.r_device_name.as_str(),
            self.g_device_name.as_str(),
            self.b_device_name.as_str(),
            self.w_device_name.as_str(),
        ]
    }
}

impl Record for AlexaIntegrationSettings {
    const ENCODED_LEN: usize = ALEXA_SETTINGS_LENGTH;

    fn read_from(reader: &mut FieldReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            integration_mode: AlexaIntegrationMode::try_from(reader.read_u8()?)?,
            r_device_name: reader.read_cstring(ALEXA_DEVICE_NAME_FIELD_LENGTH)?,
            g_device_name: reader.read_cstring(ALEXA_DEVICE_NAME_FIELD_LENGTH)?,
            b_device_name: reader.read_cstring(ALEXA_DEVICE_NAME_FIELD_LENGTH)?,
            w_device_name: reader.read_cstring(ALEXA_DEVICE_NAME_FIELD_LENGTH)?,
        })
    }

    fn write_to(&self, writer: &mut FieldWriter) -> Result<(), ProtocolError> {
        writer.write_u8(self.integration_mode.code());
        for name in self.device_names() {
            writer.write_cstring(name, ALEXA_DEVICE_NAME_FIELD_LENGTH - 1);
        }
        Ok(())
    }
}
