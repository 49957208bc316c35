//! BLE GATT table
//!
//! Each characteristic carries one record's encoding with no type tag;
//! the characteristic UUID identifies the record instead.

use crate::codec::{decode_cstring, truncate_utf8, FieldReader, Record};
use crate::constants::{CHANNEL_COUNT, DEVICE_NAME_MAX_LENGTH};
use crate::error::ProtocolError;
use crate::model::{
    AlexaIntegrationSettings, HttpCredentials, WiFiConnectionDetails, WiFiDetails,
    WiFiScanResult, WiFiScanStatus, WiFiStatus,
};
use bytes::Bytes;

/// Value written to the restart characteristic
pub const RESTART_COMMAND: &[u8] = b"RESTART_NOW";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    DeviceDetails,
    WiFi,
    Alexa,
}

impl Service {
    pub fn uuid(self) -> &'static str {
        match self {
            Self::DeviceDetails => "12345678-1234-1234-1234-1234567890ac",
            Self::WiFi => "12345678-1234-1234-1234-1234567890ab",
            Self::Alexa => "12345678-1234-1234-1234-1234567890ba",
        }
    }
}

/// GATT access flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Properties {
    pub read: bool,
    pub write: bool,
    pub notify: bool,
}

impl Properties {
    const fn new(read: bool, write: bool, notify: bool) -> Self {
        Self {
            read,
            write,
            notify,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Characteristic {
    DeviceRestart,
    DeviceName,
    FirmwareVersion,
    HttpCredentials,
    DeviceHeap,
    WiFiDetails,
    /// Reads the status; writing a `WiFiConnectionDetails` starts a connect
    WiFiStatus,
    /// Reads the scan status; any write starts a scan
    WiFiScanStatus,
    WiFiScanResult,
    AlexaSettings,
    /// Raw output values, one byte per channel
    AlexaColor,
}

impl Characteristic {
    pub const ALL: &'static [Characteristic] = &[
        Self::DeviceRestart,
        Self::DeviceName,
        Self::FirmwareVersion,
        Self::HttpCredentials,
        Self::DeviceHeap,
        Self::WiFiDetails,
        Self::WiFiStatus,
        Self::WiFiScanStatus,
        Self::WiFiScanResult,
        Self::AlexaSettings,
        Self::AlexaColor,
    ];

    pub fn uuid(self) -> &'static str {
        match self {
            Self::DeviceRestart => "aaaaaaaa-bbbb-cccc-dddd-eeeeeeee0000",
            Self::DeviceName => "aaaaaaaa-bbbb-cccc-dddd-eeeeeeee0001",
            Self::FirmwareVersion => "aaaaaaaa-bbbb-cccc-dddd-eeeeeeee0002",
            Self::HttpCredentials => "aaaaaaaa-bbbb-cccc-dddd-eeeeeeee0003",
            Self::DeviceHeap => "aaaaaaaa-bbbb-cccc-dddd-eeeeeeee0004",
            Self::WiFiDetails => "aaaaaaaa-bbbb-cccc-dddd-eeeeeeee0005",
            Self::WiFiStatus => "aaaaaaaa-bbbb-cccc-dddd-eeeeeeee0006",
            Self::WiFiScanStatus => "aaaaaaaa-bbbb-cccc-dddd-eeeeeeee0007",
            Self::WiFiScanResult => "aaaaaaaa-bbbb-cccc-dddd-eeeeeeee0008",
            Self::AlexaSettings => "aaaaaaaa-bbbb-cccc-dddd-eeeeeeee0009",
            Self::AlexaColor => "aaaaaaaa-bbbb-cccc-dddd-eeeeeeee000a",
        }
    }

    /// Case-insensitive UUID lookup
    pub fn from_uuid(uuid: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.uuid().eq_ignore_ascii_case(uuid))
    }

    pub fn service(self) -> Service {
        match self {
            Self::DeviceRestart
            | Self::DeviceName
            | Self::FirmwareVersion
            | Self::HttpCredentials
            | Self::DeviceHeap => Service::DeviceDetails,
            Self::WiFiDetails | Self::WiFiStatus | Self::WiFiScanStatus | Self::WiFiScanResult => {
                Service::WiFi
            }
            Self::AlexaSettings | Self::AlexaColor => Service::Alexa,
        }
    }

    pub fn properties(self) -> Properties {
        match self {
            Self::DeviceRestart => Properties::new(false, true, false),
            Self::DeviceName => Properties::new(true, true, true),
            Self::FirmwareVersion => Properties::new(true, false, false),
            Self::HttpCredentials => Properties::new(true, true, false),
            Self::DeviceHeap => Properties::new(false, false, true),
            Self::WiFiDetails => Properties::new(true, false, true),
            Self::WiFiStatus => Properties::new(true, true, true),
            Self::WiFiScanStatus => Properties::new(true, true, true),
            Self::WiFiScanResult => Properties::new(true, false, true),
            Self::AlexaSettings => Properties::new(true, true, false),
            Self::AlexaColor => Properties::new(true, true, true),
        }
    }
}

/// A decoded read or notify value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacteristicValue {
    DeviceName(String),
    FirmwareVersion(String),
    HttpCredentials(HttpCredentials),
    Heap(u32),
    WiFiDetails(WiFiDetails),
    WiFiStatus(WiFiStatus),
    WiFiScanStatus(WiFiScanStatus),
    WiFiScanResult(WiFiScanResult),
    AlexaSettings(AlexaIntegrationSettings),
    AlexaColor([u8; CHANNEL_COUNT]),
}

impl CharacteristicValue {
    /// Decode a value read from (or notified by) `characteristic`
    ///
    /// Returns `None` for write-only characteristics.
    pub fn decode(
        characteristic: Characteristic,
        value: &[u8],
    ) -> Result<Option<Self>, ProtocolError> {
        let decoded = match characteristic {
            Characteristic::DeviceRestart => return Ok(None),
            Characteristic::DeviceName => Self::DeviceName(decode_cstring(value)),
            Characteristic::FirmwareVersion => Self::FirmwareVersion(decode_cstring(value)),
            Characteristic::HttpCredentials => {
                Self::HttpCredentials(HttpCredentials::decode(value)?)
            }
            Characteristic::DeviceHeap => Self::Heap(FieldReader::new(value).read_u32()?),
            Characteristic::WiFiDetails => Self::WiFiDetails(WiFiDetails::decode(value)?),
            Characteristic::WiFiStatus => Self::WiFiStatus(WiFiStatus::decode(value)?),
            Characteristic::WiFiScanStatus => Self::WiFiScanStatus(WiFiScanStatus::decode(value)?),
            Characteristic::WiFiScanResult => {
                Self::WiFiScanResult(WiFiScanResult::decode(value)?)
            }
            Characteristic::AlexaSettings => {
                Self::AlexaSettings(AlexaIntegrationSettings::decode(value)?)
            }
            Characteristic::AlexaColor => {
                Self::AlexaColor(FieldReader::new(value).read_array::<CHANNEL_COUNT>()?)
            }
        };
        Ok(Some(decoded))
    }
}

// =============================================================================
// Write payloads
// =============================================================================

pub fn encode_restart() -> Bytes {
    Bytes::from_static(RESTART_COMMAND)
}

/// Device name as raw text, truncated to 31 bytes
pub fn encode_device_name(name: &str) -> Bytes {
    Bytes::copy_from_slice(truncate_utf8(name, DEVICE_NAME_MAX_LENGTH).as_bytes())
}

/// Written to `Characteristic::WiFiStatus`
pub fn encode_wifi_connect(details: &WiFiConnectionDetails) -> Result<Bytes, ProtocolError> {
    details.encode()
}

pub fn encode_alexa_color(values: [u8; CHANNEL_COUNT]) -> Bytes {
    Bytes::copy_from_slice(&values)
}
