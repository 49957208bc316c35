//! Outbound encoders and inbound decoders for each tagged message
//!
//! Outbound helpers compose a record encoder with `frame()`; the color
//! command frames its four bare channel values.
//! Inbound decoders take the full frame (tag included), check the tag
//! and decode the payload.

use super::{empty_frame, frame, payload_of, MessageType};
use crate::codec::{FieldReader, FieldWriter, Record};
use crate::constants::{CHANNEL_COUNT, DEVICE_NAME_MAX_LENGTH, LIGHT_STATE_LENGTH};
use crate::error::ProtocolError;
use crate::model::{
    AlexaIntegrationSettings, BleStatus, ChannelStates, HttpCredentials, LightState, OtaState,
    WiFiConnectionDetails, WiFiDetails, WiFiScanStatus, WiFiStatus,
};
use bytes::Bytes;

/// Length of a device -> client color frame: tag + four on/value pairs
pub const COLOR_FRAME_LENGTH: usize = 1 + CHANNEL_COUNT * LIGHT_STATE_LENGTH;

/// Length of a client -> device color frame: tag + four channel values
pub const COLOR_COMMAND_LENGTH: usize = 1 + CHANNEL_COUNT;

// =============================================================================
// Outbound (client -> device)
// =============================================================================

/// Frame a record under `message_type`
pub fn encode_message<R: Record>(
    message_type: MessageType,
    record: &R,
) -> Result<Bytes, ProtocolError> {
    Ok(frame(message_type, &record.encode()?))
}

/// Set the R/G/B/W channel values
///
/// The device takes bare values here, not the on/value pairs it reports
/// back. A value of 0 turns the channel off.
pub fn encode_color_message(values: [u8; CHANNEL_COUNT]) -> Bytes {
    frame(MessageType::Color, &values)
}

pub fn encode_http_credentials_message(
    credentials: &HttpCredentials,
) -> Result<Bytes, ProtocolError> {
    encode_message(MessageType::HttpCredentials, credentials)
}

pub fn encode_device_name_message(name: &str) -> Result<Bytes, ProtocolError> {
    encode_message(
        MessageType::DeviceName,
        &DeviceNameMessage {
            name: name.to_string(),
        },
    )
}

/// Ask the device to join a network
///
/// Travels under the wifi-status tag; the device ignores anything a
/// client sends under wifi-details. Fails with `CredentialMismatch` if
/// the credentials variant and the encryption type disagree.
pub fn encode_wifi_connection_details_message(
    details: &WiFiConnectionDetails,
) -> Result<Bytes, ProtocolError> {
    encode_message(MessageType::WiFiStatus, details)
}

pub fn encode_ble_status_message(status: BleStatus) -> Result<Bytes, ProtocolError> {
    encode_message(MessageType::BleStatus, &status)
}

pub fn encode_alexa_settings_message(
    settings: &AlexaIntegrationSettings,
) -> Result<Bytes, ProtocolError> {
    encode_message(MessageType::AlexaSettings, settings)
}

pub fn encode_heap_message() -> Bytes {
    empty_frame(MessageType::Heap)
}

pub fn encode_wifi_scan_request() -> Bytes {
    empty_frame(MessageType::WiFiScanStatus)
}

pub fn encode_ota_progress_request() -> Bytes {
    empty_frame(MessageType::OtaProgress)
}

// =============================================================================
// Inbound (device -> client)
// =============================================================================

/// A message the device sends, decodable from a full tagged frame
pub trait InboundMessage: Sized {
    const MESSAGE_TYPE: MessageType;

    fn decode_frame(frame: &[u8]) -> Result<Self, ProtocolError>;
}

macro_rules! inbound_record {
    ($($ty:ty => $tag:ident),+ $(,)?) => {
        $(
            impl InboundMessage for $ty {
                const MESSAGE_TYPE: MessageType = MessageType::$tag;

                fn decode_frame(frame: &[u8]) -> Result<Self, ProtocolError> {
                    <$ty as Record>::decode(payload_of(frame, Self::MESSAGE_TYPE)?)
                }
            }
        )+
    };
}

inbound_record! {
    HttpCredentials => HttpCredentials,
    DeviceNameMessage => DeviceName,
    HeapMessage => Heap,
    BleStatus => BleStatus,
    WiFiStatus => WiFiStatus,
    WiFiScanStatus => WiFiScanStatus,
    WiFiDetails => WiFiDetails,
    OtaState => OtaProgress,
    AlexaIntegrationSettings => AlexaSettings,
}

/// Four channel states, R/G/B/W
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMessage {
    pub channels: ChannelStates,
}

impl Record for ColorMessage {
    const ENCODED_LEN: usize = CHANNEL_COUNT * LIGHT_STATE_LENGTH;

    fn read_from(reader: &mut FieldReader<'_>) -> Result<Self, ProtocolError> {
        let mut channels = [LightState::default(); CHANNEL_COUNT];
        for channel in &mut channels {
            *channel = LightState::read_from(reader)?;
        }
        Ok(Self { channels })
    }

    fn write_to(&self, writer: &mut FieldWriter) -> Result<(), ProtocolError> {
        for channel in &self.channels {
            channel.write_to(writer)?;
        }
        Ok(())
    }
}

impl InboundMessage for ColorMessage {
    const MESSAGE_TYPE: MessageType = MessageType::Color;

    /// The frame must be exactly `COLOR_FRAME_LENGTH` bytes
    fn decode_frame(frame: &[u8]) -> Result<Self, ProtocolError> {
        if frame.len() != COLOR_FRAME_LENGTH {
            return Err(ProtocolError::MalformedLength {
                record: "color message",
                expected: COLOR_FRAME_LENGTH,
                actual: frame.len(),
            });
        }
        Self::decode(payload_of(frame, Self::MESSAGE_TYPE)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceNameMessage {
    pub name: String,
}

impl Record for DeviceNameMessage {
    const ENCODED_LEN: usize = DEVICE_NAME_MAX_LENGTH + 1;

    fn read_from(reader: &mut FieldReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            name: reader.read_cstring(DEVICE_NAME_MAX_LENGTH + 1)?,
        })
    }

    fn write_to(&self, writer: &mut FieldWriter) -> Result<(), ProtocolError> {
        writer.write_cstring(&self.name, DEVICE_NAME_MAX_LENGTH);
        Ok(())
    }
}

/// Free heap reported by the device, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapMessage {
    pub free_heap: u32,
}

impl Record for HeapMessage {
    const ENCODED_LEN: usize = 4;

    fn read_from(reader: &mut FieldReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            free_heap: reader.read_u32()?,
        })
    }

    fn write_to(&self, writer: &mut FieldWriter) -> Result<(), ProtocolError> {
        writer.write_u32(self.free_heap);
        Ok(())
    }
}

/// Any inbound message, for consumers that want a single match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceMessage {
    Color(ColorMessage),
    HttpCredentials(HttpCredentials),
    DeviceName(DeviceNameMessage),
    Heap(HeapMessage),
    BleStatus(BleStatus),
    WiFiStatus(WiFiStatus),
    WiFiScanStatus(WiFiScanStatus),
    WiFiDetails(WiFiDetails),
    OtaProgress(OtaState),
    AlexaSettings(AlexaIntegrationSettings),
}

impl DeviceMessage {
    pub fn decode(frame: &[u8]) -> Result<Self, ProtocolError> {
        let tag = *frame.first().ok_or(ProtocolError::EmptyFrame)?;
        Ok(match MessageType::try_from(tag)? {
            MessageType::Color => Self::Color(ColorMessage::decode_frame(frame)?),
            MessageType::HttpCredentials => {
                Self::HttpCredentials(HttpCredentials::decode_frame(frame)?)
            }
            MessageType::DeviceName => Self::DeviceName(DeviceNameMessage::decode_frame(frame)?),
            MessageType::Heap => Self::Heap(HeapMessage::decode_frame(frame)?),
            MessageType::BleStatus => Self::BleStatus(BleStatus::decode_frame(frame)?),
            MessageType::WiFiStatus => Self::WiFiStatus(WiFiStatus::decode_frame(frame)?),
            MessageType::WiFiScanStatus => {
                Self::WiFiScanStatus(WiFiScanStatus::decode_frame(frame)?)
            }
            MessageType::WiFiDetails => Self::WiFiDetails(WiFiDetails::decode_frame(frame)?),
            MessageType::OtaProgress => Self::OtaProgress(OtaState::decode_frame(frame)?),
            MessageType::AlexaSettings => {
                Self::AlexaSettings(AlexaIntegrationSettings::decode_frame(frame)?)
            }
        })
    }

    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Color(_) => MessageType::Color,
            Self::HttpCredentials(_) => MessageType::HttpCredentials,
            Self::DeviceName(_) => MessageType::DeviceName,
            Self::Heap(_) => MessageType::Heap,
            Self::BleStatus(_) => MessageType::BleStatus,
            Self::WiFiStatus(_) => MessageType::WiFiStatus,
            Self::WiFiScanStatus(_) => MessageType::WiFiScanStatus,
            Self::WiFiDetails(_) => MessageType::WiFiDetails,
            Self::OtaProgress(_) => MessageType::OtaProgress,
            Self::AlexaSettings(_) => MessageType::AlexaSettings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AlexaIntegrationMode, OtaStatus, WiFiEncryptionType};

    fn channels() -> ChannelStates {
        [
            LightState::new(true, 255),
            LightState::new(false, 0),
            LightState::new(true, 128),
            LightState::new(true, 1),
        ]
    }

    #[test]
    fn test_color_command_is_bare_values() {
        let bytes = encode_color_message([255, 0, 128, 0]);
        assert_eq!(bytes.len(), COLOR_COMMAND_LENGTH);
        assert_eq!(bytes.as_ref(), &[0, 255, 0, 128, 0]);
    }

    #[test]
    fn test_color_state_roundtrip() {
        let bytes = encode_message(
            MessageType::Color,
            &ColorMessage {
                channels: channels(),
            },
        )
        .unwrap();
        assert_eq!(bytes.len(), COLOR_FRAME_LENGTH);
        assert_eq!(bytes.as_ref(), &[0, 1, 255, 0, 0, 1, 128, 1, 1]);

        let decoded = ColorMessage::decode_frame(&bytes).unwrap();
        assert_eq!(decoded.channels, channels());
    }

    #[test]
    fn test_color_command_is_not_a_state_frame() {
        let bytes = encode_color_message([255, 0, 128, 0]);
        assert!(matches!(
            ColorMessage::decode_frame(&bytes),
            Err(ProtocolError::MalformedLength { actual: 5, .. })
        ));
    }

    #[test]
    fn test_color_message_wrong_length() {
        let err = ColorMessage::decode_frame(&[0, 1, 255, 0, 0]).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MalformedLength {
                record: "color message",
                expected: 9,
                actual: 5
            }
        );
    }

    #[test]
    fn test_device_name_message() {
        let bytes = encode_device_name_message("living-room").unwrap();
        assert_eq!(bytes.len(), 1 + 32);
        assert_eq!(bytes[0], 2);
        let decoded = DeviceNameMessage::decode_frame(&bytes).unwrap();
        assert_eq!(decoded.name, "living-room");
    }

    #[test]
    fn test_http_credentials_message_length() {
        let creds = HttpCredentials {
            username: "admin".into(),
            password: "admin".into(),
        };
        let bytes = encode_http_credentials_message(&creds).unwrap();
        assert_eq!(bytes.len(), 1 + 66);
        assert_eq!(bytes[0], 1);
    }

    #[test]
    fn test_wifi_connection_details_message() {
        let details = WiFiConnectionDetails::simple(WiFiEncryptionType::Wpa2Psk, "home", "pw");
        let bytes = encode_wifi_connection_details_message(&details).unwrap();
        assert_eq!(bytes.len(), 1 + 422);
        assert_eq!(bytes[0], MessageType::WiFiStatus.code());
        assert_eq!(bytes[0], 5);
        assert_eq!(WiFiConnectionDetails::decode(&bytes[1..]).unwrap(), details);
    }

    #[test]
    fn test_alexa_settings_frame() {
        let settings = AlexaIntegrationSettings {
            integration_mode: AlexaIntegrationMode::RgbDevice,
            r_device_name: "kitchen".into(),
            g_device_name: String::new(),
            b_device_name: String::new(),
            w_device_name: "lamp".into(),
        };
        let bytes = encode_alexa_settings_message(&settings).unwrap();
        assert_eq!(bytes.len(), 130);
        assert_eq!(AlexaIntegrationSettings::decode_frame(&bytes).unwrap(), settings);
    }

    #[test]
    fn test_ble_status_message() {
        let bytes = encode_ble_status_message(BleStatus::Advertising).unwrap();
        assert_eq!(bytes.as_ref(), &[4, 1]);
    }

    #[test]
    fn test_request_frames() {
        assert_eq!(encode_heap_message().as_ref(), &[3]);
        assert_eq!(encode_wifi_scan_request().as_ref(), &[6]);
        assert_eq!(encode_ota_progress_request().as_ref(), &[8]);
    }

    #[test]
    fn test_decode_heap_and_ota() {
        let heap = DeviceMessage::decode(&[3, 0x10, 0x27, 0, 0]).unwrap();
        assert_eq!(heap, DeviceMessage::Heap(HeapMessage { free_heap: 10_000 }));

        let ota = DeviceMessage::decode(&[8, 1, 0, 4, 0, 0, 0, 2, 0, 0]).unwrap();
        match ota {
            DeviceMessage::OtaProgress(state) => {
                assert_eq!(state.status, OtaStatus::Started);
                assert_eq!(state.total_bytes_expected, 1024);
                assert_eq!(state.total_bytes_received, 512);
            }
            other => panic!("Expected OTA progress, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_wrong_tag_for_typed_decoder() {
        let err = WiFiStatus::decode_frame(&[4, 1]).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::UnexpectedType {
                expected: 5,
                actual: 4
            }
        );
    }

    #[test]
    fn test_decode_unknown_tag() {
        assert!(matches!(
            DeviceMessage::decode(&[42, 0]),
            Err(ProtocolError::InvalidValue { value: 42, .. })
        ));
        assert_eq!(DeviceMessage::decode(&[]), Err(ProtocolError::EmptyFrame));
    }

    #[test]
    fn test_message_type_of_decoded() {
        let msg = DeviceMessage::decode(&[5, 1]).unwrap();
        assert_eq!(msg, DeviceMessage::WiFiStatus(WiFiStatus::Connected));
        assert_eq!(msg.message_type(), MessageType::WiFiStatus);
    }
}
