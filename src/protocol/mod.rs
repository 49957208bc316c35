//! Message framing for the multiplexed WebSocket channel
//!
//! Frame format: `[type, payload...]`
//! - type: 1 byte `MessageType` tag
//! - payload: the tagged record's fixed-length encoding
//!
//! BLE characteristics carry the bare payload; the characteristic UUID
//! plays the role of the tag there.

pub mod messages;

pub use messages::{
    ColorMessage, DeviceMessage, DeviceNameMessage, HeapMessage, InboundMessage,
};

use crate::error::ProtocolError;
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

code_enum! {
    /// Frame tag, byte 0 of every WebSocket frame
    pub enum MessageType: "message type" {
        Color = 0,
        HttpCredentials = 1,
        DeviceName = 2,
        Heap = 3,
        BleStatus = 4,
        WiFiStatus = 5,
        WiFiScanStatus = 6,
        WiFiDetails = 7,
        OtaProgress = 8,
        AlexaSettings = 9,
    }
}

impl MessageType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::HttpCredentials => "http-credentials",
            Self::DeviceName => "device-name",
            Self::Heap => "heap",
            Self::BleStatus => "ble-status",
            Self::WiFiStatus => "wifi-status",
            Self::WiFiScanStatus => "wifi-scan-status",
            Self::WiFiDetails => "wifi-details",
            Self::OtaProgress => "ota-progress",
            Self::AlexaSettings => "alexa-settings",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Prefix `payload` with its one-byte type tag
pub fn frame(message_type: MessageType, payload: &[u8]) -> Bytes {
    let mut buffer = BytesMut::with_capacity(1 + payload.len());
    buffer.put_u8(message_type.code());
    buffer.put_slice(payload);
    buffer.freeze()
}

/// Frame with no payload (requests and pings)
pub fn empty_frame(message_type: MessageType) -> Bytes {
    frame(message_type, &[])
}

/// Check the tag and return the payload that follows it
pub fn payload_of(frame: &[u8], expected: MessageType) -> Result<&[u8], ProtocolError> {
    let (&tag, payload) = frame.split_first().ok_or(ProtocolError::EmptyFrame)?;
    if tag != expected.code() {
        return Err(ProtocolError::UnexpectedType {
            expected: expected.code(),
            actual: tag,
        });
    }
    Ok(payload)
}
