//! Device state snapshot served by `GET /rest/state`
//!
//! This is the JSON mirror of the binary records, used to seed a UI
//! before the WebSocket delivers live updates. Addresses arrive already
//! formatted as strings.

use super::alexa::AlexaIntegrationMode;
use super::ble::BleStatus;
use super::light::ChannelStates;
use super::ota::OtaState;
use super::wifi::WiFiStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceState {
    pub device_name: String,
    pub firmware_version: String,
    pub heap: u32,
    pub wifi: WiFiState,
    pub alexa: AlexaState,
    pub output: ChannelStates,
    pub ble: BleState,
    pub ota: OtaState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WiFiState {
    pub details: WiFiDetailsState,
    pub status: WiFiStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WiFiDetailsState {
    pub ssid: String,
    pub mac: String,
    pub ip: String,
    pub gateway: String,
    pub subnet: String,
    pub dns: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlexaState {
    pub mode: AlexaIntegrationMode,
    #[serde(default)]
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BleState {
    pub status: BleStatus,
}

impl DeviceState {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ota::OtaStatus;

    const SNAPSHOT: &str = r#"{
        "deviceName": "rgbw-ctrl-01",
        "firmwareVersion": "1.4.2",
        "heap": 154320,
        "wifi": {
            "details": {
                "ssid": "home",
                "mac": "DE:AD:BE:EF:00:0A",
                "ip": "192.168.1.42",
                "gateway": "192.168.1.1",
                "subnet": "255.255.255.0",
                "dns": "8.8.8.8"
            },
            "status": "CONNECTED_NO_IP"
        },
        "alexa": {"mode": "RGBW_DEVICE", "names": ["Desk"]},
        "output": [
            {"on": true, "value": 255},
            {"on": false, "value": 0},
            {"on": true, "value": 128},
            {"on": true, "value": 1}
        ],
        "ble": {"status": "ADVERTISING"},
        "ota": {
            "status": "Update in progress",
            "totalBytesExpected": 2048,
            "totalBytesReceived": 1024
        }
    }"#;

    #[test]
    fn test_parse_snapshot() {
        let state = DeviceState::from_json(SNAPSHOT).unwrap();
        assert_eq!(state.device_name, "rgbw-ctrl-01");
        assert_eq!(state.wifi.status, WiFiStatus::ConnectedNoIp);
        assert_eq!(state.wifi.details.ip, "192.168.1.42");
        assert_eq!(state.alexa.mode, AlexaIntegrationMode::RgbwDevice);
        assert_eq!(state.alexa.names, vec!["Desk".to_string()]);
        assert!(!state.output[1].on);
        assert_eq!(state.output[2].value, 128);
        assert_eq!(state.ble.status, BleStatus::Advertising);
        assert_eq!(state.ota.status, OtaStatus::Started);
        assert_eq!(state.ota.percentage(), 50);
    }

    #[test]
    fn test_unknown_status_string_rejected() {
        let broken = SNAPSHOT.replace("CONNECTED_NO_IP", "MAYBE");
        assert!(DeviceState::from_json(&broken).is_err());
    }
}
