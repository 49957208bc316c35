//! REST endpoints served next to the WebSocket
//!
//! Only request paths are built here; issuing the HTTP request is left
//! to the caller. All endpoints are plain `GET`s except the OTA upload.

use crate::constants::CHANNEL_COUNT;
use std::fmt;

pub const REST_BASE: &str = "/rest";

/// Firmware upload endpoint, `POST` with the raw image as body
pub const OTA_UPLOAD_PATH: &str = "/update";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestRequest {
    /// JSON snapshot, see `model::DeviceState`
    State,
    /// Set raw output values, R/G/B/W
    Color([u8; CHANNEL_COUNT]),
    Bluetooth { enabled: bool },
    Restart,
    /// Factory reset
    Reset,
}

impl RestRequest {
    pub fn path(&self) -> String {
        match self {
            Self::State => format!("{}/state", REST_BASE),
            Self::Color([r, g, b, w]) => {
                format!("{}/color?r={}&g={}&b={}&w={}", REST_BASE, r, g, b, w)
            }
            Self::Bluetooth { enabled } => format!(
                "{}/bluetooth?state={}",
                REST_BASE,
                if *enabled { "on" } else { "off" }
            ),
            Self::Restart => format!("{}/system/restart", REST_BASE),
            Self::Reset => format!("{}/system/reset", REST_BASE),
        }
    }

    /// Absolute URL on `host`
    pub fn url(&self, host: &str) -> String {
        format!("http://{}{}", host, self.path())
    }
}

impl fmt::Display for RestRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GET {}", self.path())
    }
}

/// `/update?name=<slot>&md5=<hex>`
///
/// `slot` names the partition to flash; `md5` is the hex digest of the
/// image, which the device verifies before switching partitions.
pub fn ota_upload_path(slot: &str, md5: &str) -> String {
    format!("{}?name={}&md5={}", OTA_UPLOAD_PATH, slot, md5.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(RestRequest::State.path(), "/rest/state");
        assert_eq!(
            RestRequest::Color([255, 0, 128, 1]).path(),
            "/rest/color?r=255&g=0&b=128&w=1"
        );
        assert_eq!(
            RestRequest::Bluetooth { enabled: false }.path(),
            "/rest/bluetooth?state=off"
        );
        assert_eq!(RestRequest::Restart.path(), "/rest/system/restart");
        assert_eq!(RestRequest::Reset.path(), "/rest/system/reset");
    }

    #[test]
    fn test_url_and_display() {
        let request = RestRequest::Bluetooth { enabled: true };
        assert_eq!(
            request.url("192.168.4.1"),
            "http://192.168.4.1/rest/bluetooth?state=on"
        );
        assert_eq!(request.to_string(), "GET /rest/bluetooth?state=on");
    }

    #[test]
    fn test_ota_upload_path() {
        assert_eq!(
            ota_upload_path("firmware", "9E107D9D372BB6826BD81D3542A419D6"),
            "/update?name=firmware&md5=9e107d9d372bb6826bd81d3542a419d6"
        );
    }
}
