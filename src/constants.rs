//! Application-wide constants
//!
//! Field widths mirror the packed structs in the device firmware. A field
//! of max length `N` occupies `N + 1` bytes on the wire.

// =============================================================================
// WiFi
// =============================================================================

pub const WIFI_SSID_MAX_LENGTH: usize = 32;
pub const WIFI_PASSWORD_MAX_LENGTH: usize = 64;
pub const WIFI_EAP_IDENTITY_MAX_LENGTH: usize = 128;
pub const WIFI_EAP_USERNAME_MAX_LENGTH: usize = 128;
pub const WIFI_EAP_PASSWORD_MAX_LENGTH: usize = 128;

/// Networks the device reports in one scan
pub const MAX_SCAN_NETWORK_COUNT: usize = 15;

/// MAC address width
pub const MAC_LENGTH: usize = 6;

/// password + identity + username + phase2Type
pub const EAP_CREDENTIALS_LENGTH: usize = (WIFI_EAP_PASSWORD_MAX_LENGTH + 1)
    + (WIFI_EAP_IDENTITY_MAX_LENGTH + 1)
    + (WIFI_EAP_USERNAME_MAX_LENGTH + 1)
    + 1;

pub const SIMPLE_CREDENTIALS_LENGTH: usize = WIFI_PASSWORD_MAX_LENGTH + 1;

/// Credentials union is sized by its larger branch
pub const WIFI_CONNECTION_DETAILS_LENGTH: usize =
    1 + (WIFI_SSID_MAX_LENGTH + 1) + EAP_CREDENTIALS_LENGTH;

/// ssid + mac + ip/gateway/subnet/dns
pub const WIFI_DETAILS_LENGTH: usize = (WIFI_SSID_MAX_LENGTH + 1) + MAC_LENGTH + 4 * 4;

/// encryptionType + ssid
pub const WIFI_NETWORK_LENGTH: usize = 1 + (WIFI_SSID_MAX_LENGTH + 1);

// =============================================================================
// Device
// =============================================================================

pub const DEVICE_NAME_MAX_LENGTH: usize = 31;

pub const HTTP_USERNAME_MAX_LENGTH: usize = 32;
pub const HTTP_PASSWORD_MAX_LENGTH: usize = 32;
pub const HTTP_CREDENTIALS_LENGTH: usize =
    (HTTP_USERNAME_MAX_LENGTH + 1) + (HTTP_PASSWORD_MAX_LENGTH + 1);

/// Alexa device name region (31 chars + terminator)
pub const ALEXA_DEVICE_NAME_FIELD_LENGTH: usize = 32;
pub const ALEXA_SETTINGS_LENGTH: usize = 1 + 4 * ALEXA_DEVICE_NAME_FIELD_LENGTH;

/// Number of output channels (R, G, B, W)
pub const CHANNEL_COUNT: usize = 4;
pub const LIGHT_STATE_LENGTH: usize = 2;

/// status + totalBytesExpected + totalBytesReceived
pub const OTA_PROGRESS_LENGTH: usize = 1 + 4 + 4;

// =============================================================================
// Network
// =============================================================================

/// WebSocket endpoint path on the device
pub const DEFAULT_WS_PATH: &str = "/ws";

/// Address the device uses in soft-AP mode
pub const DEFAULT_DEVICE_HOST: &str = "192.168.4.1";

// =============================================================================
// Timing - Reconnection
// =============================================================================

/// Delay before a reconnection attempt (milliseconds)
pub const RECONNECT_DELAY_MS: u64 = 5000;

/// Upper bound for backoff delays (milliseconds)
pub const MAX_RECONNECT_DELAY_MS: u64 = 60_000;

/// Time to let queued frames drain before closing a one-shot session (milliseconds)
pub const SEND_FLUSH_DELAY_MS: u64 = 200;

/// Time to wait for the socket to open in one-shot commands (seconds)
pub const OPEN_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Buffers
// =============================================================================

/// Channel capacity for outbound frames
pub const CHANNEL_CAPACITY: usize = 256;
