//! Record models
//!
//! Each record mirrors one packed struct in the device firmware and
//! implements `codec::Record`. All records are plain values: decoded
//! fresh from every buffer, dropped after the handler returns.

pub mod alexa;
pub mod ble;
pub mod device;
pub mod http;
pub mod light;
pub mod ota;
pub mod wifi;

pub use alexa::{AlexaIntegrationMode, AlexaIntegrationSettings};
pub use ble::BleStatus;
pub use device::DeviceState;
pub use http::HttpCredentials;
pub use light::{ChannelStates, LightState};
pub use ota::{OtaState, OtaStatus};
pub use wifi::{
    EapCredentials, MacAddress, WiFiConnectionDetails, WiFiCredentials, WiFiDetails,
    WiFiEncryptionType, WiFiNetwork, WiFiPhaseTwoType, WiFiScanResult, WiFiScanStatus, WiFiStatus,
};
