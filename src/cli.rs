//! Command-line interface definition using clap
//!
//! Provides structured argument parsing with automatic help generation.

use crate::error::ProtocolError;
use crate::model::{
    AlexaIntegrationMode, AlexaIntegrationSettings, BleStatus, EapCredentials,
    WiFiConnectionDetails, WiFiEncryptionType, WiFiPhaseTwoType,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

// =============================================================================
// CLI Definition
// =============================================================================

/// WebSocket client for RGBW lighting controllers
#[derive(Parser, Debug)]
#[command(name = "rgbw-link")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: ./config.toml if present)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Device host, optionally with :port (overrides config)
    #[arg(long, value_name = "HOST", global = true)]
    pub host: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Stay connected and print every message the device sends
    Monitor,

    /// Set the four output channels (0 switches a channel off)
    Color { r: u8, g: u8, b: u8, w: u8 },

    /// Rename the device (max 31 bytes)
    DeviceName { name: String },

    /// Set the web server's basic-auth credentials
    HttpCredentials { username: String, password: String },

    /// Join a WiFi network
    WifiConnect(WifiConnectArgs),

    /// Configure the Alexa integration
    Alexa(AlexaArgs),

    /// Switch the Bluetooth radio
    Ble { state: Toggle },

    /// Start a WiFi scan
    Scan,

    /// Request the free heap size
    Heap,

    /// Request firmware update progress
    OtaProgress,

    /// Print the REST paths and BLE characteristic UUIDs
    Endpoints,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct WifiConnectArgs {
    pub ssid: String,

    /// Pre-shared key (personal networks)
    #[arg(long, conflicts_with_all = ["identity", "username", "eap_password"])]
    pub password: Option<String>,

    /// EAP identity (enterprise networks)
    #[arg(long, requires_all = ["username", "eap_password"])]
    pub identity: Option<String>,

    /// EAP username
    #[arg(long, requires = "identity")]
    pub username: Option<String>,

    /// EAP password
    #[arg(long, requires = "identity")]
    pub eap_password: Option<String>,

    /// EAP phase-2 method code (0 EAP, 1 MSCHAPv2, 2 MSCHAP, 3 PAP, 4 CHAP)
    #[arg(long, default_value_t = 0)]
    pub phase2: u8,

    /// Encryption type code (default: WPA2-Enterprise with --identity,
    /// open without a password, WPA2-PSK otherwise)
    #[arg(long, value_name = "CODE")]
    pub encryption: Option<u8>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct AlexaArgs {
    /// Integration mode code (0 off, 1 RGBW, 2 RGB, 3 multi-device)
    pub mode: u8,
    #[arg(default_value = "")]
    pub r: String,
    #[arg(default_value = "")]
    pub g: String,
    #[arg(default_value = "")]
    pub b: String,
    #[arg(default_value = "")]
    pub w: String,
}

// =============================================================================
// Argument conversion
// =============================================================================

impl Toggle {
    pub fn ble_status(self) -> BleStatus {
        match self {
            Self::On => BleStatus::Advertising,
            Self::Off => BleStatus::Off,
        }
    }
}

impl WifiConnectArgs {
    pub fn details(&self) -> Result<WiFiConnectionDetails, ProtocolError> {
        let encryption_type = match self.encryption {
            Some(code) => WiFiEncryptionType::try_from(code)?,
            None if self.identity.is_some() => WiFiEncryptionType::Wpa2Enterprise,
            None if self.password.as_deref().unwrap_or("").is_empty() => WiFiEncryptionType::Open,
            None => WiFiEncryptionType::Wpa2Psk,
        };

        match &self.identity {
            Some(identity) => Ok(WiFiConnectionDetails::enterprise(
                encryption_type,
                self.ssid.as_str(),
                EapCredentials {
                    identity: identity.clone(),
                    username: self.username.clone().unwrap_or_default(),
                    password: self.eap_password.clone().unwrap_or_default(),
                    phase2_type: WiFiPhaseTwoType::try_from(self.phase2)?,
                },
            )),
            None => Ok(WiFiConnectionDetails::simple(
                encryption_type,
                self.ssid.as_str(),
                self.password.clone().unwrap_or_default(),
            )),
        }
    }
}

impl AlexaArgs {
    pub fn settings(&self) -> Result<AlexaIntegrationSettings, ProtocolError> {
        Ok(AlexaIntegrationSettings {
            integration_mode: AlexaIntegrationMode::try_from(self.mode)?,
            r_device_name: self.r.clone(),
            g_device_name: self.g.clone(),
            b_device_name: self.b.clone(),
            w_device_name: self.w.clone(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WiFiCredentials;

    #[test]
    fn test_cli_parse_monitor() {
        let cli = Cli::parse_from(["rgbw-link", "monitor"]);
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
        assert_eq!(cli.command, Command::Monitor);
    }

    #[test]
    fn test_cli_parse_global_flags_after_command() {
        let cli = Cli::parse_from(["rgbw-link", "heap", "-v", "--host", "10.0.0.7"]);
        assert!(cli.verbose);
        assert_eq!(cli.host.as_deref(), Some("10.0.0.7"));
        assert_eq!(cli.command, Command::Heap);
    }

    #[test]
    fn test_cli_parse_color() {
        let cli = Cli::parse_from(["rgbw-link", "color", "255", "0", "128", "1"]);
        assert_eq!(
            cli.command,
            Command::Color {
                r: 255,
                g: 0,
                b: 128,
                w: 1
            }
        );
    }

    #[test]
    fn test_cli_rejects_out_of_range_color() {
        assert!(Cli::try_parse_from(["rgbw-link", "color", "256", "0", "0", "0"]).is_err());
    }

    #[test]
    fn test_cli_parse_ble() {
        let cli = Cli::parse_from(["rgbw-link", "ble", "off"]);
        assert_eq!(cli.command, Command::Ble { state: Toggle::Off });
        assert_eq!(Toggle::On.ble_status(), BleStatus::Advertising);
    }

    #[test]
    fn test_wifi_connect_personal() {
        let cli = Cli::parse_from(["rgbw-link", "wifi-connect", "home", "--password", "secret"]);
        let Command::WifiConnect(args) = cli.command else {
            panic!("Expected wifi-connect");
        };
        let details = args.details().unwrap();
        assert_eq!(details.encryption_type, WiFiEncryptionType::Wpa2Psk);
        assert_eq!(
            details.credentials,
            WiFiCredentials::Simple {
                password: "secret".into()
            }
        );
    }

    #[test]
    fn test_wifi_connect_enterprise() {
        let cli = Cli::parse_from([
            "rgbw-link",
            "wifi-connect",
            "corp",
            "--identity",
            "anon",
            "--username",
            "jdoe",
            "--eap-password",
            "pw",
            "--phase2",
            "1",
        ]);
        let Command::WifiConnect(args) = cli.command else {
            panic!("Expected wifi-connect");
        };
        let details = args.details().unwrap();
        assert_eq!(details.encryption_type, WiFiEncryptionType::Wpa2Enterprise);
        match details.credentials {
            WiFiCredentials::Enterprise(eap) => {
                assert_eq!(eap.identity, "anon");
                assert_eq!(eap.phase2_type, WiFiPhaseTwoType::Mschapv2);
            }
            other => panic!("Expected enterprise credentials, got {:?}", other),
        }
    }

    #[test]
    fn test_wifi_connect_conflicting_flags() {
        let result = Cli::try_parse_from([
            "rgbw-link",
            "wifi-connect",
            "corp",
            "--password",
            "x",
            "--identity",
            "anon",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_wifi_connect_open_network() {
        let cli = Cli::parse_from(["rgbw-link", "wifi-connect", "cafe"]);
        let Command::WifiConnect(args) = cli.command else {
            panic!("Expected wifi-connect");
        };
        assert_eq!(args.details().unwrap().encryption_type, WiFiEncryptionType::Open);
    }

    #[test]
    fn test_alexa_defaults_empty_names() {
        let cli = Cli::parse_from(["rgbw-link", "alexa", "2", "kitchen"]);
        let Command::Alexa(args) = cli.command else {
            panic!("Expected alexa");
        };
        let settings = args.settings().unwrap();
        assert_eq!(settings.integration_mode, AlexaIntegrationMode::RgbDevice);
        assert_eq!(settings.r_device_name, "kitchen");
        assert_eq!(settings.w_device_name, "");

        let bad = AlexaArgs {
            mode: 9,
            ..args
        };
        assert!(bad.settings().is_err());
    }
}
