//! WiFi records: scan entries, connection details, status snapshot

use crate::codec::{FieldReader, FieldWriter, Record};
use crate::constants::{
    EAP_CREDENTIALS_LENGTH, MAC_LENGTH, SIMPLE_CREDENTIALS_LENGTH, WIFI_CONNECTION_DETAILS_LENGTH,
    WIFI_DETAILS_LENGTH, WIFI_EAP_IDENTITY_MAX_LENGTH, WIFI_EAP_PASSWORD_MAX_LENGTH,
    WIFI_EAP_USERNAME_MAX_LENGTH, WIFI_NETWORK_LENGTH, WIFI_PASSWORD_MAX_LENGTH,
    WIFI_SSID_MAX_LENGTH,
};
use crate::error::ProtocolError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

// =============================================================================
// Enumerated codes
// =============================================================================

code_enum! {
    /// Authentication mode reported by a scan or chosen for a connection
    pub enum WiFiEncryptionType: "encryption type" {
        Open = 0,
        Wep = 1,
        WpaPsk = 2,
        Wpa2Psk = 3,
        WpaWpa2Psk = 4,
        Wpa2Enterprise = 5,
        Wpa3Psk = 6,
        Wpa2Wpa3Psk = 7,
        WapiPsk = 8,
        Wpa3Ent192 = 9,
        Invalid = 10,
    }
}

impl WiFiEncryptionType {
    /// Enterprise (802.1X) modes carry the EAP credential branch
    pub fn is_enterprise(self) -> bool {
        matches!(self, Self::Wpa2Enterprise | Self::Wpa3Ent192)
    }
}

code_enum! {
    /// Inner authentication method for EAP-TTLS
    pub enum WiFiPhaseTwoType: "phase-2 type" {
        Eap = 0,
        Mschapv2 = 1,
        Mschap = 2,
        Pap = 3,
        Chap = 4,
    }
}

code_enum! {
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum WiFiStatus: "wifi status" {
        Disconnected = 0,
        Connected = 1,
        ConnectedNoIp = 2,
        WrongPassword = 3,
        NoApFound = 4,
        ConnectionFailed = 5,
        Unknown = 255,
    }
}

code_enum! {
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum WiFiScanStatus: "wifi scan status" {
        NotStarted = 0,
        Running = 1,
        Completed = 2,
        Failed = 3,
    }
}

impl Record for WiFiStatus {
    const ENCODED_LEN: usize = 1;

    fn read_from(reader: &mut FieldReader<'_>) -> Result<Self, ProtocolError> {
        Self::try_from(reader.read_u8()?)
    }

    fn write_to(&self, writer: &mut FieldWriter) -> Result<(), ProtocolError> {
        writer.write_u8(self.code());
        Ok(())
    }
}

impl Record for WiFiScanStatus {
    const ENCODED_LEN: usize = 1;

    fn read_from(reader: &mut FieldReader<'_>) -> Result<Self, ProtocolError> {
        Self::try_from(reader.read_u8()?)
    }

    fn write_to(&self, writer: &mut FieldWriter) -> Result<(), ProtocolError> {
        writer.write_u8(self.code());
        Ok(())
    }
}

// =============================================================================
// Scan results
// =============================================================================

/// One network seen during a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WiFiNetwork {
    pub ssid: String,
    pub encryption_type: WiFiEncryptionType,
}

impl Record for WiFiNetwork {
    const ENCODED_LEN: usize = WIFI_NETWORK_LENGTH;

    fn read_from(reader: &mut FieldReader<'_>) -> Result<Self, ProtocolError> {
        let encryption_type = WiFiEncryptionType::try_from(reader.read_u8()?)?;
        let ssid = reader.read_cstring(WIFI_SSID_MAX_LENGTH + 1)?;
        Ok(Self {
            ssid,
            encryption_type,
        })
    }

    fn write_to(&self, writer: &mut FieldWriter) -> Result<(), ProtocolError> {
        writer.write_u8(self.encryption_type.code());
        writer.write_cstring(&self.ssid, WIFI_SSID_MAX_LENGTH);
        Ok(())
    }
}

/// Scan result: a count byte followed by that many networks
///
/// Networks keep the order the device reported them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WiFiScanResult {
    pub networks: Vec<WiFiNetwork>,
}

impl WiFiScanResult {
    pub fn decode(buffer: &[u8]) -> Result<Self, ProtocolError> {
        let mut reader = FieldReader::new(buffer);
        let count = reader.read_u8()? as usize;
        let mut networks = Vec::with_capacity(count);
        for _ in 0..count {
            networks.push(WiFiNetwork::read_from(&mut reader)?);
        }
        Ok(Self { networks })
    }

    pub fn encode(&self) -> Result<Bytes, ProtocolError> {
        let count = u8::try_from(self.networks.len()).map_err(|_| {
            ProtocolError::TooManyNetworks {
                count: self.networks.len(),
            }
        })?;
        let mut writer = FieldWriter::with_capacity(1 + self.networks.len() * WIFI_NETWORK_LENGTH);
        writer.write_u8(count);
        for network in &self.networks {
            network.write_to(&mut writer)?;
        }
        Ok(writer.finish())
    }

    /// True if any reported network has this SSID
    pub fn contains(&self, ssid: &str) -> bool {
        self.networks
            .iter()
            .any(|n| !n.ssid.is_empty() && n.ssid == ssid)
    }
}

// =============================================================================
// Status snapshot
// =============================================================================

/// Raw 6-byte hardware address
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MacAddress(pub [u8; MAC_LENGTH]);

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            a, b, c, d, e, g
        )
    }
}

/// Interpret a wire address: the first byte in memory is the first octet
pub fn ipv4_from_wire(value: u32) -> Ipv4Addr {
    Ipv4Addr::from(value.to_le_bytes())
}

/// Current connection as reported by the device
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WiFiDetails {
    pub ssid: String,
    pub mac: MacAddress,
    pub ip: u32,
    pub gateway: u32,
    pub subnet: u32,
    pub dns: u32,
}

impl WiFiDetails {
    pub fn ip_addr(&self) -> Ipv4Addr {
        ipv4_from_wire(self.ip)
    }

    pub fn gateway_addr(&self) -> Ipv4Addr {
        ipv4_from_wire(self.gateway)
    }

    pub fn subnet_mask(&self) -> Ipv4Addr {
        ipv4_from_wire(self.subnet)
    }

    pub fn dns_addr(&self) -> Ipv4Addr {
        ipv4_from_wire(self.dns)
    }
}

impl Record for WiFiDetails {
    const ENCODED_LEN: usize = WIFI_DETAILS_LENGTH;

    fn read_from(reader: &mut FieldReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            ssid: reader.read_cstring(WIFI_SSID_MAX_LENGTH + 1)?,
            mac: MacAddress(reader.read_array()?),
            ip: reader.read_u32()?,
            gateway: reader.read_u32()?,
            subnet: reader.read_u32()?,
            dns: reader.read_u32()?,
        })
    }

    fn write_to(&self, writer: &mut FieldWriter) -> Result<(), ProtocolError> {
        writer.write_cstring(&self.ssid, WIFI_SSID_MAX_LENGTH);
        writer.write_bytes(&self.mac.0);
        writer.write_u32(self.ip);
        writer.write_u32(self.gateway);
        writer.write_u32(self.subnet);
        writer.write_u32(self.dns);
        Ok(())
    }
}

// =============================================================================
// Connection details
// =============================================================================

/// 802.1X credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EapCredentials {
    pub identity: String,
    pub username: String,
    pub password: String,
    pub phase2_type: WiFiPhaseTwoType,
}

/// Credentials union
///
/// The variant is chosen by the caller; it must agree with
/// `WiFiEncryptionType::is_enterprise` for the record to encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WiFiCredentials {
    Simple { password: String },
    Enterprise(EapCredentials),
}

impl WiFiCredentials {
    pub fn is_enterprise(&self) -> bool {
        matches!(self, Self::Enterprise(_))
    }
}

/// Request to join a network
///
/// Always `WIFI_CONNECTION_DETAILS_LENGTH` bytes: the simple branch is
/// zero-padded to the size of the enterprise branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WiFiConnectionDetails {
    pub encryption_type: WiFiEncryptionType,
    pub ssid: String,
    pub credentials: WiFiCredentials,
}

impl WiFiConnectionDetails {
    /// Personal network with a pre-shared key (or none, for open networks)
    pub fn simple(
        encryption_type: WiFiEncryptionType,
        ssid: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            encryption_type,
            ssid: ssid.into(),
            credentials: WiFiCredentials::Simple {
                password: password.into(),
            },
        }
    }

    /// Enterprise network
    pub fn enterprise(
        encryption_type: WiFiEncryptionType,
        ssid: impl Into<String>,
        credentials: EapCredentials,
    ) -> Self {
        Self {
            encryption_type,
            ssid: ssid.into(),
            credentials: WiFiCredentials::Enterprise(credentials),
        }
    }
}

impl Record for WiFiConnectionDetails {
    const ENCODED_LEN: usize = WIFI_CONNECTION_DETAILS_LENGTH;

    fn read_from(reader: &mut FieldReader<'_>) -> Result<Self, ProtocolError> {
        let encryption_type = WiFiEncryptionType::try_from(reader.read_u8()?)?;
        let ssid = reader.read_cstring(WIFI_SSID_MAX_LENGTH + 1)?;

        let credentials = if encryption_type.is_enterprise() {
            let password = reader.read_cstring(WIFI_EAP_PASSWORD_MAX_LENGTH + 1)?;
            let identity = reader.read_cstring(WIFI_EAP_IDENTITY_MAX_LENGTH + 1)?;
            let username = reader.read_cstring(WIFI_EAP_USERNAME_MAX_LENGTH + 1)?;
            let phase2_type = WiFiPhaseTwoType::try_from(reader.read_u8()?)?;
            WiFiCredentials::Enterprise(EapCredentials {
                identity,
                username,
                password,
                phase2_type,
            })
        } else {
            let password = reader.read_cstring(WIFI_PASSWORD_MAX_LENGTH + 1)?;
            reader.skip(EAP_CREDENTIALS_LENGTH - SIMPLE_CREDENTIALS_LENGTH)?;
            WiFiCredentials::Simple { password }
        };

        Ok(Self {
            encryption_type,
            ssid,
            credentials,
        })
    }

    fn write_to(&self, writer: &mut FieldWriter) -> Result<(), ProtocolError> {
        if self.encryption_type.is_enterprise() != self.credentials.is_enterprise() {
            return Err(ProtocolError::CredentialMismatch {
                encryption_type: self.encryption_type.code(),
            });
        }

        writer.write_u8(self.encryption_type.code());
        writer.write_cstring(&self.ssid, WIFI_SSID_MAX_LENGTH);

        match &self.credentials {
            WiFiCredentials::Simple { password } => {
                writer.write_cstring(password, WIFI_PASSWORD_MAX_LENGTH);
                writer.write_zeros(EAP_CREDENTIALS_LENGTH - SIMPLE_CREDENTIALS_LENGTH);
            }
            WiFiCredentials::Enterprise(eap) => {
                writer.write_cstring(&eap.password, WIFI_EAP_PASSWORD_MAX_LENGTH);
                writer.write_cstring(&eap.identity, WIFI_EAP_IDENTITY_MAX_LENGTH);
                writer.write_cstring(&eap.username, WIFI_EAP_USERNAME_MAX_LENGTH);
                writer.write_u8(eap.phase2_type.code());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eap() -> EapCredentials {
        EapCredentials {
            identity: "anon@corp".into(),
            username: "jdoe".into(),
            password: "hunter2".into(),
            phase2_type: WiFiPhaseTwoType::Mschapv2,
        }
    }

    #[test]
    fn test_enterprise_codes() {
        let enterprise: Vec<_> = WiFiEncryptionType::ALL
            .iter()
            .filter(|t| t.is_enterprise())
            .map(|t| t.code())
            .collect();
        assert_eq!(enterprise, vec![5, 9]);
    }

    #[test]
    fn test_encryption_type_out_of_range() {
        assert_eq!(
            WiFiEncryptionType::try_from(11),
            Err(ProtocolError::InvalidValue {
                field: "encryption type",
                value: 11
            })
        );
    }

    #[test]
    fn test_connection_details_fixed_length() {
        assert_eq!(WIFI_CONNECTION_DETAILS_LENGTH, 1 + 33 + 388);

        let simple = WiFiConnectionDetails::simple(WiFiEncryptionType::Wpa2Psk, "home", "secret");
        let enterprise =
            WiFiConnectionDetails::enterprise(WiFiEncryptionType::Wpa2Enterprise, "corp", eap());

        assert_eq!(simple.encode().unwrap().len(), 422);
        assert_eq!(enterprise.encode().unwrap().len(), 422);
    }

    #[test]
    fn test_simple_branch_padding_is_zero() {
        let details = WiFiConnectionDetails::simple(WiFiEncryptionType::WpaPsk, "home", "pw");
        let bytes = details.encode().unwrap();
        assert!(bytes[1 + 33 + 65..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_decode_enterprise_branch() {
        let details =
            WiFiConnectionDetails::enterprise(WiFiEncryptionType::Wpa2Enterprise, "corp", eap());
        let bytes = details.encode().unwrap();
        assert_eq!(bytes[0], 5);

        let decoded = WiFiConnectionDetails::decode(&bytes).unwrap();
        match decoded.credentials {
            WiFiCredentials::Enterprise(creds) => {
                assert_eq!(creds.identity, "anon@corp");
                assert_eq!(creds.username, "jdoe");
                assert_eq!(creds.password, "hunter2");
                assert_eq!(creds.phase2_type, WiFiPhaseTwoType::Mschapv2);
            }
            other => panic!("Expected enterprise credentials, got {:?}", other),
        }
    }

    #[test]
    fn test_enterprise_field_order_matches_firmware() {
        let details =
            WiFiConnectionDetails::enterprise(WiFiEncryptionType::Wpa3Ent192, "corp", eap());
        let bytes = details.encode().unwrap();
        let base = 1 + 33;
        assert_eq!(&bytes[base..base + 7], b"hunter2");
        assert_eq!(&bytes[base + 129..base + 129 + 9], b"anon@corp");
        assert_eq!(&bytes[base + 258..base + 258 + 4], b"jdoe");
        assert_eq!(bytes[base + 387], WiFiPhaseTwoType::Mschapv2.code());
    }

    #[test]
    fn test_decode_simple_branch() {
        let details = WiFiConnectionDetails::simple(WiFiEncryptionType::WpaPsk, "home", "secret");
        let decoded = WiFiConnectionDetails::decode(&details.encode().unwrap()).unwrap();
        assert_eq!(decoded.encryption_type.code(), 2);
        assert_eq!(
            decoded.credentials,
            WiFiCredentials::Simple {
                password: "secret".into()
            }
        );
    }

    #[test]
    fn test_mismatched_credentials_rejected() {
        let enterprise_type_simple_creds =
            WiFiConnectionDetails::simple(WiFiEncryptionType::Wpa2Enterprise, "corp", "pw");
        assert_eq!(
            enterprise_type_simple_creds.encode(),
            Err(ProtocolError::CredentialMismatch { encryption_type: 5 })
        );

        let personal_type_eap_creds =
            WiFiConnectionDetails::enterprise(WiFiEncryptionType::Wpa2Psk, "home", eap());
        assert_eq!(
            personal_type_eap_creds.encode(),
            Err(ProtocolError::CredentialMismatch { encryption_type: 3 })
        );
    }

    #[test]
    fn test_truncated_connection_details() {
        let details = WiFiConnectionDetails::simple(WiFiEncryptionType::Open, "cafe", "");
        let bytes = details.encode().unwrap();
        let err = WiFiConnectionDetails::decode(&bytes[..100]).unwrap_err();
        assert!(matches!(err, ProtocolError::TruncatedBuffer { .. }));
    }

    #[test]
    fn test_scan_result_preserves_order() {
        let mut buffer = vec![3u8];
        for (ty, ssid) in [(3u8, "zeta"), (0, "alpha"), (5, "corp")] {
            buffer.push(ty);
            let mut field = [0u8; 33];
            field[..ssid.len()].copy_from_slice(ssid.as_bytes());
            buffer.extend_from_slice(&field);
        }

        let result = WiFiScanResult::decode(&buffer).unwrap();
        let ssids: Vec<_> = result.networks.iter().map(|n| n.ssid.as_str()).collect();
        assert_eq!(ssids, vec!["zeta", "alpha", "corp"]);
        assert_eq!(
            result.networks[2].encryption_type,
            WiFiEncryptionType::Wpa2Enterprise
        );
        assert!(result.contains("alpha"));
        assert!(!result.contains("beta"));
    }

    #[test]
    fn test_scan_result_count_exceeds_buffer() {
        let err = WiFiScanResult::decode(&[2, 0]).unwrap_err();
        assert!(matches!(err, ProtocolError::TruncatedBuffer { .. }));
    }

    #[test]
    fn test_empty_scan_result() {
        let result = WiFiScanResult::decode(&[0]).unwrap();
        assert!(result.networks.is_empty());
        assert_eq!(result.encode().unwrap().as_ref(), &[0]);
    }

    #[test]
    fn test_wifi_details_decode() {
        let mut buffer = vec![0u8; WIFI_DETAILS_LENGTH];
        buffer[..4].copy_from_slice(b"home");
        buffer[33..39].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x0A]);
        buffer[39..43].copy_from_slice(&[192, 168, 1, 42]);
        buffer[43..47].copy_from_slice(&[192, 168, 1, 1]);
        buffer[47..51].copy_from_slice(&[255, 255, 255, 0]);
        buffer[51..55].copy_from_slice(&[8, 8, 8, 8]);

        let details = WiFiDetails::decode(&buffer).unwrap();
        assert_eq!(details.ssid, "home");
        assert_eq!(details.mac.to_string(), "DE:AD:BE:EF:00:0A");
        assert_eq!(details.ip_addr(), Ipv4Addr::new(192, 168, 1, 42));
        assert_eq!(details.gateway_addr(), Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(details.subnet_mask(), Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(details.dns_addr(), Ipv4Addr::new(8, 8, 8, 8));
        assert_eq!(details.encode().unwrap().as_ref(), buffer.as_slice());
    }

    #[test]
    fn test_wifi_status_codes() {
        assert_eq!(WiFiStatus::try_from(255), Ok(WiFiStatus::Unknown));
        assert!(WiFiStatus::try_from(6).is_err());
        assert_eq!(WiFiScanStatus::decode(&[2]), Ok(WiFiScanStatus::Completed));
    }
}
