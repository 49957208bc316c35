//! Centralized error types for the link
//!
//! Wire-level failures are `ProtocolError`; everything around the socket
//! (connecting, config, runtime) is `LinkError`.
//! Use `Result<T>` as shorthand for `std::result::Result<T, LinkError>`.

use std::fmt;
use std::path::PathBuf;

/// Errors raised while encoding or decoding a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A read would run past the end of the buffer
    TruncatedBuffer {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    /// A record that must have an exact size did not
    MalformedLength {
        record: &'static str,
        expected: usize,
        actual: usize,
    },
    /// An enumerated byte outside its declared range
    InvalidValue { field: &'static str, value: u8 },
    /// Frame tag does not match the decoder being used
    UnexpectedType { expected: u8, actual: u8 },
    /// Zero-length frame
    EmptyFrame,
    /// Credentials variant disagrees with the encryption type
    CredentialMismatch { encryption_type: u8 },
    /// Scan result holds more networks than the count byte can carry
    TooManyNetworks { count: usize },
}

impl std::error::Error for ProtocolError {}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedBuffer {
                offset,
                needed,
                remaining,
            } => write!(
                f,
                "Truncated buffer at offset {}: need {} bytes, {} remaining",
                offset, needed, remaining
            ),
            Self::MalformedLength {
                record,
                expected,
                actual,
            } => write!(
                f,
                "Invalid {} length: expected {} bytes, got {}",
                record, expected, actual
            ),
            Self::InvalidValue { field, value } => write!(f, "Invalid {}: {}", field, value),
            Self::UnexpectedType { expected, actual } => write!(
                f,
                "Unexpected message type {} (expected {})",
                actual, expected
            ),
            Self::EmptyFrame => write!(f, "Empty frame"),
            Self::CredentialMismatch { encryption_type } => write!(
                f,
                "Credentials do not match encryption type {}",
                encryption_type
            ),
            Self::TooManyNetworks { count } => {
                write!(f, "Too many networks in scan result ({})", count)
            }
        }
    }
}

/// All link errors
#[derive(Debug)]
pub enum LinkError {
    // === Transport ===
    /// WebSocket handshake or TCP connect failed
    Connect {
        url: String,
        source: Box<tokio_tungstenite::tungstenite::Error>,
    },
    /// Session is not open (timed out waiting, or shut down)
    NotOpen,

    // === Protocol ===
    /// Encoding or decoding failed
    Protocol(ProtocolError),

    // === Config ===
    /// Failed to read config file
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse config file
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Invalid config value
    ConfigValidation { field: &'static str, reason: String },

    // === Runtime ===
    /// Tokio runtime creation failed
    Runtime { source: std::io::Error },
}

impl std::error::Error for LinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Connect { source, .. } => Some(source.as_ref()),
            Self::Protocol(source) => Some(source),
            Self::ConfigRead { source, .. } | Self::Runtime { source } => Some(source),
            Self::ConfigParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect { url, source } => write!(f, "Cannot connect to {}: {}", url, source),
            Self::NotOpen => write!(f, "WebSocket is not open"),
            Self::Protocol(e) => write!(f, "Protocol error: {}", e),
            Self::ConfigRead { path, .. } => write!(f, "Cannot read config: {}", path.display()),
            Self::ConfigParse { path, source } => {
                write!(f, "Invalid config {}: {}", path.display(), source)
            }
            Self::ConfigValidation { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
            Self::Runtime { .. } => write!(f, "Failed to create runtime"),
        }
    }
}

impl From<ProtocolError> for LinkError {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

/// Alias for Result with LinkError
pub type Result<T> = std::result::Result<T, LinkError>;
