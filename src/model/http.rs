//! HTTP basic-auth credentials for the device web server

use crate::codec::{FieldReader, FieldWriter, Record};
use crate::constants::{HTTP_CREDENTIALS_LENGTH, HTTP_PASSWORD_MAX_LENGTH, HTTP_USERNAME_MAX_LENGTH};
use crate::error::ProtocolError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpCredentials {
    pub username: String,
    pub password: String,
}

impl Record for HttpCredentials {
    const ENCODED_LEN: usize = HTTP_CREDENTIALS_LENGTH;

    fn read_from(reader: &mut FieldReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            username: reader.read_cstring(HTTP_USERNAME_MAX_LENGTH + 1)?,
            password: reader.read_cstring(HTTP_PASSWORD_MAX_LENGTH + 1)?,
        })
    }

    fn write_to(&self, writer: &mut FieldWriter) -> Result<(), ProtocolError> {
        writer.write_cstring(&self.username, HTTP_USERNAME_MAX_LENGTH);
        writer.write_cstring(&self.password, HTTP_PASSWORD_MAX_LENGTH);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let creds = HttpCredentials {
            username: "admin".into(),
            password: "pw".into(),
        };
        let bytes = creds.encode().unwrap();
        assert_eq!(bytes.len(), 66);
        assert_eq!(&bytes[..5], b"admin");
        assert_eq!(&bytes[33..35], b"pw");
        assert_eq!(bytes[32], 0);
        assert_eq!(bytes[65], 0);
        assert_eq!(HttpCredentials::decode(&bytes).unwrap(), creds);
    }
}
