//! Shared secret handling.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigErrorKind, TokenError, TokenResult};

/// Opaque shared secret.
///
/// String secrets are stored as their UTF-8 bytes, so `Secret::from("abc")`
/// and `Secret::from(b"abc")` are the same key. The `Debug` output is
/// redacted and the type cannot be serialized.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct Secret(Vec<u8>);

impl Secret {
    /// Wrap raw key material.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Load a secret from a file.
    ///
    /// The file contents are used verbatim, including any trailing newline.
    /// On unix, files readable or writable by group or others are refused.
    pub fn load(path: &Path) -> TokenResult<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            secret_error(format!(
                "Failed to read secret metadata from {}: {}",
                path.display(),
                e
            ))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = metadata.permissions().mode();
            if mode & 0o077 != 0 {
                return Err(secret_error(format!(
                    "Secret file {} has insecure permissions {:04o}, expected 0600 or 0400",
                    path.display(),
                    mode & 0o777
                )));
            }
        }
        #[cfg(not(unix))]
        let _ = metadata;

        let bytes = std::fs::read(path).map_err(|e| {
            secret_error(format!(
                "Failed to read secret from {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn secret_error(message: String) -> TokenError {
    TokenError::config(ConfigErrorKind::SecretError { message })
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

impl From<Vec<u8>> for Secret {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Secret {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Secret {
    fn from(bytes: &[u8; N]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<String> for Secret {
    fn from(secret: String) -> Self {
        Self(secret.into_bytes())
    }
}

impl From<&str> for Secret {
    fn from(secret: &str) -> Self {
        Self(secret.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_string_and_bytes_are_equivalent() {
        assert_eq!(Secret::from("abc"), Secret::from(b"abc"));
        assert_eq!(Secret::from(String::from("abc")), Secret::new(vec![b'a', b'b', b'c']));
    }

    #[test]
    fn test_debug_is_redacted() {
        let secret = Secret::from("hunter2");
        let debug = format!("{:?}", secret);
        assert_eq!(debug, "Secret([REDACTED])");
        assert!(!debug.contains("hunter2"));
    }

    #[cfg(unix)]
    #[test]
    fn test_load_secret_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret");
        std::fs::write(&path, "test_secret").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600)).unwrap();

        let secret = Secret::load(&path).unwrap();
        assert_eq!(secret.as_bytes(), b"test_secret");
        assert_eq!(secret.len(), 11);
    }

    #[cfg(unix)]
    #[test]
    fn test_load_rejects_insecure_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret");
        std::fs::write(&path, "test_secret").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let result = Secret::load(&path);
        assert!(matches!(
            result,
            Err(TokenError::Config {
                kind: ConfigErrorKind::SecretError { .. }
            })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = Secret::load(&dir.path().join("missing"));
        assert!(matches!(
            result,
            Err(TokenError::Config {
                kind: ConfigErrorKind::SecretError { .. }
            })
        ));
    }
}
