//! Biometric digest: the exact-match key derived from captured input.
//!
//! The digest is a SHA-256 hash rendered as 64 lowercase hex characters.
//! Equality of digests is the only identity signal in the system, so the
//! hash must be collision resistant.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Length of a rendered digest in hex characters.
pub const DIGEST_HEX_LEN: usize = 64;

/// Errors when parsing a digest from its textual form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DigestError {
    #[error("Digest must be {DIGEST_HEX_LEN} hex characters, got {0}")]
    InvalidLength(usize),

    #[error("Digest contains a non-hex character at position {0}")]
    InvalidCharacter(usize),
}

/// Fixed-length hexadecimal digest of captured input bytes.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BiometricDigest(String);

impl BiometricDigest {
    /// Parse a digest from hex, normalising to lowercase.
    ///
    /// # Errors
    /// Returns error if the input is not exactly 64 hex characters.
    pub fn from_hex(hex: &str) -> Result<Self, DigestError> {
        let trimmed = hex.trim();
        if trimmed.len() != DIGEST_HEX_LEN {
            return Err(DigestError::InvalidLength(trimmed.len()));
        }
        if let Some(pos) = trimmed.chars().position(|c| !c.is_ascii_hexdigit()) {
            return Err(DigestError::InvalidCharacter(pos));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// The full hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 hex characters, for display.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.0[..8]
    }
}

impl TryFrom<String> for BiometricDigest {
    type Error = DigestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<BiometricDigest> for String {
    fn from(value: BiometricDigest) -> Self {
        value.0
    }
}

// Only the prefix reaches debug output; the full digest is the lookup key.
impl std::fmt::Debug for BiometricDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BiometricDigest({}…)", self.prefix())
    }
}

impl std::fmt::Display for BiometricDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash arbitrary input bytes into a biometric digest.
///
/// Pure and deterministic. Empty input is valid.
#[must_use]
pub fn digest(bytes: &[u8]) -> BiometricDigest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();

    BiometricDigest(result.iter().map(|b| format!("{b:02x}")).collect())
}
