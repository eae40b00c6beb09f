use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fingerprint length in bytes (a SHA-256 digest).
pub const FINGERPRINT_LEN: usize = 32;

/// Errors raised when building a fingerprint from untrusted input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FingerprintError {
    /// Input did not contain exactly 32 bytes.
    #[error("fingerprint must be {FINGERPRINT_LEN} bytes, got {0}")]
    InvalidLength(usize),
    /// Input was not valid hexadecimal.
    #[error("fingerprint is not valid hex: {0}")]
    InvalidHex(String),
}

/// Opaque 32-byte content fingerprint, used as an exact-match key.
///
/// The registry never inspects the structure of a fingerprint and never
/// computes one; callers hash their content before invoking it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Wraps an already-computed 32-byte digest.
    pub const fn new(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }

    /// Builds a fingerprint from a byte slice of exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FingerprintError> {
        let array: [u8; FINGERPRINT_LEN] = bytes
            .try_into()
            .map_err(|_| FingerprintError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }

    /// Parses 64 hex digits, with or without a leading `0x`.
    pub fn parse_hex(input: &str) -> Result<Self, FingerprintError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.len() != FINGERPRINT_LEN * 2 {
            // Odd lengths would otherwise surface as a hex error.
            return Err(FingerprintError::InvalidLength(digits.len() / 2));
        }
        let bytes = hex::decode(digits).map_err(|e| FingerprintError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Returns the raw fingerprint bytes.
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    /// Lowercase hex without prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self)
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl From<[u8; FINGERPRINT_LEN]> for Fingerprint {
    fn from(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}
