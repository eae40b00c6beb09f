use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Creator identity length in bytes (an ed25519 public key).
pub const CREATOR_ID_LEN: usize = 32;

/// Errors raised when parsing a creator identity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// Input was not unpadded base64url.
    #[error("creator id is not valid base64url: {0}")]
    InvalidEncoding(String),
    /// Decoded input did not contain exactly 32 bytes.
    #[error("creator id must be {CREATOR_ID_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

/// Public identity of the entity that performed an accepted write.
///
/// Holds the raw public key bytes of the authenticated caller. Encoded as
/// base64url without padding when displayed or serialized.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CreatorId([u8; CREATOR_ID_LEN]);

impl CreatorId {
    /// Wraps raw public key bytes.
    pub const fn new(bytes: [u8; CREATOR_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the raw identity bytes.
    pub fn as_bytes(&self) -> &[u8; CREATOR_ID_LEN] {
        &self.0
    }

    /// Parses an unpadded base64url identity.
    pub fn parse(input: &str) -> Result<Self, IdentityError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(input.trim())
            .map_err(|e| IdentityError::InvalidEncoding(e.to_string()))?;
        let array: [u8; CREATOR_ID_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| IdentityError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }

    /// Abbreviated form for human-facing output, e.g. `q3Fz1A...x0Yw`.
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}...{}", &full[..6], &full[full.len() - 4..])
    }
}

impl fmt::Display for CreatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&URL_SAFE_NO_PAD.encode(self.0))
    }
}

impl fmt::Debug for CreatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CreatorId({})", self)
    }
}

impl FromStr for CreatorId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CreatorId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CreatorId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
