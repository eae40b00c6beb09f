use serde::{Deserialize, Serialize};

use crate::identity::{CreatorId, CREATOR_ID_LEN};
use crate::time::LogicalTime;

/// Committed claim of authorship over a fingerprint.
///
/// A plain value: every accessor of the registry hands out a copy, never a
/// handle into storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttestationRecord {
    /// Identity of the caller whose write was accepted.
    pub creator: CreatorId,
    /// Host commit time of the accepted write.
    pub attested_at: LogicalTime,
}

impl AttestationRecord {
    /// Encoded size: 32 bytes creator + 8 bytes big-endian timestamp.
    pub const ENCODED_LEN: usize = CREATOR_ID_LEN + 8;

    /// Creates a record.
    pub const fn new(creator: CreatorId, attested_at: LogicalTime) -> Self {
        Self {
            creator,
            attested_at,
        }
    }

    /// Serializes the record to its fixed binary layout.
    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut bytes = [0u8; Self::ENCODED_LEN];
        bytes[..CREATOR_ID_LEN].copy_from_slice(self.creator.as_bytes());
        bytes[CREATOR_ID_LEN..].copy_from_slice(&self.attested_at.as_secs().to_be_bytes());
        bytes
    }

    /// Deserializes a record from its fixed binary layout.
    ///
    /// Returns `None` when `bytes` is not exactly [`Self::ENCODED_LEN`] long.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::ENCODED_LEN {
            return None;
        }
        let mut creator = [0u8; CREATOR_ID_LEN];
        creator.copy_from_slice(&bytes[..CREATOR_ID_LEN]);
        let mut secs = [0u8; 8];
        secs.copy_from_slice(&bytes[CREATOR_ID_LEN..]);
        Some(Self {
            creator: CreatorId::new(creator),
            attested_at: LogicalTime::from_secs(u64::from_be_bytes(secs)),
        })
    }
}
