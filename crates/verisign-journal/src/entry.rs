use serde::{Deserialize, Serialize};
use verisign_registry::{AttestationRecord, Fingerprint, FINGERPRINT_LEN};

/// One accepted attestation as persisted in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Attested fingerprint.
    pub fingerprint: Fingerprint,
    /// Record committed for it.
    pub record: AttestationRecord,
}

impl JournalEntry {
    /// Payload size of an attestation frame: fingerprint + record layout.
    pub const PAYLOAD_LEN: usize = FINGERPRINT_LEN + AttestationRecord::ENCODED_LEN;

    /// Creates an entry.
    pub const fn new(fingerprint: Fingerprint, record: AttestationRecord) -> Self {
        Self {
            fingerprint,
            record,
        }
    }

    /// Encodes the frame payload.
    pub fn to_payload(&self) -> [u8; Self::PAYLOAD_LEN] {
        let mut bytes = [0u8; Self::PAYLOAD_LEN];
        bytes[..FINGERPRINT_LEN].copy_from_slice(self.fingerprint.as_bytes());
        bytes[FINGERPRINT_LEN..].copy_from_slice(&self.record.to_bytes());
        bytes
    }

    /// Decodes a frame payload; `None` if it has the wrong length.
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        if payload.len() != Self::PAYLOAD_LEN {
            return None;
        }
        let fingerprint = Fingerprint::from_bytes(&payload[..FINGERPRINT_LEN]).ok()?;
        let record = AttestationRecord::from_bytes(&payload[FINGERPRINT_LEN..])?;
        Some(Self {
            fingerprint,
            record,
        })
    }
}
