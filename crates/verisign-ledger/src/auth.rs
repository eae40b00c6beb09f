use ed25519_dalek::{
    Signature, Signer, SigningKey, VerifyingKey, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH,
};
use thiserror::Error;
use verisign_registry::{CreatorId, Fingerprint};

/// Domain separator for attest requests: `b"verisign:attest:v1\0"`.
const ATTEST_DOMAIN_SEPARATOR: &[u8] = b"verisign:attest:v1\0";

/// Authentication failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The public key bytes are not a valid ed25519 point.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
    /// The signature does not verify against the key and fingerprint.
    #[error("signature verification failed for {fingerprint}")]
    BadSignature {
        /// Fingerprint named in the rejected request.
        fingerprint: Fingerprint,
    },
}

/// Bytes a caller signs to claim `fingerprint`.
///
/// Formula: `domain_separator || fingerprint`.
pub fn attest_message(fingerprint: &Fingerprint) -> Vec<u8> {
    let mut message = Vec::with_capacity(ATTEST_DOMAIN_SEPARATOR.len() + 32);
    message.extend_from_slice(ATTEST_DOMAIN_SEPARATOR);
    message.extend_from_slice(fingerprint.as_bytes());
    message
}

/// A signed request to attest one fingerprint.
///
/// The public key is only a claim until [`authenticate`] checks the
/// signature; the ledger never uses it as an identity before that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAttestRequest {
    /// Fingerprint being claimed.
    pub fingerprint: Fingerprint,
    /// Claimed ed25519 public key of the caller.
    pub public_key: [u8; PUBLIC_KEY_LENGTH],
    /// Signature over [`attest_message`].
    pub signature: [u8; SIGNATURE_LENGTH],
}

impl SignedAttestRequest {
    /// Signs a request for `fingerprint` with `key`.
    pub fn sign(key: &SigningKey, fingerprint: Fingerprint) -> Self {
        let signature = key.sign(&attest_message(&fingerprint));
        Self {
            fingerprint,
            public_key: key.verifying_key().to_bytes(),
            signature: signature.to_bytes(),
        }
    }
}

/// Verifies `request` and returns the caller identity it proves.
///
/// Uses strict verification, which rejects small-order keys and
/// non-canonical signatures.
pub fn authenticate(request: &SignedAttestRequest) -> Result<CreatorId, AuthError> {
    let key = VerifyingKey::from_bytes(&request.public_key)
        .map_err(|e| AuthError::InvalidPublicKey(e.to_string()))?;
    let signature = Signature::from_bytes(&request.signature);

    key.verify_strict(&attest_message(&request.fingerprint), &signature)
        .map_err(|_| AuthError::BadSignature {
            fingerprint: request.fingerprint,
        })?;

    Ok(CreatorId::new(key.to_bytes()))
}
