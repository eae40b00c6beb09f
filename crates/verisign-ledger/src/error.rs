use thiserror::Error;
use verisign_registry::RegistryError;

use crate::auth::AuthError;

/// Errors returned by [`Ledger`](crate::Ledger).
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The request could not be authenticated; nothing was executed.
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),
    /// The registry rejected the invocation.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// One request of a batch was rejected, so none of it was committed.
    #[error("batch rejected at request {index}: {source}")]
    BatchRejected {
        /// Zero-based position of the first failing request.
        index: usize,
        /// Why that request failed.
        #[source]
        source: Box<LedgerError>,
    },
    /// A batch must contain at least one request.
    #[error("empty batch")]
    EmptyBatch,
}

impl LedgerError {
    /// Returns true if the rejection is first-writer-wins, directly or inside
    /// a rejected batch.
    pub fn is_duplicate(&self) -> bool {
        match self {
            LedgerError::Registry(err) => err.is_duplicate(),
            LedgerError::BatchRejected { source, .. } => source.is_duplicate(),
            _ => false,
        }
    }
}
