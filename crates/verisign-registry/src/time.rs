use serde::{Deserialize, Serialize};
use std::fmt;

/// Commit time assigned by the executing host, in seconds since the Unix epoch.
///
/// Never chosen by the caller. Within one ledger successive commits carry
/// nondecreasing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalTime(u64);

impl LogicalTime {
    /// The Unix epoch.
    pub const EPOCH: LogicalTime = LogicalTime(0);

    /// Creates a logical time from whole seconds.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Returns the value in whole seconds.
    pub const fn as_secs(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LogicalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for LogicalTime {
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}
