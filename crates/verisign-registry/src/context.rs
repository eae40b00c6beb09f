use crate::identity::CreatorId;
use crate::time::LogicalTime;

/// Per-invocation capability supplied by the executing host.
///
/// Carries the authenticated caller and the commit time. The registry takes
/// both record fields from here and nothing from the request itself, so a
/// context must only be built by the component that authenticated the caller
/// and owns the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvocationContext {
    caller: CreatorId,
    now: LogicalTime,
}

impl InvocationContext {
    /// Builds a context for one invocation.
    pub const fn new(caller: CreatorId, now: LogicalTime) -> Self {
        Self { caller, now }
    }

    /// Authenticated caller identity.
    pub const fn caller(&self) -> CreatorId {
        self.caller
    }

    /// Commit time of this invocation.
    pub const fn now(&self) -> LogicalTime {
        self.now
    }
}
