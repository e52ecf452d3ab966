/// Latest-request-wins bookkeeping for dirty checks.
///
/// Every edit issues a new check with a larger id. A reply is applied only if
/// it answers the most recently issued id; anything older is stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyTracker {
    issued: u64,
    answered: u64,
}

impl DirtyTracker {
    /// Allocate the id for a new check, superseding all earlier ones.
    pub const fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Whether the reply for `id` should be applied. Accepts each id once.
    pub const fn accept(&mut self, id: u64) -> bool {
        if id != self.issued || id == self.answered {
            return false;
        }
        self.answered = id;
        true
    }

    /// Id of the most recently issued check.
    pub const fn latest(&self) -> u64 {
        self.issued
    }

    /// Whether the latest check is still unanswered.
    pub const fn is_pending(&self) -> bool {
        self.issued != self.answered
    }
}
