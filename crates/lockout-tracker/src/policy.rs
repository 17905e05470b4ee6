use std::time::Duration;

/// Identities that can never log in, whatever their failure history.
pub const DEFAULT_RESERVED_IDENTITIES: [&str; 2] = ["admin", "root"];

/// Lockout policy. Fixed for the lifetime of a tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockoutPolicy {
    /// Consecutive failures before the identity is locked.
    pub max_failure_count: u32,
    /// How long a lock lasts, measured from the most recent qualifying failure.
    pub lock_duration: Duration,
    /// Upper bound on identities with a live failure record.
    pub max_tracked_identities: usize,
    pub reserved_identities: Vec<String>,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(15 * 60), 50)
    }
}

impl LockoutPolicy {
    pub fn new(max_failure_count: u32, lock_duration: Duration, max_tracked_identities: usize) -> Self {
        Self {
            max_failure_count,
            lock_duration,
            max_tracked_identities,
            reserved_identities: DEFAULT_RESERVED_IDENTITIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Replace the reserved identity list.
    pub fn with_reserved_identities<I, S>(mut self, identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_identities = identities.into_iter().map(Into::into).collect();
        self
    }

    /// Exact, case-sensitive match against the reserved list.
    pub fn is_reserved(&self, identity: &str) -> bool {
        self.reserved_identities.iter().any(|r| r == identity)
    }
}
