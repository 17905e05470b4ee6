//! In-memory login lockout tracking.
//!
//! [`LockoutTracker`] counts consecutive failed logins per identity, locks an
//! identity for a fixed window once it reaches the failure threshold, and
//! forgets the identities that started failing earliest once more than the
//! configured number are being tracked.

pub mod clock;
pub mod policy;
pub mod queue;
pub mod tracker;
#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use policy::{LockoutPolicy, DEFAULT_RESERVED_IDENTITIES};
pub use queue::{EvictionQueue, QueueHandle};
pub use tracker::{FailureRecord, LockoutTracker};
