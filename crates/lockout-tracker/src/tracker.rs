use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::clock::{Clock, SystemClock};
use crate::policy::LockoutPolicy;
use crate::queue::{EvictionQueue, QueueHandle};

/// Per-identity failure state.
#[derive(Debug, Clone)]
pub struct FailureRecord {
    pub failure_count: u32,
    pub locked_until: Option<DateTime<Utc>>,
    pub queue_position: QueueHandle,
}

impl FailureRecord {
    fn new(queue_position: QueueHandle) -> Self {
        Self {
            failure_count: 0,
            locked_until: None,
            queue_position,
        }
    }

    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }
}

/// Login failure tracker with lockout and bounded memory.
///
/// Records live in a sharded map so `can_attempt` never waits on the
/// eviction queue. Every insert into or removal from the map happens while
/// holding the queue mutex, which keeps the two structures in lockstep: an
/// identity has a record iff it has a queue node. Lock order is always
/// queue mutex, then map shard.
pub struct LockoutTracker {
    policy: LockoutPolicy,
    lock_window: TimeDelta,
    records: DashMap<String, FailureRecord>,
    order: Mutex<EvictionQueue>,
    clock: Arc<dyn Clock>,
}

impl LockoutTracker {
    pub fn new(policy: LockoutPolicy) -> Self {
        Self::with_clock(policy, Arc::new(SystemClock))
    }

    pub fn with_clock(policy: LockoutPolicy, clock: Arc<dyn Clock>) -> Self {
        let lock_window = TimeDelta::from_std(policy.lock_duration).unwrap_or(TimeDelta::MAX);
        Self {
            policy,
            lock_window,
            records: DashMap::new(),
            order: Mutex::new(EvictionQueue::new()),
            clock,
        }
    }

    pub fn policy(&self) -> &LockoutPolicy {
        &self.policy
    }

    /// Whether `identity` may try to log in right now.
    pub fn can_attempt(&self, identity: &str) -> bool {
        if self.policy.is_reserved(identity) {
            return false;
        }
        let now = self.clock.now();
        match self.records.get(identity) {
            Some(record) => !record.is_locked_at(now),
            None => true,
        }
    }

    /// Count a failed login for `identity`, locking it once the threshold is
    /// reached and evicting the oldest records if over capacity.
    pub fn record_failure(&self, identity: &str) {
        let mut order = self.lock_order();
        let now = self.clock.now();

        let (count, locked_until) = {
            let mut record = self
                .records
                .entry(identity.to_string())
                .or_insert_with(|| FailureRecord::new(order.push_back(identity.to_string())));

            record.failure_count = record.failure_count.saturating_add(1);
            if record.failure_count >= self.policy.max_failure_count {
                let until = now
                    .checked_add_signed(self.lock_window)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC);
                // never pull an existing deadline backwards
                record.locked_until = Some(record.locked_until.map_or(until, |prev| prev.max(until)));
            }
            (record.failure_count, record.locked_until)
        };

        tracing::info!("Login failure for {} (count {})", identity, count);
        if count == self.policy.max_failure_count {
            if let Some(until) = locked_until {
                tracing::warn!(
                    "Lockout triggered for {} after {} failures, locked until {}",
                    identity,
                    count,
                    until
                );
            }
        }

        while order.len() > self.policy.max_tracked_identities {
            let Some(oldest) = order.pop_front() else {
                break;
            };
            if let Some((_, evicted)) = self.records.remove(&oldest) {
                if evicted.is_locked_at(now) {
                    tracing::warn!(
                        "Evicted {} while still locked ({} failures); lock is forgotten",
                        oldest,
                        evicted.failure_count
                    );
                } else {
                    tracing::debug!("Evicted {} to stay within capacity", oldest);
                }
            }
        }

        tracing::debug!("Tracking {} identities", order.len());
    }

    /// Forget all failures for `identity`. No-op if it has none.
    pub fn reset_failures(&self, identity: &str) {
        let mut order = self.lock_order();
        if let Some((_, record)) = self.records.remove(identity) {
            order.remove(record.queue_position);
            tracing::debug!(
                "Reset {} failures for {}",
                record.failure_count,
                identity
            );
        }
    }

    /// Snapshot of the record for `identity`.
    pub fn record(&self, identity: &str) -> Option<FailureRecord> {
        self.records.get(identity).map(|record| record.clone())
    }

    /// Current consecutive failure count, 0 when untracked.
    pub fn failure_count(&self, identity: &str) -> u32 {
        self.records
            .get(identity)
            .map(|record| record.failure_count)
            .unwrap_or(0)
    }

    pub fn locked_until(&self, identity: &str) -> Option<DateTime<Utc>> {
        self.records
            .get(identity)
            .and_then(|record| record.locked_until)
    }

    pub fn is_tracked(&self, identity: &str) -> bool {
        self.records.contains_key(identity)
    }

    pub fn tracked_len(&self) -> usize {
        self.records.len()
    }

    /// Tracked identities, oldest first failure first.
    pub fn tracked_identities(&self) -> Vec<String> {
        self.lock_order().iter().map(str::to_string).collect()
    }

    fn lock_order(&self) -> MutexGuard<'_, EvictionQueue> {
        // Nothing that runs under this lock can panic midway through an update.
        self.order.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
