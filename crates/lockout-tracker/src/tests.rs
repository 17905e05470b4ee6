#[cfg(test)]
mod tracker_tests {
    use crate::{LockoutPolicy, LockoutTracker, ManualClock};
    use chrono::TimeDelta;
    use std::sync::Arc;
    use std::time::Duration;

    fn setup(threshold: u32, capacity: usize) -> (LockoutTracker, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        let policy = LockoutPolicy::new(threshold, Duration::from_secs(15 * 60), capacity);
        let tracker = LockoutTracker::with_clock(policy, clock.clone());
        (tracker, clock)
    }

    /// Index and queue must always describe the same set of identities.
    fn assert_in_lockstep(tracker: &LockoutTracker) {
        let queued = tracker.tracked_identities();
        assert_eq!(queued.len(), tracker.tracked_len());
        for identity in &queued {
            assert!(tracker.is_tracked(identity), "{identity} queued but not indexed");
        }
    }

    #[test]
    fn test_unknown_identity_can_attempt() {
        let (tracker, _) = setup(3, 50);
        assert!(tracker.can_attempt("alice"));
        assert!(tracker.can_attempt("bob"));
        assert_eq!(tracker.failure_count("alice"), 0);
        assert!(!tracker.is_tracked("alice"));
    }

    #[test]
    fn test_reserved_identities_always_rejected() {
        let (tracker, clock) = setup(3, 50);
        assert!(!tracker.can_attempt("admin"));
        assert!(!tracker.can_attempt("root"));

        tracker.record_failure("root");
        tracker.reset_failures("root");
        clock.advance(TimeDelta::days(1));
        assert!(!tracker.can_attempt("root"));
        assert!(!tracker.can_attempt("admin"));
    }

    #[test]
    fn test_failures_below_threshold_do_not_lock() {
        let (tracker, _) = setup(3, 50);
        tracker.record_failure("alice");
        tracker.record_failure("alice");

        assert_eq!(tracker.failure_count("alice"), 2);
        assert!(tracker.locked_until("alice").is_none());
        assert!(tracker.can_attempt("alice"));

        let record = tracker.record("alice").expect("tracked");
        assert_eq!(record.failure_count, 2);
        assert!(!record.is_locked_at(chrono::Utc::now()));
        assert!(tracker.record("bob").is_none());
    }

    #[test]
    fn test_lock_and_expiry_scenario() {
        let (tracker, clock) = setup(3, 50);

        for _ in 0..3 {
            tracker.record_failure("alice");
        }
        assert!(!tracker.can_attempt("alice"));

        clock.advance(TimeDelta::minutes(14));
        assert!(!tracker.can_attempt("alice"));

        clock.advance(TimeDelta::minutes(2));
        assert!(tracker.can_attempt("alice"));

        // Expiry does not clear the record; reset does.
        tracker.reset_failures("alice");
        tracker.record_failure("alice");
        tracker.record_failure("alice");
        tracker.reset_failures("alice");
        assert!(tracker.can_attempt("alice"));
        assert!(!tracker.is_tracked("alice"));
    }

    #[test]
    fn test_lock_is_exactly_the_window() {
        let (tracker, clock) = setup(3, 50);
        for _ in 0..3 {
            tracker.record_failure("alice");
        }

        clock.advance(TimeDelta::minutes(15) - TimeDelta::seconds(1));
        assert!(!tracker.can_attempt("alice"));

        clock.advance(TimeDelta::seconds(1));
        assert!(tracker.can_attempt("alice"));
    }

    #[test]
    fn test_failure_after_lock_extends_window() {
        let (tracker, clock) = setup(3, 50);
        for _ in 0..3 {
            tracker.record_failure("alice");
        }
        let first_deadline = tracker.locked_until("alice").expect("locked");

        clock.advance(TimeDelta::minutes(10));
        tracker.record_failure("alice");
        let second_deadline = tracker.locked_until("alice").expect("locked");
        assert_eq!(second_deadline - first_deadline, TimeDelta::minutes(10));
        assert_eq!(tracker.failure_count("alice"), 4);

        clock.advance(TimeDelta::minutes(10));
        assert!(!tracker.can_attempt("alice"));
        clock.advance(TimeDelta::minutes(5));
        assert!(tracker.can_attempt("alice"));
    }

    #[test]
    fn test_failure_after_expiry_relocks_immediately() {
        let (tracker, clock) = setup(3, 50);
        for _ in 0..3 {
            tracker.record_failure("alice");
        }
        clock.advance(TimeDelta::minutes(16));
        assert!(tracker.can_attempt("alice"));

        // Count was never reset, so the next failure is still over threshold.
        tracker.record_failure("alice");
        assert!(!tracker.can_attempt("alice"));
    }

    #[test]
    fn test_reset_unlocks() {
        let (tracker, _) = setup(3, 50);
        for _ in 0..5 {
            tracker.record_failure("alice");
        }
        assert!(!tracker.can_attempt("alice"));

        tracker.reset_failures("alice");
        assert!(tracker.can_attempt("alice"));
        assert_eq!(tracker.failure_count("alice"), 0);
        assert_eq!(tracker.tracked_len(), 0);
        assert!(tracker.tracked_identities().is_empty());
    }

    #[test]
    fn test_reset_twice_is_noop() {
        let (tracker, _) = setup(3, 50);
        tracker.record_failure("alice");
        tracker.record_failure("bob");

        tracker.reset_failures("alice");
        tracker.reset_failures("alice");
        tracker.reset_failures("never-seen");

        assert_eq!(tracker.tracked_identities(), vec!["bob".to_string()]);
        assert_in_lockstep(&tracker);
    }

    #[test]
    fn test_capacity_evicts_first_failing_identity() {
        let (tracker, _) = setup(3, 50);
        for i in 1..=51 {
            tracker.record_failure(&format!("user-{i}"));
        }

        assert_eq!(tracker.tracked_len(), 50);
        assert!(!tracker.is_tracked("user-1"));
        for i in 2..=51 {
            assert!(tracker.is_tracked(&format!("user-{i}")));
        }
        assert_in_lockstep(&tracker);
    }

    #[test]
    fn test_eviction_order_follows_first_failure_not_latest() {
        let (tracker, _) = setup(10, 3);
        tracker.record_failure("a");
        tracker.record_failure("b");
        tracker.record_failure("c");
        // Repeat failures do not move an identity to the back.
        tracker.record_failure("a");

        tracker.record_failure("d");
        assert!(!tracker.is_tracked("a"));
        assert_eq!(
            tracker.tracked_identities(),
            vec!["b".to_string(), "c".to_string(), "d".to_string()]
        );
    }

    #[test]
    fn test_reset_frees_capacity() {
        let (tracker, _) = setup(10, 2);
        tracker.record_failure("a");
        tracker.record_failure("b");
        tracker.reset_failures("a");
        tracker.record_failure("c");

        assert!(tracker.is_tracked("b"));
        assert!(tracker.is_tracked("c"));
        assert_eq!(tracker.tracked_len(), 2);
    }

    #[test]
    fn test_locked_identity_can_be_evicted() {
        let (tracker, _) = setup(1, 2);
        tracker.record_failure("mallory");
        assert!(!tracker.can_attempt("mallory"));

        tracker.record_failure("x");
        tracker.record_failure("y");

        assert!(!tracker.is_tracked("mallory"));
        assert!(tracker.can_attempt("mallory"));
    }

    #[test]
    fn test_reentry_after_eviction_goes_to_back() {
        let (tracker, _) = setup(10, 2);
        tracker.record_failure("a");
        tracker.record_failure("b");
        tracker.record_failure("c");
        assert!(!tracker.is_tracked("a"));

        tracker.record_failure("a");
        assert_eq!(tracker.failure_count("a"), 1);
        assert_eq!(
            tracker.tracked_identities(),
            vec!["c".to_string(), "a".to_string()]
        );
    }

    #[test]
    fn test_concurrent_failures_and_resets_stay_consistent() {
        let (tracker, _) = setup(3, 16);

        std::thread::scope(|s| {
            for t in 0..8 {
                let tracker = &tracker;
                s.spawn(move || {
                    for i in 0..500 {
                        let identity = format!("user-{}", (i * 7 + t) % 40);
                        match i % 5 {
                            0 => tracker.reset_failures(&identity),
                            1 => {
                                tracker.can_attempt(&identity);
                            }
                            _ => tracker.record_failure(&identity),
                        }
                    }
                });
            }
        });

        assert!(tracker.tracked_len() <= 16);
        assert_in_lockstep(&tracker);
    }

    #[test]
    fn test_concurrent_failures_on_one_identity_are_all_counted() {
        let (tracker, _) = setup(1000, 50);

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..100 {
                        tracker.record_failure("alice");
                    }
                });
            }
        });

        assert_eq!(tracker.failure_count("alice"), 400);
        assert_eq!(tracker.tracked_identities(), vec!["alice".to_string()]);
    }
}
