// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::Arc;

use crate::leaderboard::{LeaderboardMaintainer, UpdateProtocol};
use crate::storage::{LeaderboardStore, MemoryLeaderboard};
use crate::tests::fakes::{entry, FlakyLeaderboard, InterleavingLeaderboard};
use crate::types::UpdateOutcome;

const PROTOCOLS: [UpdateProtocol; 2] = [UpdateProtocol::ReadThenWrite, UpdateProtocol::Conditional];

#[test]
fn test_first_submission_creates_entry() {
    for protocol in PROTOCOLS {
        let store = Arc::new(MemoryLeaderboard::new());
        let maintainer = LeaderboardMaintainer::new(store.clone(), protocol);

        let outcome = maintainer.consider_update("Al", 100, 2, Some("c1"));
        assert!(matches!(outcome, UpdateOutcome::Updated { previous: None }));

        let stored = store.get("Al").unwrap().unwrap();
        assert_eq!(stored.score, 100);
        assert_eq!(stored.round, 2);
        assert_eq!(stored.category.as_deref(), Some("c1"));
    }
}

#[test]
fn test_higher_score_replaces_lower() {
    for protocol in PROTOCOLS {
        let store = Arc::new(MemoryLeaderboard::new());
        let maintainer = LeaderboardMaintainer::new(store.clone(), protocol);

        maintainer.consider_update("Al", 50, 1, Some("c1"));
        let outcome = maintainer.consider_update("Al", 80, 3, Some("c2"));
        assert!(matches!(outcome, UpdateOutcome::Updated { previous: Some(50) }));

        let stored = store.get("Al").unwrap().unwrap();
        assert_eq!(stored.score, 80);
        assert_eq!(stored.round, 3);
        assert_eq!(stored.category.as_deref(), Some("c2"));
    }
}

#[test]
fn test_lower_or_equal_score_is_skipped() {
    for protocol in PROTOCOLS {
        let store = Arc::new(MemoryLeaderboard::new());
        let maintainer = LeaderboardMaintainer::new(store.clone(), protocol);

        maintainer.consider_update("Al", 100, 1, Some("c1"));
        assert!(matches!(
            maintainer.consider_update("Al", 90, 4, Some("c9")),
            UpdateOutcome::Skipped { best: 100 }
        ));
        assert!(matches!(
            maintainer.consider_update("Al", 100, 4, Some("c9")),
            UpdateOutcome::Skipped { best: 100 }
        ));

        let stored = store.get("Al").unwrap().unwrap();
        assert_eq!(stored.round, 1);
        assert_eq!(stored.category.as_deref(), Some("c1"));
    }
}

#[test]
fn test_store_failure_is_reported_not_raised() {
    for protocol in PROTOCOLS {
        let store = Arc::new(FlakyLeaderboard::failing_writes());
        let maintainer = LeaderboardMaintainer::new(store.clone(), protocol);

        let outcome = maintainer.consider_update("Al", 10, 1, None);
        assert!(outcome.is_failed());
        assert_eq!(outcome.label(), "failed");
    }

    let store = Arc::new(FlakyLeaderboard::default());
    store.fail_reads.store(true, std::sync::atomic::Ordering::SeqCst);
    let maintainer = LeaderboardMaintainer::new(store, UpdateProtocol::ReadThenWrite);
    assert!(maintainer.consider_update("Al", 10, 1, None).is_failed());
}

#[test]
fn test_read_then_write_loses_concurrent_higher_score() {
    // A concurrent request records 200 between our read and our write.
    let inner = Arc::new(MemoryLeaderboard::new());
    inner.put(&entry("Al", 100)).unwrap();
    let store = Arc::new(InterleavingLeaderboard::new(inner.clone(), |board| {
        board.put(&entry("Al", 200)).unwrap();
    }));
    let maintainer = LeaderboardMaintainer::new(store, UpdateProtocol::ReadThenWrite);

    let outcome = maintainer.consider_update("Al", 150, 1, Some("c1"));
    assert!(matches!(outcome, UpdateOutcome::Updated { previous: Some(100) }));
    // Last writer wins: the accepted race of the two-step protocol.
    assert_eq!(inner.get("Al").unwrap().unwrap().score, 150);
}

#[test]
fn test_conditional_keeps_concurrent_higher_score() {
    let inner = Arc::new(MemoryLeaderboard::new());
    inner.put(&entry("Al", 100)).unwrap();
    let store = Arc::new(InterleavingLeaderboard::new(inner.clone(), |board| {
        board.put(&entry("Al", 200)).unwrap();
    }));
    let maintainer = LeaderboardMaintainer::new(store, UpdateProtocol::Conditional);

    let outcome = maintainer.consider_update("Al", 150, 1, Some("c1"));
    assert!(matches!(outcome, UpdateOutcome::Skipped { best: 200 }));
    assert_eq!(inner.get("Al").unwrap().unwrap().score, 200);
}

#[test]
fn test_conditional_concurrent_writers_keep_maximum() {
    let store = Arc::new(MemoryLeaderboard::new());
    let maintainer = Arc::new(LeaderboardMaintainer::new(store.clone(), UpdateProtocol::Conditional));

    let handles: Vec<_> = (0..8u32)
        .map(|t| {
            let m = maintainer.clone();
            std::thread::spawn(move || {
                for i in 0..50u32 {
                    m.consider_update("Al", t * 1_000 + i, 1, None);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(store.get("Al").unwrap().unwrap().score, 7 * 1_000 + 49);
}
