// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::Arc;

use crate::error::{SubmissionError, ValidationError};
use crate::leaderboard::{LeaderboardMaintainer, UpdateProtocol};
use crate::storage::{LeaderboardStore, MemoryLeaderboard, MemoryLedger};
use crate::submission::SubmissionOrchestrator;
use crate::tests::fakes::{submission, BrokenLedger, FlakyLeaderboard};
use crate::types::UpdateOutcome;

fn orchestrator(
    ledger: Arc<MemoryLedger>,
    board: Arc<dyn LeaderboardStore>,
) -> SubmissionOrchestrator {
    SubmissionOrchestrator::new(ledger, LeaderboardMaintainer::new(board, UpdateProtocol::default()))
}

#[test]
fn test_submit_records_event_and_best() {
    let ledger = Arc::new(MemoryLedger::new());
    let board = Arc::new(MemoryLeaderboard::new());
    let orch = orchestrator(ledger.clone(), board.clone());

    let receipt = orch
        .submit_at(&submission("Al", 100, 1, 30, Some("c1")), 1_700_000_000)
        .unwrap();
    assert_eq!(receipt.event.player_name, "Al");
    assert_eq!(receipt.event.timestamp, 1_700_000_000);
    assert!(matches!(receipt.leaderboard, UpdateOutcome::Updated { previous: None }));

    assert_eq!(ledger.events(), vec![receipt.event.clone()]);
    assert_eq!(board.get("Al").unwrap().unwrap().score, 100);
}

#[test]
fn test_lower_second_score_is_skipped() {
    let ledger = Arc::new(MemoryLedger::new());
    let board = Arc::new(MemoryLeaderboard::new());
    let orch = orchestrator(ledger.clone(), board.clone());

    orch.submit(&submission("Al", 100, 1, 30, Some("c1"))).unwrap();
    let second = orch.submit(&submission("Al", 90, 1, 20, Some("c1"))).unwrap();

    assert!(matches!(second.leaderboard, UpdateOutcome::Skipped { best: 100 }));
    assert_eq!(board.get("Al").unwrap().unwrap().score, 100);
    // both results are in the ledger regardless
    assert_eq!(ledger.len(), 2);
}

#[test]
fn test_sequential_scores_keep_the_maximum() {
    let board = Arc::new(MemoryLeaderboard::new());
    let orch = orchestrator(Arc::new(MemoryLedger::new()), board.clone());

    orch.submit(&submission("Mio", 50, 1, 10, None)).unwrap();
    orch.submit(&submission("Mio", 80, 2, 10, None)).unwrap();
    assert_eq!(board.get("Mio").unwrap().unwrap().score, 80);
}

#[test]
fn test_invalid_submission_never_reaches_ledger() {
    let ledger = Arc::new(MemoryLedger::new());
    let board = Arc::new(MemoryLeaderboard::new());
    let orch = orchestrator(ledger.clone(), board.clone());

    let err = orch.submit(&submission("Al", 100, 6, 30, None)).unwrap_err();
    assert!(matches!(err, SubmissionError::Invalid(ValidationError::RoundOutOfRange(6))));
    assert!(ledger.is_empty());
    assert!(board.is_empty());
}

#[test]
fn test_ledger_failure_is_fatal_and_skips_leaderboard() {
    let board = Arc::new(MemoryLeaderboard::new());
    let orch = SubmissionOrchestrator::new(
        Arc::new(BrokenLedger),
        LeaderboardMaintainer::new(board.clone(), UpdateProtocol::Conditional),
    );

    let err = orch.submit(&submission("Al", 100, 1, 30, None)).unwrap_err();
    assert!(matches!(err, SubmissionError::Ledger(_)));
    assert!(board.is_empty());
}

#[test]
fn test_leaderboard_failure_is_not_fatal() {
    let ledger = Arc::new(MemoryLedger::new());
    let board = Arc::new(FlakyLeaderboard::failing_writes());
    let orch = orchestrator(ledger.clone(), board);

    let receipt = orch.submit(&submission("Al", 100, 1, 30, Some("c1"))).unwrap();
    assert!(receipt.leaderboard.is_failed());
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.events()[0].score, 100);
}
