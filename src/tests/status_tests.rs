// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::status::{StatusTracker, SubmissionStatus};
use crate::types::H256;

fn in_block(n: u64) -> SubmissionStatus {
    SubmissionStatus::InBlock { block_number: n, block_hash: H256([n as u8; 32]) }
}

fn finalized(n: u64) -> SubmissionStatus {
    SubmissionStatus::Finalized { block_number: n, block_hash: H256([n as u8; 32]) }
}

#[test]
fn test_happy_path_order() {
    let mut tracker = StatusTracker::new();
    assert_eq!(tracker.current(), &SubmissionStatus::Idle);
    assert!(tracker.advance(SubmissionStatus::Broadcasting));
    assert!(tracker.advance(in_block(1)));
    assert!(tracker.advance(finalized(1)));
    assert_eq!(
        tracker.history(),
        &[SubmissionStatus::Broadcasting, in_block(1), finalized(1)]
    );
}

#[test]
fn test_regression_is_refused() {
    let mut tracker = StatusTracker::new();
    tracker.advance(SubmissionStatus::Broadcasting);
    tracker.advance(in_block(4));
    assert!(!tracker.advance(SubmissionStatus::Broadcasting));
    assert_eq!(tracker.current(), &in_block(4));
}

#[test]
fn test_duplicate_is_ignored_but_new_block_accepted() {
    let mut tracker = StatusTracker::new();
    tracker.advance(SubmissionStatus::Broadcasting);
    assert!(!tracker.advance(SubmissionStatus::Broadcasting));
    assert!(tracker.advance(in_block(2)));
    assert!(tracker.advance(in_block(3)));
    assert_eq!(tracker.history().len(), 3);
}

#[test]
fn test_terminal_is_final() {
    let mut tracker = StatusTracker::new();
    tracker.advance(SubmissionStatus::Broadcasting);
    assert!(tracker.advance(SubmissionStatus::Failed { reason: "ProofAlreadyExist".into() }));
    assert!(!tracker.advance(finalized(9)));
    assert!(tracker.current().is_terminal());
    assert!(!tracker.current().is_finalized());
}

#[test]
fn test_status_lines() {
    assert_eq!(SubmissionStatus::Broadcasting.to_string(), "Sending...");
    assert!(finalized(1).to_string().starts_with("Finalized. Block hash: 0x0101"));
    assert_eq!(
        SubmissionStatus::Failed { reason: "NotClaimOwner".into() }.to_string(),
        "Transaction Failed: NotClaimOwner"
    );
}
