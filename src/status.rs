// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Submission Status.
//!
//! # Invariants
//! - Progress stage never decreases for one submission
//! - Nothing follows a terminal status (Finalized / Failed)

use crate::types::H256;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Broadcasting,
    InBlock { block_number: u64, block_hash: H256 },
    Finalized { block_number: u64, block_hash: H256 },
    Failed { reason: String },
}

impl SubmissionStatus {
    /// Progress stage: Idle 0, Broadcasting 1, InBlock 2, terminal 3.
    pub fn stage(&self) -> u8 {
        match self {
            SubmissionStatus::Idle => 0,
            SubmissionStatus::Broadcasting => 1,
            SubmissionStatus::InBlock { .. } => 2,
            SubmissionStatus::Finalized { .. } | SubmissionStatus::Failed { .. } => 3,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.stage() == 3
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, SubmissionStatus::Finalized { .. })
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionStatus::Idle => Ok(()),
            SubmissionStatus::Broadcasting => f.write_str("Sending..."),
            SubmissionStatus::InBlock { block_number, .. } => {
                write!(f, "Current transaction status: InBlock #{block_number}")
            }
            SubmissionStatus::Finalized { block_hash, .. } => {
                write!(f, "Finalized. Block hash: {block_hash}")
            }
            SubmissionStatus::Failed { reason } => write!(f, "Transaction Failed: {reason}"),
        }
    }
}

/// Applies status updates for one submission, refusing regressions.
#[derive(Debug, Clone, Default)]
pub struct StatusTracker {
    current: SubmissionStatus,
    history: Vec<SubmissionStatus>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &SubmissionStatus {
        &self.current
    }

    /// Accepted statuses in order, excluding the initial `Idle`.
    pub fn history(&self) -> &[SubmissionStatus] {
        &self.history
    }

    /// Returns `true` when `next` was accepted as the new current status.
    pub fn advance(&mut self, next: SubmissionStatus) -> bool {
        if self.current.is_terminal() || next.stage() < self.current.stage() || next == self.current {
            return false;
        }
        self.history.push(next.clone());
        self.current = next;
        true
    }
}
