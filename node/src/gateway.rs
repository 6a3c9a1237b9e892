// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Submission Gateway
//!
//! Hands a [`ClaimRequest`] to the chain client's sign-and-broadcast
//! primitive and tracks its outcome.
//!
//! # Guarantees
//! - Each submission owns its tracker, watch channel and driver task
//! - Status stage never decreases (see [`StatusTracker`])
//! - Every submission ends Finalized or Failed; transport errors and chain
//!   rejections become `Failed { reason }`
//! - Broadcasts from one signer are serialized from nonce read to pool
//!   acceptance, so concurrent submissions never reuse a nonce. Block
//!   inclusion and finalization still overlap.

use crate::api::TxStatus;
use crate::chain::{ChainClient, TxStatusStream};
use crate::errors::SubmissionError;
use futures::StreamExt;
use poe_kernel::{AccountId, ClaimRequest, Keypair, StatusTracker, SubmissionStatus, H256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

pub type SubmissionId = u64;

const STREAM_ENDED: &str = "status stream ended before finalization";

/// Translates one wire status into the submission's view of it.
pub fn map_tx_status(status: TxStatus) -> SubmissionStatus {
    match status {
        TxStatus::Ready => SubmissionStatus::Broadcasting,
        TxStatus::InBlock { block, dispatch_error: None } => SubmissionStatus::InBlock {
            block_number: block.number,
            block_hash: block.hash,
        },
        TxStatus::InBlock { dispatch_error: Some(reason), .. } => SubmissionStatus::Failed { reason },
        TxStatus::Finalized { block } => SubmissionStatus::Finalized {
            block_number: block.number,
            block_hash: block.hash,
        },
        TxStatus::Invalid { reason } => SubmissionStatus::Failed { reason },
    }
}

struct Progress {
    tracker: Mutex<StatusTracker>,
    tx: watch::Sender<SubmissionStatus>,
}

impl Progress {
    fn new() -> (Arc<Self>, watch::Receiver<SubmissionStatus>) {
        let (tx, rx) = watch::channel(SubmissionStatus::Idle);
        let progress = Arc::new(Self {
            tracker: Mutex::new(StatusTracker::new()),
            tx,
        });
        (progress, rx)
    }

    fn advance(&self, id: SubmissionId, next: SubmissionStatus) {
        let Ok(mut tracker) = self.tracker.lock() else {
            tracing::error!("Submission {} tracker poisoned", id);
            return;
        };
        if tracker.current() == &next {
            return;
        }
        if tracker.advance(next.clone()) {
            tracing::debug!("Submission {}: {}", id, next);
            self.tx.send_replace(next);
        } else {
            tracing::warn!("Submission {}: ignoring out-of-order status {:?}", id, next);
        }
    }

    fn current(&self) -> SubmissionStatus {
        self.tx.borrow().clone()
    }

    fn history(&self) -> Vec<SubmissionStatus> {
        self.tracker
            .lock()
            .map(|t| t.history().to_vec())
            .unwrap_or_default()
    }
}

/// One in-flight (or finished) claim submission.
pub struct Submission {
    id: SubmissionId,
    request: ClaimRequest,
    tx_hash: Option<H256>,
    progress: Arc<Progress>,
    status_rx: watch::Receiver<SubmissionStatus>,
}

impl Submission {
    pub fn id(&self) -> SubmissionId {
        self.id
    }

    pub fn request(&self) -> &ClaimRequest {
        &self.request
    }

    /// `None` when signing or broadcast failed before the chain saw it.
    pub fn tx_hash(&self) -> Option<H256> {
        self.tx_hash
    }

    pub fn status(&self) -> SubmissionStatus {
        self.progress.current()
    }

    /// Accepted statuses in order.
    pub fn history(&self) -> Vec<SubmissionStatus> {
        self.progress.history()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionStatus> {
        self.status_rx.clone()
    }

    /// Waits for a terminal status.
    pub async fn outcome(&self) -> SubmissionStatus {
        let mut rx = self.status_rx.clone();
        let status = match rx.wait_for(SubmissionStatus::is_terminal).await {
            Ok(status) => status.clone(),
            Err(_) => self.progress.current(),
        };
        status
    }

    /// Resolves once finalized; every other terminal outcome is an error.
    pub async fn finalized(&self) -> Result<(u64, H256), SubmissionError> {
        match self.outcome().await {
            SubmissionStatus::Finalized { block_number, block_hash } => Ok((block_number, block_hash)),
            SubmissionStatus::Failed { reason } => Err(SubmissionError::Failed(reason)),
            _ => Err(SubmissionError::Abandoned),
        }
    }
}

pub struct SubmissionGateway {
    client: Arc<dyn ChainClient>,
    next_id: AtomicU64,
    signers: Mutex<HashMap<AccountId, Arc<tokio::sync::Mutex<()>>>>,
}

impl SubmissionGateway {
    pub fn new(client: Arc<dyn ChainClient>) -> Self {
        Self {
            client,
            next_id: AtomicU64::new(1),
            signers: Mutex::new(HashMap::new()),
        }
    }

    fn signer_lock(&self, account: AccountId) -> Arc<tokio::sync::Mutex<()>> {
        let mut signers = self.signers.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        signers.entry(account).or_default().clone()
    }

    pub fn client(&self) -> &Arc<dyn ChainClient> {
        &self.client
    }

    /// Signs and broadcasts `request`. Returns once the chain has accepted or
    /// refused it; later progress is driven in the background.
    pub async fn submit(&self, request: ClaimRequest, signer: &Keypair) -> Submission {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (progress, status_rx) = Progress::new();
        progress.advance(id, SubmissionStatus::Broadcasting);

        tracing::info!("Submission {}: {} {} as {}", id, request.op(), request.fingerprint(), signer.account_id());

        let lock = self.signer_lock(signer.account_id());
        let broadcast = {
            let _turn = lock.lock().await;
            self.client.sign_and_submit(request.to_call(), signer).await
        };

        let tx_hash = match broadcast {
            Ok((hash, stream)) => {
                tokio::spawn(drive(id, stream, progress.clone()));
                Some(hash)
            }
            Err(e) => {
                tracing::error!("Submission {}: broadcast failed: {}", id, e);
                progress.advance(id, SubmissionStatus::Failed { reason: e.to_string() });
                None
            }
        };

        Submission {
            id,
            request,
            tx_hash,
            progress,
            status_rx,
        }
    }
}

async fn drive(id: SubmissionId, mut stream: TxStatusStream, progress: Arc<Progress>) {
    while let Some(item) = stream.next().await {
        let next = match item {
            Ok(status) => map_tx_status(status),
            Err(e) => SubmissionStatus::Failed { reason: e.to_string() },
        };
        let terminal = next.is_terminal();
        progress.advance(id, next);
        if terminal {
            return;
        }
    }

    progress.advance(id, SubmissionStatus::Failed { reason: STREAM_ENDED.to_string() });
}
