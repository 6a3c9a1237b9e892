// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Instant-Seal Development Chain
//!
//! An in-process chain carrying the proof-of-existence runtime rules. Every
//! accepted extrinsic is sealed in its own block after one block time and
//! finalized after a second one.
//!
//! # Extrinsic lifecycle
//! ```text
//! submit
//! ↓
//! 1. Validate (signature, call decode, nonce)   → Invalid on failure
//! ↓
//! 2. Pool (nonce bumped)                        → Ready
//! ↓
//! 3. Seal block N, dispatch call                → InBlock { dispatch_error }
//! ↓
//! 4. Finalize N                                 → Finalized
//! ```
//!
//! # Runtime rules
//! - create: fails with `ProofAlreadyExist` if the fingerprint is claimed
//! - revoke: `ClaimNotExist` / `NotClaimOwner`; removes the claim
//! - transfer: `ClaimNotExist` / `NotClaimOwner`; re-owns the claim, keeps the
//!   note, re-stamps block number and time
//!
//! Dispatch failures still occupy a block, the way a failed extrinsic does on
//! a real chain.

use crate::api::{BlockRef, TxStatus};
use crate::chain::{ChainClient, ClaimStream, TxStatusStream};
use crate::config::NodeConfig;
use crate::errors::ChainError;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use poe_kernel::{AccountId, Claim, ClaimRequest, Fingerprint, SignedExtrinsic, H256};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch, Mutex};
use tokio_stream::wrappers::{UnboundedReceiverStream, WatchStream};

/// Runtime rejection of a well-formed extrinsic.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    #[error("ProofAlreadyExist")]
    ProofAlreadyExist,
    #[error("ClaimNotExist")]
    ClaimNotExist,
    #[error("NotClaimOwner")]
    NotClaimOwner,
}

struct ChainState {
    best: BlockRef,
    finalized_number: u64,
    proofs: HashMap<Fingerprint, Claim>,
    account_claims: HashMap<AccountId, Vec<Fingerprint>>,
    nonces: HashMap<AccountId, u64>,
    watchers: HashMap<Fingerprint, watch::Sender<Option<Claim>>>,
}

impl ChainState {
    fn genesis() -> Self {
        Self {
            best: BlockRef {
                number: 0,
                hash: H256(*blake3::hash(b"poe-devchain genesis").as_bytes()),
            },
            finalized_number: 0,
            proofs: HashMap::new(),
            account_claims: HashMap::new(),
            nonces: HashMap::new(),
            watchers: HashMap::new(),
        }
    }

    fn next_block(&mut self, extrinsic_hash: &H256) -> BlockRef {
        let number = self.best.number + 1;
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.best.hash.as_bytes());
        hasher.update(&number.to_le_bytes());
        hasher.update(extrinsic_hash.as_bytes());
        self.best = BlockRef {
            number,
            hash: H256(*hasher.finalize().as_bytes()),
        };
        self.best
    }

    fn link(&mut self, account: AccountId, fingerprint: Fingerprint) {
        self.account_claims.entry(account).or_default().push(fingerprint);
    }

    fn unlink(&mut self, account: &AccountId, fingerprint: &Fingerprint) {
        if let Some(list) = self.account_claims.get_mut(account) {
            list.retain(|fp| fp != fingerprint);
            if list.is_empty() {
                self.account_claims.remove(account);
            }
        }
    }

    fn dispatch(
        &mut self,
        signer: AccountId,
        request: ClaimRequest,
        block_number: u64,
        now_ms: u64,
    ) -> Result<(), DispatchError> {
        let fingerprint = *request.fingerprint();

        match request {
            ClaimRequest::Create { note, .. } => {
                if self.proofs.contains_key(&fingerprint) {
                    return Err(DispatchError::ProofAlreadyExist);
                }
                self.proofs.insert(fingerprint, Claim {
                    owner: signer,
                    block_number,
                    created_at: now_ms,
                    note: note.into_option(),
                });
                self.link(signer, fingerprint);
                tracing::info!("ClaimCreated: {} by {}", fingerprint, signer);
            }
            ClaimRequest::Revoke { .. } => {
                let claim = self.proofs.get(&fingerprint).ok_or(DispatchError::ClaimNotExist)?;
                if claim.owner != signer {
                    return Err(DispatchError::NotClaimOwner);
                }
                self.proofs.remove(&fingerprint);
                self.unlink(&signer, &fingerprint);
                tracing::info!("ClaimRevoked: {} by {}", fingerprint, signer);
            }
            ClaimRequest::Transfer { destination, .. } => {
                let claim = self.proofs.get_mut(&fingerprint).ok_or(DispatchError::ClaimNotExist)?;
                if claim.owner != signer {
                    return Err(DispatchError::NotClaimOwner);
                }
                claim.owner = destination;
                claim.block_number = block_number;
                claim.created_at = now_ms;
                self.unlink(&signer, &fingerprint);
                self.link(destination, fingerprint);
                tracing::info!("ClaimTransferred: {} from {} to {}", fingerprint, signer, destination);
            }
        }

        self.notify(&fingerprint);
        Ok(())
    }

    fn notify(&mut self, fingerprint: &Fingerprint) {
        let Some(tx) = self.watchers.get(fingerprint) else {
            return;
        };
        if tx.receiver_count() == 0 {
            self.watchers.remove(fingerprint);
            return;
        }
        tx.send_replace(self.proofs.get(fingerprint).cloned());
    }
}

struct Inner {
    state: Mutex<ChainState>,
    block_time: Duration,
}

#[derive(Clone)]
pub struct DevChain {
    inner: Arc<Inner>,
}

impl DevChain {
    pub fn new(cfg: &NodeConfig) -> Self {
        Self::with_block_time(cfg.block_time())
    }

    pub fn with_block_time(block_time: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(ChainState::genesis()),
                block_time,
            }),
        }
    }

    /// Seals and finalizes as fast as the runtime schedules tasks.
    pub fn instant() -> Self {
        Self::with_block_time(Duration::ZERO)
    }

    pub async fn best_number(&self) -> u64 {
        self.inner.state.lock().await.best.number
    }

    pub async fn finalized_number(&self) -> u64 {
        self.inner.state.lock().await.finalized_number
    }

    pub async fn claim_count(&self) -> usize {
        self.inner.state.lock().await.proofs.len()
    }

    /// Live subscriptions on one fingerprint.
    pub async fn subscriber_count(&self, fingerprint: &Fingerprint) -> usize {
        self.inner
            .state
            .lock()
            .await
            .watchers
            .get(fingerprint)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    /// Fingerprints holding a watch channel, live or not yet pruned.
    pub async fn watched_fingerprints(&self) -> usize {
        self.inner.state.lock().await.watchers.len()
    }

    async fn validate(&self, extrinsic: &SignedExtrinsic) -> Result<ClaimRequest, String> {
        extrinsic.verify().map_err(|e| e.to_string())?;
        let request = ClaimRequest::from_call(&extrinsic.call).map_err(|e| e.to_string())?;

        let mut state = self.inner.state.lock().await;
        let expected = state.nonces.get(&extrinsic.signer).copied().unwrap_or(0);
        if extrinsic.nonce < expected {
            return Err(format!("Stale nonce {} (expected {})", extrinsic.nonce, expected));
        }
        if extrinsic.nonce > expected {
            return Err(format!("Future nonce {} (expected {})", extrinsic.nonce, expected));
        }
        state.nonces.insert(extrinsic.signer, expected + 1);
        Ok(request)
    }

    async fn seal(
        &self,
        signer: AccountId,
        request: ClaimRequest,
        extrinsic_hash: H256,
    ) -> (BlockRef, Result<(), DispatchError>) {
        let now_ms = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let mut state = self.inner.state.lock().await;
        let block = state.next_block(&extrinsic_hash);
        let outcome = state.dispatch(signer, request, block.number, now_ms);

        metrics::counter!("poe_blocks_authored_total", 1);
        metrics::gauge!("poe_claims", state.proofs.len() as f64);
        tracing::debug!("Sealed block #{} ({}) outcome {:?}", block.number, block.hash, outcome);
        (block, outcome)
    }

    async fn finalize(&self, number: u64) {
        let mut state = self.inner.state.lock().await;
        if number > state.finalized_number {
            state.finalized_number = number;
        }
    }
}

#[async_trait]
impl ChainClient for DevChain {
    async fn query_claim(&self, fingerprint: &Fingerprint) -> Result<Option<Claim>, ChainError> {
        Ok(self.inner.state.lock().await.proofs.get(fingerprint).cloned())
    }

    async fn subscribe_claim(&self, fingerprint: &Fingerprint) -> Result<ClaimStream, ChainError> {
        let mut state = self.inner.state.lock().await;
        // Drop senders whose subscribers have all gone.
        state.watchers.retain(|_, tx| tx.receiver_count() > 0);
        let current = state.proofs.get(fingerprint).cloned();
        let rx = state
            .watchers
            .entry(*fingerprint)
            .or_insert_with(|| watch::channel(current).0)
            .subscribe();
        Ok(WatchStream::new(rx).map(Ok).boxed())
    }

    async fn query_account_claims(&self, account: &AccountId) -> Result<Vec<Fingerprint>, ChainError> {
        Ok(self
            .inner
            .state
            .lock()
            .await
            .account_claims
            .get(account)
            .cloned()
            .unwrap_or_default())
    }

    async fn account_nonce(&self, account: &AccountId) -> Result<u64, ChainError> {
        Ok(self.inner.state.lock().await.nonces.get(account).copied().unwrap_or(0))
    }

    async fn submit_extrinsic(&self, extrinsic: SignedExtrinsic) -> Result<TxStatusStream, ChainError> {
        let hash = extrinsic.hash()?;

        let request = match self.validate(&extrinsic).await {
            Ok(request) => request,
            Err(reason) => {
                tracing::warn!("Rejected extrinsic {}: {}", hash, reason);
                metrics::counter!("poe_extrinsics_invalid_total", 1);
                return Ok(stream::iter([Ok(TxStatus::Invalid { reason })]).boxed());
            }
        };
        metrics::counter!("poe_extrinsics_submitted_total", 1);

        let (tx, rx) = mpsc::unbounded_channel();
        let chain = self.clone();
        let signer = extrinsic.signer;

        tokio::spawn(async move {
            // Sends fail once the submitter stops listening; the block is sealed regardless.
            let _ = tx.send(TxStatus::Ready);

            tokio::time::sleep(chain.inner.block_time).await;
            let (block, outcome) = chain.seal(signer, request, hash).await;
            let _ = tx.send(TxStatus::InBlock {
                block,
                dispatch_error: outcome.err().map(|e| e.to_string()),
            });

            tokio::time::sleep(chain.inner.block_time).await;
            chain.finalize(block.number).await;
            let _ = tx.send(TxStatus::Finalized { block });
        });

        Ok(UnboundedReceiverStream::new(rx).map(Ok).boxed())
    }
}
