// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Proof Viewer
//!
//! Follows the chain record of one fingerprint at a time and renders it.
//!
//! # State machine
//! ```text
//! Unsubscribed --track(F)--> Tracking(F, gen g)
//! Tracking(F1) --track(F2)--> release F1 (task joined) --> Tracking(F2, gen g+2)
//! Tracking(F)  --release / drop--> Unsubscribed
//! ```
//!
//! # Invariants
//! - At most one live subscription per viewer
//! - A delivery tagged with a stale generation is never rendered
//! - Errors are recorded beside the last good claim, never replacing it
//! - When the subscription ends the view is marked `closed`

use crate::chain::ChainClient;
use crate::errors::ChainError;
use futures::StreamExt;
use poe_kernel::{AccountId, Claim, Fingerprint};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// What the viewer currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProofView {
    pub fingerprint: Option<Fingerprint>,
    pub claim: Option<Claim>,
    /// Subscription deliveries rendered for the current fingerprint.
    pub deliveries: u64,
    pub error: Option<String>,
    /// Set once the subscription has ended; no further renders follow.
    pub closed: bool,
}

impl ProofView {
    /// Empty when there is no claim.
    pub fn owner_text(&self) -> String {
        self.claim.as_ref().map(|c| c.owner.to_string()).unwrap_or_default()
    }

    pub fn block_number_text(&self) -> String {
        self.claim.as_ref().map(|c| c.block_number.to_string()).unwrap_or_default()
    }
}

impl fmt::Display for ProofView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Claim info, owner: {}, blockNumber: {}", self.owner_text(), self.block_number_text())?;
        if let Some(note) = self.claim.as_ref().and_then(|c| c.note.as_deref()) {
            write!(f, ", note: {}", note)?;
        }
        if let Some(err) = &self.error {
            write!(f, " (error: {})", err)?;
        }
        Ok(())
    }
}

struct Shared {
    generation: AtomicU64,
    view: watch::Sender<ProofView>,
}

impl Shared {
    fn render(&self, generation: u64, claim: Option<Claim>) -> bool {
        self.view.send_if_modified(|view| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            view.claim = claim;
            view.deliveries += 1;
            view.error = None;
            true
        })
    }

    fn report(&self, generation: u64, error: String) {
        self.view.send_if_modified(|view| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            view.error = Some(error);
            true
        });
    }

    fn close(&self, generation: u64) {
        self.view.send_if_modified(|view| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            view.closed = true;
            true
        });
    }
}

struct ActiveSubscription {
    fingerprint: Fingerprint,
    task: JoinHandle<()>,
}

pub struct ProofViewer {
    client: Arc<dyn ChainClient>,
    shared: Arc<Shared>,
    active: Option<ActiveSubscription>,
}

impl ProofViewer {
    pub fn new(client: Arc<dyn ChainClient>) -> Self {
        let (view, _) = watch::channel(ProofView::default());
        Self {
            client,
            shared: Arc::new(Shared {
                generation: AtomicU64::new(0),
                view,
            }),
            active: None,
        }
    }

    pub fn renders(&self) -> watch::Receiver<ProofView> {
        self.shared.view.subscribe()
    }

    pub fn view(&self) -> ProofView {
        self.shared.view.borrow().clone()
    }

    pub fn tracking(&self) -> Option<Fingerprint> {
        self.active.as_ref().map(|a| a.fingerprint)
    }

    /// Releases the current subscription, then follows `fingerprint`.
    pub async fn track(&mut self, fingerprint: Fingerprint) {
        if self.release().await {
            tracing::debug!("Viewer switching to {}", fingerprint);
        }

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.view.send_replace(ProofView {
            fingerprint: Some(fingerprint),
            ..ProofView::default()
        });

        let task = tokio::spawn(follow(self.client.clone(), self.shared.clone(), generation, fingerprint));
        self.active = Some(ActiveSubscription { fingerprint, task });
    }

    /// Stops the live subscription. Returns `false` if there was none.
    pub async fn release(&mut self) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        active.task.abort();
        // Joining guarantees the stream, and with it the chain subscription, is dropped.
        let _ = active.task.await;
        tracing::debug!("Released subscription for {}", active.fingerprint);
        true
    }

    /// Every claim held by `account`, resolved at one point in time.
    pub async fn query_account(&self, account: &AccountId) -> Result<BTreeMap<Fingerprint, Claim>, ChainError> {
        account_claims(self.client.as_ref(), account).await
    }
}

impl Drop for ProofViewer {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            self.shared.generation.fetch_add(1, Ordering::SeqCst);
            active.task.abort();
        }
    }
}

async fn follow(client: Arc<dyn ChainClient>, shared: Arc<Shared>, generation: u64, fingerprint: Fingerprint) {
    let mut updates = match client.subscribe_claim(&fingerprint).await {
        Ok(updates) => updates,
        Err(e) => {
            tracing::warn!("Subscribe to {} failed: {}", fingerprint, e);
            shared.report(generation, e.to_string());
            shared.close(generation);
            return;
        }
    };

    while let Some(update) = updates.next().await {
        match update {
            Ok(claim) => {
                if !shared.render(generation, claim) {
                    tracing::debug!("Dropped stale delivery for {}", fingerprint);
                }
            }
            Err(e) => {
                tracing::warn!("Subscription error on {}: {}", fingerprint, e);
                shared.report(generation, e.to_string());
            }
        }
    }

    tracing::debug!("Subscription stream for {} closed", fingerprint);
    shared.close(generation);
}

/// Lists `account`'s fingerprints, then resolves each one concurrently.
/// Fingerprints whose claim vanished in between are skipped.
pub async fn account_claims(
    client: &dyn ChainClient,
    account: &AccountId,
) -> Result<BTreeMap<Fingerprint, Claim>, ChainError> {
    let fingerprints = client.query_account_claims(account).await?;
    let claims = futures::future::try_join_all(fingerprints.iter().map(|fp| client.query_claim(fp))).await?;

    Ok(fingerprints
        .into_iter()
        .zip(claims)
        .filter_map(|(fp, claim)| claim.map(|c| (fp, c)))
        .collect())
}
