// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
#![allow(dead_code)]

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use poe_kernel::digest::digest_bytes;
use poe_kernel::{AccountId, Claim, ClaimOp, ClaimRequest, Fingerprint, SignedExtrinsic};
use poe_node::api::TxStatus;
use poe_node::chain::{ChainClient, ClaimStream, TxStatusStream};
use poe_node::errors::ChainError;
use std::future::Future;
use std::time::Duration;

pub const WAIT: Duration = Duration::from_secs(5);

pub fn create_request(content: &[u8], note: &str) -> ClaimRequest {
    ClaimRequest::builder(ClaimOp::Create)
        .fingerprint(digest_bytes(content))
        .note(note)
        .build()
        .unwrap()
}

pub async fn within<F: Future>(fut: F) -> F::Output {
    tokio::time::timeout(WAIT, fut).await.expect("timed out")
}

/// Every call fails as if the node were unreachable.
pub struct OfflineClient;

#[async_trait]
impl ChainClient for OfflineClient {
    async fn query_claim(&self, _: &Fingerprint) -> Result<Option<Claim>, ChainError> {
        Err(ChainError::Network("connection refused".into()))
    }
    async fn subscribe_claim(&self, _: &Fingerprint) -> Result<ClaimStream, ChainError> {
        Err(ChainError::Network("connection refused".into()))
    }
    async fn query_account_claims(&self, _: &AccountId) -> Result<Vec<Fingerprint>, ChainError> {
        Err(ChainError::Network("connection refused".into()))
    }
    async fn account_nonce(&self, _: &AccountId) -> Result<u64, ChainError> {
        Err(ChainError::Network("connection refused".into()))
    }
    async fn submit_extrinsic(&self, _: SignedExtrinsic) -> Result<TxStatusStream, ChainError> {
        Err(ChainError::Network("connection refused".into()))
    }
}

/// Replays fixed status and claim scripts.
pub struct ScriptedClient {
    pub statuses: Vec<TxStatus>,
    pub claim_updates: Vec<Result<Option<Claim>, String>>,
}

#[async_trait]
impl ChainClient for ScriptedClient {
    async fn query_claim(&self, _: &Fingerprint) -> Result<Option<Claim>, ChainError> {
        Ok(None)
    }
    async fn subscribe_claim(&self, _: &Fingerprint) -> Result<ClaimStream, ChainError> {
        let items: Vec<_> = self
            .claim_updates
            .iter()
            .cloned()
            .map(|r| r.map_err(ChainError::Network))
            .collect();
        // Stay open after the script, like a live subscription.
        Ok(stream::iter(items).chain(stream::pending()).boxed())
    }
    async fn query_account_claims(&self, _: &AccountId) -> Result<Vec<Fingerprint>, ChainError> {
        Ok(Vec::new())
    }
    async fn account_nonce(&self, _: &AccountId) -> Result<u64, ChainError> {
        Ok(0)
    }
    async fn submit_extrinsic(&self, _: SignedExtrinsic) -> Result<TxStatusStream, ChainError> {
        Ok(stream::iter(self.statuses.clone().into_iter().map(Ok)).boxed())
    }
}

/// Subscriptions never resolve.
pub struct PendingClient;

#[async_trait]
impl ChainClient for PendingClient {
    async fn query_claim(&self, _: &Fingerprint) -> Result<Option<Claim>, ChainError> {
        Ok(None)
    }
    async fn subscribe_claim(&self, _: &Fingerprint) -> Result<ClaimStream, ChainError> {
        futures::future::pending().await
    }
    async fn query_account_claims(&self, _: &AccountId) -> Result<Vec<Fingerprint>, ChainError> {
        Ok(Vec::new())
    }
    async fn account_nonce(&self, _: &AccountId) -> Result<u64, ChainError> {
        Ok(0)
    }
    async fn submit_extrinsic(&self, _: SignedExtrinsic) -> Result<TxStatusStream, ChainError> {
        futures::future::pending().await
    }
}

/// Subscriptions deliver a fixed script, then end.
pub struct ClosingClient(pub Vec<Option<Claim>>);

#[async_trait]
impl ChainClient for ClosingClient {
    async fn query_claim(&self, _: &Fingerprint) -> Result<Option<Claim>, ChainError> {
        Ok(None)
    }
    async fn subscribe_claim(&self, _: &Fingerprint) -> Result<ClaimStream, ChainError> {
        Ok(stream::iter(self.0.clone().into_iter().map(Ok)).boxed())
    }
    async fn query_account_claims(&self, _: &AccountId) -> Result<Vec<Fingerprint>, ChainError> {
        Ok(Vec::new())
    }
    async fn account_nonce(&self, _: &AccountId) -> Result<u64, ChainError> {
        Ok(0)
    }
    async fn submit_extrinsic(&self, _: SignedExtrinsic) -> Result<TxStatusStream, ChainError> {
        Err(ChainError::Network("read only".into()))
    }
}
