// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Chain Client seam.
//!
//! Every component takes an `Arc<dyn ChainClient>` instead of reaching for a
//! shared connection, so tests swap in [`crate::devchain::DevChain`] and
//! binaries use [`crate::network::HttpChainClient`].

use crate::api::TxStatus;
use crate::errors::ChainError;
use async_trait::async_trait;
use futures::stream::BoxStream;
use poe_kernel::{AccountId, Call, Claim, Fingerprint, Keypair, SignedExtrinsic, H256};

/// Current value of a claim record, then every change. Dropping it releases the subscription.
pub type ClaimStream = BoxStream<'static, Result<Option<Claim>, ChainError>>;

pub type TxStatusStream = BoxStream<'static, Result<TxStatus, ChainError>>;

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Point-in-time read of one claim.
    async fn query_claim(&self, fingerprint: &Fingerprint) -> Result<Option<Claim>, ChainError>;

    /// Query-and-subscribe on one claim.
    async fn subscribe_claim(&self, fingerprint: &Fingerprint) -> Result<ClaimStream, ChainError>;

    async fn query_account_claims(&self, account: &AccountId) -> Result<Vec<Fingerprint>, ChainError>;

    async fn account_nonce(&self, account: &AccountId) -> Result<u64, ChainError>;

    async fn submit_extrinsic(&self, extrinsic: SignedExtrinsic) -> Result<TxStatusStream, ChainError>;

    /// Signs `call` with the signer's next nonce and broadcasts it.
    async fn sign_and_submit(&self, call: Call, signer: &Keypair) -> Result<(H256, TxStatusStream), ChainError> {
        let nonce = self.account_nonce(&signer.account_id()).await?;
        let extrinsic = SignedExtrinsic::sign(call, signer, nonce)?;
        let hash = extrinsic.hash()?;
        tracing::debug!("Submitting {}::{} as {} (nonce {}, hash {})",
            extrinsic.call.pallet, extrinsic.call.name, extrinsic.signer, nonce, hash);
        let stream = self.submit_extrinsic(extrinsic).await?;
        Ok((hash, stream))
    }
}
