// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use super::{resolve_target, submit_and_wait, Finalized};
use anyhow::Context;
use poe_kernel::keyring::resolve_account;
use poe_kernel::{ClaimOp, ClaimRequest, Keypair};
use poe_node::chain::ChainClient;
use std::sync::Arc;

pub async fn revoke(client: Arc<dyn ChainClient>, target: &str, signer: &Keypair) -> anyhow::Result<Finalized> {
    let request = ClaimRequest::builder(ClaimOp::Revoke)
        .fingerprint(resolve_target(target)?)
        .build()?;
    submit_and_wait(client, request, signer).await
}

pub async fn transfer(
    client: Arc<dyn ChainClient>,
    target: &str,
    destination: &str,
    signer: &Keypair,
) -> anyhow::Result<Finalized> {
    let destination = resolve_account(destination)
        .with_context(|| format!("Invalid destination {destination:?}"))?;
    let request = ClaimRequest::builder(ClaimOp::Transfer)
        .fingerprint(resolve_target(target)?)
        .destination(destination)
        .build()?;
    submit_and_wait(client, request, signer).await
}
