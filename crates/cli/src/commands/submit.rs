// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use super::{submit_and_wait, Finalized};
use anyhow::Context;
use poe_kernel::digest::digest_file;
use poe_kernel::{ClaimOp, ClaimRequest, Keypair};
use poe_node::chain::ChainClient;
use std::path::Path;
use std::sync::Arc;

/// `submitDocInfo`: fingerprints the file and claims it with `comment` as
/// the note. Returns once the claim is finalized.
pub async fn run(
    client: Arc<dyn ChainClient>,
    path: &Path,
    comment: &str,
    signer: &Keypair,
) -> anyhow::Result<Finalized> {
    let fingerprint = digest_file(path).with_context(|| format!("Cannot digest {}", path.display()))?;
    tracing::info!("Claiming {} as {}", fingerprint, signer.account_id());

    let request = ClaimRequest::builder(ClaimOp::Create)
        .fingerprint(fingerprint)
        .note(comment)
        .build()?;

    submit_and_wait(client, request, signer).await
}
