// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod claim;
pub mod digest;
pub mod docs;
pub mod submit;
pub mod watch;

use anyhow::Context;
use poe_kernel::digest::digest_file;
use poe_kernel::{ClaimRequest, Fingerprint, Keypair, H256};
use poe_node::chain::ChainClient;
use poe_node::gateway::SubmissionGateway;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// A claim operation that reached finalization.
#[derive(Debug, Clone, Serialize)]
pub struct Finalized {
    pub fingerprint: Fingerprint,
    pub tx_hash: H256,
    pub block_number: u64,
    pub block_hash: H256,
}

/// Reads a target given on the command line: a `0x` fingerprint, or a file
/// whose contents are digested.
pub fn resolve_target(target: &str) -> anyhow::Result<Fingerprint> {
    if target.starts_with("0x") && !Path::new(target).exists() {
        return target
            .parse()
            .with_context(|| format!("Invalid fingerprint {target:?}"));
    }
    digest_file(target).with_context(|| format!("Cannot digest {target}"))
}

/// Submits `request` and prints each status line until a terminal one.
/// Anything but finalization is an error.
pub(crate) async fn submit_and_wait(
    client: Arc<dyn ChainClient>,
    request: ClaimRequest,
    signer: &Keypair,
) -> anyhow::Result<Finalized> {
    let fingerprint = *request.fingerprint();
    let gateway = SubmissionGateway::new(client);
    let submission = gateway.submit(request, signer).await;

    let mut status = submission.subscribe();
    loop {
        let current = status.borrow_and_update().clone();
        eprintln!("{current}");
        if current.is_terminal() || status.changed().await.is_err() {
            break;
        }
    }

    let (block_number, block_hash) = submission.finalized().await?;
    let tx_hash = submission
        .tx_hash()
        .context("Finalized submission has no transaction hash")?;

    Ok(Finalized {
        fingerprint,
        tx_hash,
        block_number,
        block_hash,
    })
}
