// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Digest a document, claim it, and see the claim in the viewer.
mod common;

use common::within;
use poe_kernel::{ClaimOp, Keypair, SubmissionStatus};
use poe_node::chain::ChainClient;
use poe_node::devchain::DevChain;
use poe_node::form::ClaimForm;
use poe_node::gateway::SubmissionGateway;
use poe_node::viewer::ProofViewer;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

const HELLO_DIGEST: &str = "0xea8f163db38682925e4491c5e58d4bb3506ef8c14eb78a86e908c5624a67200f";

#[tokio::test]
async fn test_claim_hello_document() {
    let chain = DevChain::with_block_time(Duration::from_millis(20));
    let client: Arc<dyn ChainClient> = Arc::new(chain.clone());
    let gateway = SubmissionGateway::new(client.clone());
    let signer = Keypair::dev("alice").unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"hello").unwrap();

    let mut form = ClaimForm::new();
    let fp = form.choose_file(file.path()).unwrap();
    assert_eq!(fp.to_string(), HELLO_DIGEST);

    let mut viewer = ProofViewer::new(client);
    viewer.track(fp).await;

    let request = form.request(ClaimOp::Create).unwrap();
    let submission = gateway.submit(request, &signer).await;
    let (number, hash) = within(submission.finalized()).await.unwrap();
    assert_eq!(submission.history().first(), Some(&SubmissionStatus::Broadcasting));
    assert_eq!(
        submission.status().to_string(),
        format!("Finalized. Block hash: {}", hash)
    );

    let mut renders = viewer.renders();
    let view = within(renders.wait_for(|v| v.claim.is_some())).await.unwrap().clone();
    assert_eq!(view.owner_text(), signer.account_id().to_string());
    assert_eq!(view.block_number_text(), number.to_string());
}
