// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
mod common;

use common::{create_request, within, OfflineClient, ScriptedClient};
use poe_kernel::types::H256;
use poe_kernel::{ClaimOp, ClaimRequest, Keypair, SubmissionStatus};
use poe_node::api::{BlockRef, TxStatus};
use poe_node::chain::ChainClient;
use poe_node::devchain::DevChain;
use poe_node::errors::SubmissionError;
use poe_node::gateway::{map_tx_status, SubmissionGateway};
use std::sync::Arc;

fn block(n: u64) -> BlockRef {
    BlockRef { number: n, hash: H256([n as u8; 32]) }
}

#[tokio::test]
async fn test_broadcasting_then_finalized() {
    let chain = DevChain::instant();
    let gateway = SubmissionGateway::new(Arc::new(chain.clone()));
    let alice = Keypair::dev("alice").unwrap();

    let submission = gateway.submit(create_request(b"hello", "hi"), &alice).await;
    assert!(submission.tx_hash().is_some());

    let (number, _) = within(submission.finalized()).await.unwrap();
    assert_eq!(number, 1);

    let history = submission.history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0], SubmissionStatus::Broadcasting);
    assert!(matches!(history[1], SubmissionStatus::InBlock { block_number: 1, .. }));
    assert!(history[2].is_finalized());
    assert!(submission.status().is_finalized());
}

#[tokio::test]
async fn test_concurrent_submissions_are_tracked_independently() {
    let chain = DevChain::instant();
    let gateway = SubmissionGateway::new(Arc::new(chain.clone()));
    let alice = Keypair::dev("alice").unwrap();
    let bob = Keypair::dev("bob").unwrap();

    let (a, b) = tokio::join!(
        gateway.submit(create_request(b"alice doc", ""), &alice),
        gateway.submit(create_request(b"bob doc", ""), &bob),
    );
    assert_ne!(a.id(), b.id());

    let (fa, fb) = within(async { tokio::join!(a.finalized(), b.finalized()) }).await;
    let (na, nb) = (fa.unwrap().0, fb.unwrap().0);
    assert_ne!(na, nb, "each extrinsic gets its own block");
    assert_eq!(a.history().len(), 3);
    assert_eq!(b.history().len(), 3);
    assert_eq!(chain.claim_count().await, 2);
}

#[tokio::test]
async fn test_back_to_back_from_one_signer() {
    let chain = DevChain::instant();
    let gateway = SubmissionGateway::new(Arc::new(chain.clone()));
    let alice = Keypair::dev("alice").unwrap();

    let first = gateway.submit(create_request(b"one", ""), &alice).await;
    let second = gateway.submit(create_request(b"two", ""), &alice).await;

    within(first.finalized()).await.unwrap();
    within(second.finalized()).await.unwrap();
    assert_ne!(first.tx_hash(), second.tx_hash());
}

#[tokio::test]
async fn test_concurrent_submissions_from_one_signer() {
    let chain = DevChain::instant();
    let gateway = SubmissionGateway::new(Arc::new(chain.clone()));
    let alice = Keypair::dev("alice").unwrap();
    let docs: Vec<Vec<u8>> = (0..5u8).map(|i| vec![b'd', i]).collect();

    let submissions = futures::future::join_all(
        docs.iter().map(|doc| gateway.submit(create_request(doc, ""), &alice)),
    )
    .await;

    for submission in &submissions {
        within(submission.finalized()).await.unwrap();
    }
    assert_eq!(chain.claim_count().await, 5);
    assert_eq!(chain.account_nonce(&alice.account_id()).await.unwrap(), 5);
}

#[tokio::test]
async fn test_chain_rejection_is_failed_status() {
    let chain = DevChain::instant();
    let gateway = SubmissionGateway::new(Arc::new(chain));
    let alice = Keypair::dev("alice").unwrap();
    let bob = Keypair::dev("bob").unwrap();

    within(gateway.submit(create_request(b"mine", ""), &alice).await.finalized()).await.unwrap();

    let revoke = ClaimRequest::builder(ClaimOp::Revoke)
        .fingerprint(*create_request(b"mine", "").fingerprint())
        .build()
        .unwrap();
    let submission = gateway.submit(revoke, &bob).await;
    let err = within(submission.finalized()).await.unwrap_err();
    assert_eq!(err, SubmissionError::Failed("NotClaimOwner".into()));
    assert_eq!(
        submission.status(),
        SubmissionStatus::Failed { reason: "NotClaimOwner".into() }
    );
}

#[tokio::test]
async fn test_connection_failure_is_failed_status() {
    let gateway = SubmissionGateway::new(Arc::new(OfflineClient));
    let alice = Keypair::dev("alice").unwrap();

    let submission = gateway.submit(create_request(b"x", ""), &alice).await;
    assert!(submission.tx_hash().is_none());
    match submission.status() {
        SubmissionStatus::Failed { reason } => assert!(reason.contains("connection refused")),
        other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(within(submission.finalized()).await, Err(SubmissionError::Failed(_))));
}

#[tokio::test]
async fn test_stream_ending_early_fails() {
    let client = ScriptedClient {
        statuses: vec![TxStatus::Ready, TxStatus::InBlock { block: block(4), dispatch_error: None }],
        claim_updates: vec![],
    };
    let gateway = SubmissionGateway::new(Arc::new(client));
    let submission = gateway.submit(create_request(b"x", ""), &Keypair::dev("alice").unwrap()).await;

    match within(submission.outcome()).await {
        SubmissionStatus::Failed { reason } => assert!(reason.contains("ended before finalization")),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_out_of_order_statuses_never_regress() {
    let client = ScriptedClient {
        statuses: vec![
            TxStatus::Ready,
            TxStatus::InBlock { block: block(2), dispatch_error: None },
            TxStatus::Ready,
            TxStatus::Finalized { block: block(2) },
            TxStatus::Invalid { reason: "late".into() },
        ],
        claim_updates: vec![],
    };
    let gateway = SubmissionGateway::new(Arc::new(client));
    let submission = gateway.submit(create_request(b"x", ""), &Keypair::dev("alice").unwrap()).await;

    within(submission.finalized()).await.unwrap();
    let stages: Vec<u8> = submission.history().iter().map(|s| s.stage()).collect();
    assert_eq!(stages, vec![1, 2, 3]);
}

#[test]
fn test_wire_status_mapping() {
    assert_eq!(map_tx_status(TxStatus::Ready), SubmissionStatus::Broadcasting);
    assert_eq!(
        map_tx_status(TxStatus::InBlock { block: block(3), dispatch_error: Some("ClaimNotExist".into()) }),
        SubmissionStatus::Failed { reason: "ClaimNotExist".into() }
    );
    assert_eq!(
        map_tx_status(TxStatus::Finalized { block: block(3) }),
        SubmissionStatus::Finalized { block_number: 3, block_hash: H256([3; 32]) }
    );
}
