// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use poe_kernel::Fingerprint;
use poe_node::chain::ChainClient;
use poe_node::viewer::{ProofView, ProofViewer};
use std::sync::Arc;

/// Follows `fingerprint` and hands every render to `on_render`. Stops after
/// `count` renders or when the subscription ends. A subscription that ends
/// on an error is returned as `Err`.
pub async fn run(
    client: Arc<dyn ChainClient>,
    fingerprint: Fingerprint,
    count: Option<usize>,
    mut on_render: impl FnMut(&ProofView),
) -> anyhow::Result<usize> {
    let mut viewer = ProofViewer::new(client);
    let mut renders = viewer.renders();
    viewer.track(fingerprint).await;

    let mut seen = 0;
    let mut last: Option<(u64, Option<String>)> = None;
    let mut failure = None;

    while count.map_or(true, |n| seen < n) {
        if renders.changed().await.is_err() {
            break;
        }
        let view = renders.borrow_and_update().clone();

        // The blank view published when tracking starts, and the close marker, are not renders.
        let key = (view.deliveries, view.error.clone());
        let blank = view.deliveries == 0 && view.error.is_none();
        if !blank && last.as_ref() != Some(&key) {
            on_render(&view);
            seen += 1;
            last = Some(key);
        }

        if view.closed {
            failure = view.error;
            break;
        }
    }

    viewer.release().await;
    match failure {
        Some(error) => anyhow::bail!("Subscription to {} ended: {}", fingerprint, error),
        None => Ok(seen),
    }
}
