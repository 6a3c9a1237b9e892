// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use poe_kernel::keyring::resolve_account;
use poe_kernel::{Claim, Fingerprint};
use poe_node::chain::ChainClient;
use poe_node::viewer::account_claims;
use std::collections::BTreeMap;

/// `getUserDocs`: every claim held by `account` (hex or dev name).
pub async fn run(client: &dyn ChainClient, account: &str) -> anyhow::Result<BTreeMap<Fingerprint, Claim>> {
    let account = resolve_account(account).with_context(|| format!("Invalid account {account:?}"))?;
    let docs = account_claims(client, &account)
        .await
        .with_context(|| format!("Cannot query claims of {account}"))?;
    tracing::debug!("{} holds {} claims", account, docs.len());
    Ok(docs)
}

pub fn to_json(docs: &BTreeMap<Fingerprint, Claim>) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(docs)?)
}

pub fn to_table(docs: &BTreeMap<Fingerprint, Claim>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Fingerprint", "Block", "Created", "Note"]);

    for (fingerprint, claim) in docs {
        let created = chrono::DateTime::from_timestamp_millis(claim.created_at as i64)
            .unwrap_or_default()
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

        table.add_row(vec![
            fingerprint.to_string(),
            claim.block_number.to_string(),
            created,
            claim.note.clone().unwrap_or_default(),
        ]);
    }

    table
}
