// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;
use clap::{Parser, Subcommand};
use poe_cli::commands::{claim, digest, docs, resolve_target, submit, watch, Finalized};
use poe_kernel::Keypair;
use poe_node::chain::ChainClient;
use poe_node::network::HttpChainClient;
use poe_node::telemetry;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "poe")]
#[command(version, about = "Proof of Existence client: fingerprint documents and claim them on chain", long_about = None)]
struct Cli {
    /// Node HTTP endpoint.
    #[arg(long, global = true, env = "POE_NODE_URL", default_value = "http://127.0.0.1:9944")]
    url: String,

    /// Bearer token, if the node requires one.
    #[arg(long, global = true, env = "POE_AUTH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Claim a document, optionally with a comment stored as its note
    #[command(name = "submitDocInfo", alias = "submit-doc-info")]
    SubmitDocInfo {
        file: PathBuf,
        comment: Option<String>,
        /// Dev account name or //Phrase
        #[arg(long, default_value = "alice")]
        signer: String,
    },
    /// List every document claimed by an account
    #[command(name = "getUserDocs", alias = "get-user-docs")]
    GetUserDocs {
        /// Hex account id or dev account name
        account: String,
        /// Render a table instead of JSON
        #[arg(long)]
        table: bool,
    },
    /// Revoke a claim you own
    #[command(name = "revokeClaim", alias = "revoke-claim")]
    RevokeClaim {
        /// File path or 0x fingerprint
        target: String,
        #[arg(long, default_value = "alice")]
        signer: String,
    },
    /// Hand a claim you own to another account
    #[command(name = "transferClaim", alias = "transfer-claim")]
    TransferClaim {
        /// File path or 0x fingerprint
        target: String,
        destination: String,
        #[arg(long, default_value = "alice")]
        signer: String,
    },
    /// Print a file's fingerprint without touching the chain
    Digest { file: PathBuf },
    /// Follow the claim record of a document
    Watch {
        /// File path or 0x fingerprint
        target: String,
        /// Stop after this many renders
        #[arg(long)]
        count: Option<usize>,
    },
}

async fn connect(url: &str, token: Option<String>) -> anyhow::Result<Arc<dyn ChainClient>> {
    let client = HttpChainClient::connect(url.to_string(), token)
        .await
        .with_context(|| format!("Cannot reach node at {url}"))?;
    Ok(Arc::new(client))
}

fn signer(uri: &str) -> anyhow::Result<Keypair> {
    Keypair::from_uri(uri).with_context(|| format!("Unknown signer {uri:?}"))
}

fn print_finalized(done: &Finalized) {
    println!("Fingerprint: {}", done.fingerprint);
    println!("Transaction: {}", done.tx_hash);
    println!("Finalized in block #{} ({})", done.block_number, done.block_hash);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_logging("poe_cli=info,poe_node=warn");
    let cli = Cli::parse();

    match cli.command {
        Commands::SubmitDocInfo { file, comment, signer: uri } => {
            let keypair = signer(&uri)?;
            let client = connect(&cli.url, cli.token).await?;
            let done = submit::run(client, &file, comment.as_deref().unwrap_or_default(), &keypair).await?;
            print_finalized(&done);
        }
        Commands::GetUserDocs { account, table } => {
            let client = connect(&cli.url, cli.token).await?;
            let found = docs::run(client.as_ref(), &account).await?;
            if table {
                println!("{}", docs::to_table(&found));
            } else {
                println!("{}", docs::to_json(&found)?);
            }
        }
        Commands::RevokeClaim { target, signer: uri } => {
            let keypair = signer(&uri)?;
            let client = connect(&cli.url, cli.token).await?;
            print_finalized(&claim::revoke(client, &target, &keypair).await?);
        }
        Commands::TransferClaim { target, destination, signer: uri } => {
            let keypair = signer(&uri)?;
            let client = connect(&cli.url, cli.token).await?;
            print_finalized(&claim::transfer(client, &target, &destination, &keypair).await?);
        }
        Commands::Digest { file } => {
            println!("{}", digest::run(&file)?);
        }
        Commands::Watch { target, count } => {
            let fingerprint = resolve_target(&target)?;
            let client = connect(&cli.url, cli.token).await?;
            watch::run(client, fingerprint, count, |view| println!("{view}")).await?;
        }
    }

    Ok(())
}
