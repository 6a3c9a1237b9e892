// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use poe_node::config::NodeConfig;
use poe_node::devchain::DevChain;
use poe_node::server::build_router;
use poe_node::telemetry::init_telemetry;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_telemetry()?;

    let cfg = NodeConfig::from_env()?;
    tracing::info!("Initializing PoE dev chain (block time {} ms, auth {})",
        cfg.block_time_ms, if cfg.auth_token.is_some() { "on" } else { "off" });

    let chain = DevChain::new(&cfg);
    let app = build_router(chain, cfg.auth_token.clone());

    let addr = cfg.bind_addr;
    tracing::info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
