// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    /// Delay before an extrinsic is sealed, and again before it is finalized.
    pub block_time_ms: u64,
    pub auth_token: Option<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 9944)),
            block_time_ms: 500,
            auth_token: None,
        }
    }
}

impl NodeConfig {
    /// Defaults overridden by `POE_BIND_ADDR`, `POE_BLOCK_TIME_MS` and `POE_AUTH_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Ok(value) = std::env::var("POE_BIND_ADDR") {
            cfg.bind_addr = value
                .parse()
                .map_err(|_| ConfigError::Invalid { var: "POE_BIND_ADDR", value })?;
        }
        if let Ok(value) = std::env::var("POE_BLOCK_TIME_MS") {
            cfg.block_time_ms = value
                .parse()
                .map_err(|_| ConfigError::Invalid { var: "POE_BLOCK_TIME_MS", value })?;
        }
        if let Ok(token) = std::env::var("POE_AUTH_TOKEN") {
            if !token.is_empty() {
                cfg.auth_token = Some(token);
            }
        }

        Ok(cfg)
    }

    pub fn block_time(&self) -> Duration {
        Duration::from_millis(self.block_time_ms)
    }
}
