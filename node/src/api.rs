// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use poe_kernel::types::H256;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRef {
    pub number: u64,
    pub hash: H256,
}

/// Pool and block progress of one extrinsic, as streamed by the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TxStatus {
    /// Accepted into the pool and broadcast.
    Ready,
    /// Sealed in a block. `dispatch_error` carries the runtime's rejection, if any.
    InBlock {
        block: BlockRef,
        dispatch_error: Option<String>,
    },
    Finalized { block: BlockRef },
    /// Rejected before inclusion (bad signature, stale nonce, undecodable call).
    Invalid { reason: String },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NonceResponse {
    pub nonce: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub best_number: u64,
    pub finalized_number: u64,
}
