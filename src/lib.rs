// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! poe-kernel: content fingerprints, claim requests and signed calls for a
//! proof-of-existence chain.

pub mod config;
pub mod error;
pub mod types;
pub mod digest;
pub mod claim;
pub mod call;
pub mod keyring;
pub mod status;

pub use claim::{Claim, ClaimOp, ClaimRequest, ClaimRequestBuilder, Note};
pub use call::{Call, CallParam, SignedExtrinsic};
pub use error::{KernelError, KernelResult};
pub use keyring::Keypair;
pub use status::{StatusTracker, SubmissionStatus};
pub use types::{AccountId, Fingerprint, H256};

#[cfg(test)]
pub mod tests;
