// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Pallet calls and signed extrinsics.
//!
//! # Signing payload
//! ```text
//! bincode(standard) of { call, signer, nonce }
//! ```
//! The signature is ed25519 over that payload. The extrinsic hash is BLAKE3
//! over the payload followed by the 64 signature bytes.

use crate::error::{KernelError, KernelResult};
use crate::keyring::{self, Keypair};
use crate::types::{AccountId, H256};
use serde::{Deserialize, Serialize};

/// One ordered call parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CallParam {
    Bytes(#[serde(with = "hex::serde")] Vec<u8>),
    Account(AccountId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub pallet: String,
    pub name: String,
    pub params: Vec<CallParam>,
}

impl Call {
    pub fn new(pallet: &str, name: &str, params: Vec<CallParam>) -> Self {
        Self {
            pallet: pallet.to_string(),
            name: name.to_string(),
            params,
        }
    }
}

#[derive(Serialize)]
struct SigningPayload<'a> {
    call: &'a Call,
    signer: &'a AccountId,
    nonce: u64,
}

fn signing_payload(call: &Call, signer: &AccountId, nonce: u64) -> KernelResult<Vec<u8>> {
    let payload = SigningPayload { call, signer, nonce };
    bincode::serde::encode_to_vec(&payload, bincode::config::standard())
        .map_err(|e| KernelError::Encode(e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedExtrinsic {
    pub call: Call,
    pub signer: AccountId,
    pub nonce: u64,
    #[serde(with = "hex::serde")]
    pub signature: Vec<u8>,
}

impl SignedExtrinsic {
    pub fn sign(call: Call, keypair: &Keypair, nonce: u64) -> KernelResult<Self> {
        let signer = keypair.account_id();
        let payload = signing_payload(&call, &signer, nonce)?;
        let signature = keypair.sign(&payload).to_vec();
        Ok(Self {
            call,
            signer,
            nonce,
            signature,
        })
    }

    pub fn verify(&self) -> KernelResult<()> {
        let payload = signing_payload(&self.call, &self.signer, self.nonce)?;
        keyring::verify(&self.signer, &payload, &self.signature)
    }

    pub fn hash(&self) -> KernelResult<H256> {
        let payload = signing_payload(&self.call, &self.signer, self.nonce)?;
        let mut hasher = blake3::Hasher::new();
        hasher.update(&payload);
        hasher.update(&self.signature);
        Ok(H256(*hasher.finalize().as_bytes()))
    }
}
