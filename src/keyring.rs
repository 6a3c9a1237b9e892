// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Development keyring.
//!
//! Well-known accounts (`alice`, `bob`, ...) derive their ed25519 secret from
//! the URI `//Name` through BLAKE3 key derivation. They are for development
//! chains only.

use crate::config::KEYRING_CONTEXT;
use crate::error::{KernelError, KernelResult};
use crate::types::AccountId;
use core::fmt;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

pub const DEV_ACCOUNTS: [&str; 6] = ["alice", "bob", "charlie", "dave", "eve", "ferdie"];

pub struct Keypair {
    uri: String,
    signing: SigningKey,
}

impl Keypair {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            uri: String::new(),
            signing: SigningKey::from_bytes(&seed),
        }
    }

    /// Derives a keypair from a `//Phrase` style URI.
    pub fn from_phrase(phrase: &str) -> Self {
        let seed = blake3::derive_key(KEYRING_CONTEXT, phrase.as_bytes());
        Self {
            uri: phrase.to_string(),
            signing: SigningKey::from_bytes(&seed),
        }
    }

    /// One of [`DEV_ACCOUNTS`], case-insensitive.
    pub fn dev(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if !DEV_ACCOUNTS.contains(&lower.as_str()) {
            return None;
        }
        let mut chars = lower.chars();
        let capitalized: String = chars
            .next()
            .map(|c| c.to_ascii_uppercase())
            .into_iter()
            .chain(chars)
            .collect();
        Some(Self::from_phrase(&format!("//{capitalized}")))
    }

    /// Accepts a dev account name or a `//Phrase` URI.
    pub fn from_uri(uri: &str) -> KernelResult<Self> {
        if uri.starts_with("//") && uri.len() > 2 {
            return Ok(Self::from_phrase(uri));
        }
        Self::dev(uri).ok_or_else(|| KernelError::UnknownSigner(uri.to_string()))
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn account_id(&self) -> AccountId {
        AccountId(self.signing.verifying_key().to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing.sign(message).to_bytes()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("uri", &self.uri)
            .field("account", &self.account_id())
            .finish()
    }
}

pub fn verify(account: &AccountId, message: &[u8], signature: &[u8]) -> KernelResult<()> {
    let key = VerifyingKey::from_bytes(account.as_bytes()).map_err(|_| KernelError::BadSignature)?;
    let raw: [u8; 64] = signature.try_into().map_err(|_| KernelError::BadSignature)?;
    key.verify(message, &Signature::from_bytes(&raw))
        .map_err(|_| KernelError::BadSignature)
}

/// Resolves user input naming an account: a dev name, a `//Phrase`, or hex.
pub fn resolve_account(input: &str) -> KernelResult<AccountId> {
    let trimmed = input.trim();
    if let Ok(keypair) = Keypair::from_uri(trimmed) {
        return Ok(keypair.account_id());
    }
    trimmed.parse()
}
