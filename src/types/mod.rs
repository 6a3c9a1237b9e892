// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Fixed-width identity types.
//!
//! Every 32-byte identifier renders as lowercase hex with a `0x` prefix and
//! parses with or without it. Serde goes through the same string form, so the
//! JSON wire format and the bincode signing payload agree.

pub mod id;

pub use id::{AccountId, Fingerprint, H256};
