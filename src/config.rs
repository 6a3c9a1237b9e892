// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants.

/// Maximum note length, counted in characters.
pub const MAX_NOTE_LEN: usize = 256;

/// Byte length of fingerprints, account ids and hashes.
pub const HASH_LEN: usize = 32;

/// Pallet name every claim call is routed to.
pub const POE_PALLET: &str = "poe";

/// Read buffer used when digesting a stream.
pub const DIGEST_CHUNK: usize = 64 * 1024;

/// Key-derivation context for the development keyring.
pub const KEYRING_CONTEXT: &str = "poe dev keyring 2025-01-01 seed derivation";
