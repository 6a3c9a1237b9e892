// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Content Fingerprints
//!
//! BLAKE3-256 over the exact bytes of a file. Same bytes, same fingerprint,
//! on every architecture.
//!
//! A fingerprint is only produced after the source has been read to EOF. A
//! read that fails part way returns an error, never a hash of whatever
//! arrived before the failure.

use crate::config::DIGEST_CHUNK;
use crate::error::{KernelError, KernelResult};
use crate::types::Fingerprint;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Fingerprint of an in-memory byte slice.
pub fn digest_bytes(data: &[u8]) -> Fingerprint {
    Fingerprint(*blake3::hash(data).as_bytes())
}

/// Fingerprint of everything `reader` yields until EOF.
pub fn digest_reader<R: Read>(mut reader: R) -> KernelResult<Fingerprint> {
    let mut hasher = blake3::Hasher::new();
    let mut buf = vec![0u8; DIGEST_CHUNK];

    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&buf[..n]);
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(KernelError::Read(e)),
        }
    }

    Ok(Fingerprint(*hasher.finalize().as_bytes()))
}

/// Fingerprint of the file at `path`.
pub fn digest_file(path: impl AsRef<Path>) -> KernelResult<Fingerprint> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| KernelError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    digest_reader(file).map_err(|e| match e {
        KernelError::Read(source) => KernelError::ReadFile {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}
