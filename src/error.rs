// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KernelError {
    /// The byte stream failed before EOF.
    #[error("Read error: {0}")]
    Read(#[from] io::Error),
    #[error("Failed to read {path:?}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Missing required field `{0}`")]
    MissingField(&'static str),
    #[error("Note is {len} characters, limit is {max}")]
    NoteTooLong { len: usize, max: usize },
    #[error("Note is not valid UTF-8")]
    NoteEncoding,
    #[error("Invalid {kind}: {input:?}")]
    InvalidHex { kind: &'static str, input: String },
    #[error("Unknown call {pallet}::{name}")]
    UnknownCall { pallet: String, name: String },
    #[error("Bad parameters for {0}")]
    BadParams(&'static str),
    #[error("Encoding failed: {0}")]
    Encode(String),
    #[error("Signature verification failed")]
    BadSignature,
    #[error("Unknown signer {0:?}")]
    UnknownSigner(String),
}

pub type KernelResult<T> = std::result::Result<T, KernelError>;
