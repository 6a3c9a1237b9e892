// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Claims and Claim Requests.
//!
//! A [`Claim`] is the chain's record for a fingerprint; this crate only ever
//! holds a read projection of it. A [`ClaimRequest`] is the local, validated
//! instruction to create, revoke or transfer one. Requests are built through
//! [`ClaimRequestBuilder`], which is the only place required fields and the
//! note bound are checked.

use crate::call::{Call, CallParam};
use crate::config::{MAX_NOTE_LEN, POE_PALLET};
use crate::error::{KernelError, KernelResult};
use crate::types::{AccountId, Fingerprint};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Chain-side record keyed by fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub owner: AccountId,
    pub block_number: u64,
    /// Unix milliseconds of the block that created (or last transferred) the claim.
    pub created_at: u64,
    pub note: Option<String>,
}

/// Free-text note attached to a claim.
///
/// Canonical form is UTF-8 text of at most [`MAX_NOTE_LEN`] characters. Longer
/// input is rejected, never truncated. Bytes only appear at the call boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Note(String);

impl Note {
    pub fn new(text: impl Into<String>) -> KernelResult<Self> {
        let text = text.into();
        let len = text.chars().count();
        if len > MAX_NOTE_LEN {
            return Err(KernelError::NoteTooLong { len, max: MAX_NOTE_LEN });
        }
        Ok(Self(text))
    }

    pub fn from_bytes(bytes: &[u8]) -> KernelResult<Self> {
        let text = core::str::from_utf8(bytes).map_err(|_| KernelError::NoteEncoding)?;
        Self::new(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// `None` for the empty note.
    pub fn into_option(self) -> Option<String> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0)
        }
    }
}

impl TryFrom<String> for Note {
    type Error = KernelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Note::new(value)
    }
}

impl From<Note> for String {
    fn from(note: Note) -> Self {
        note.0
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimOp {
    Create,
    Revoke,
    Transfer,
}

impl ClaimOp {
    pub fn call_name(self) -> &'static str {
        match self {
            ClaimOp::Create => "create_claim",
            ClaimOp::Revoke => "revoke_claim",
            ClaimOp::Transfer => "transfer_claim",
        }
    }

    pub fn from_call_name(name: &str) -> Option<Self> {
        match name {
            "create_claim" => Some(ClaimOp::Create),
            "revoke_claim" => Some(ClaimOp::Revoke),
            "transfer_claim" => Some(ClaimOp::Transfer),
            _ => None,
        }
    }
}

impl fmt::Display for ClaimOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.call_name())
    }
}

/// A validated, immutable claim instruction. Consumed once by a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimRequest {
    Create { fingerprint: Fingerprint, note: Note },
    Revoke { fingerprint: Fingerprint },
    Transfer { fingerprint: Fingerprint, destination: AccountId },
}

impl ClaimRequest {
    pub fn builder(op: ClaimOp) -> ClaimRequestBuilder {
        ClaimRequestBuilder::new(op)
    }

    pub fn op(&self) -> ClaimOp {
        match self {
            ClaimRequest::Create { .. } => ClaimOp::Create,
            ClaimRequest::Revoke { .. } => ClaimOp::Revoke,
            ClaimRequest::Transfer { .. } => ClaimOp::Transfer,
        }
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        match self {
            ClaimRequest::Create { fingerprint, .. }
            | ClaimRequest::Revoke { fingerprint }
            | ClaimRequest::Transfer { fingerprint, .. } => fingerprint,
        }
    }

    /// Encodes the request as a pallet call with ordered parameters.
    pub fn to_call(&self) -> Call {
        let fp = CallParam::Bytes(self.fingerprint().as_bytes().to_vec());
        let params = match self {
            ClaimRequest::Create { note, .. } => vec![fp, CallParam::Bytes(note.as_bytes().to_vec())],
            ClaimRequest::Revoke { .. } => vec![fp],
            ClaimRequest::Transfer { destination, .. } => vec![fp, CallParam::Account(*destination)],
        };
        Call::new(POE_PALLET, self.op().call_name(), params)
    }

    /// Decodes a pallet call back into a request, applying the same validation.
    pub fn from_call(call: &Call) -> KernelResult<Self> {
        let op = match ClaimOp::from_call_name(&call.name) {
            Some(op) if call.pallet == POE_PALLET => op,
            _ => {
                return Err(KernelError::UnknownCall {
                    pallet: call.pallet.clone(),
                    name: call.name.clone(),
                })
            }
        };
        let bad = || KernelError::BadParams(op.call_name());
        let fingerprint_of = |bytes: &Vec<u8>| Fingerprint::try_from(bytes.as_slice()).map_err(|_| bad());

        match (op, call.params.as_slice()) {
            (ClaimOp::Create, [CallParam::Bytes(fp), CallParam::Bytes(note)]) => Ok(ClaimRequest::Create {
                fingerprint: fingerprint_of(fp)?,
                note: Note::from_bytes(note)?,
            }),
            (ClaimOp::Revoke, [CallParam::Bytes(fp)]) => Ok(ClaimRequest::Revoke {
                fingerprint: fingerprint_of(fp)?,
            }),
            (ClaimOp::Transfer, [CallParam::Bytes(fp), CallParam::Account(dest)]) => Ok(ClaimRequest::Transfer {
                fingerprint: fingerprint_of(fp)?,
                destination: *dest,
            }),
            _ => Err(bad()),
        }
    }
}

/// Collects form input and validates it for one operation.
#[derive(Debug, Clone)]
pub struct ClaimRequestBuilder {
    op: ClaimOp,
    fingerprint: Option<Fingerprint>,
    note: Option<String>,
    destination: Option<AccountId>,
}

impl ClaimRequestBuilder {
    pub fn new(op: ClaimOp) -> Self {
        Self {
            op,
            fingerprint: None,
            note: None,
            destination: None,
        }
    }

    pub fn fingerprint(mut self, fingerprint: impl Into<Option<Fingerprint>>) -> Self {
        self.fingerprint = fingerprint.into();
        self
    }

    /// Only read for [`ClaimOp::Create`].
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn destination(mut self, destination: impl Into<Option<AccountId>>) -> Self {
        self.destination = destination.into();
        self
    }

    pub fn build(self) -> KernelResult<ClaimRequest> {
        let fingerprint = self.fingerprint.ok_or(KernelError::MissingField("fingerprint"))?;

        match self.op {
            ClaimOp::Create => {
                let note = Note::new(self.note.unwrap_or_default())?;
                Ok(ClaimRequest::Create { fingerprint, note })
            }
            ClaimOp::Revoke => Ok(ClaimRequest::Revoke { fingerprint }),
            ClaimOp::Transfer => {
                let destination = self.destination.ok_or(KernelError::MissingField("destination"))?;
                Ok(ClaimRequest::Transfer { fingerprint, destination })
            }
        }
    }
}
