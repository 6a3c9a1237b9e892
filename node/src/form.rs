// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Headless claim form: the state behind the file picker, note and
//! destination inputs, and the status line.

use crate::gateway::SubmissionGateway;
use poe_kernel::digest::{digest_bytes, digest_file};
use poe_kernel::keyring::resolve_account;
use poe_kernel::{ClaimOp, ClaimRequest, Fingerprint, KernelResult, Keypair, SubmissionStatus};
use std::path::Path;

#[derive(Debug, Default)]
pub struct ClaimForm {
    digest: Option<Fingerprint>,
    note: String,
    destination: String,
    status: SubmissionStatus,
    last_request: Option<ClaimRequest>,
}

impl ClaimForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Digests the chosen file. A read error clears the digest, so a stale
    /// selection is never submitted.
    pub fn choose_file(&mut self, path: impl AsRef<Path>) -> KernelResult<Fingerprint> {
        let result = digest_file(path);
        self.digest = result.as_ref().ok().copied();
        result
    }

    pub fn choose_bytes(&mut self, bytes: &[u8]) -> Fingerprint {
        let fingerprint = digest_bytes(bytes);
        self.digest = Some(fingerprint);
        fingerprint
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    pub fn set_destination(&mut self, destination: impl Into<String>) {
        self.destination = destination.into();
    }

    pub fn digest(&self) -> Option<Fingerprint> {
        self.digest
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    /// Builds the request the current form contents describe.
    pub fn request(&self, op: ClaimOp) -> KernelResult<ClaimRequest> {
        let destination = match self.destination.trim() {
            "" => None,
            input => Some(resolve_account(input)?),
        };
        ClaimRequest::builder(op)
            .fingerprint(self.digest)
            .note(self.note.clone())
            .destination(destination)
            .build()
    }

    /// Validates, submits and waits for a terminal status. Validation errors
    /// return before anything reaches the gateway.
    pub async fn submit(
        &mut self,
        op: ClaimOp,
        gateway: &SubmissionGateway,
        signer: &Keypair,
    ) -> KernelResult<SubmissionStatus> {
        let request = self.request(op)?;
        self.last_request = Some(request.clone());
        self.status = SubmissionStatus::Broadcasting;

        let submission = gateway.submit(request, signer).await;
        self.status = submission.outcome().await;
        Ok(self.status.clone())
    }

    pub fn status_line(&self) -> String {
        self.status.to_string()
    }

    /// Confirmation shown after a create is finalized.
    pub fn success_message(&self) -> Option<String> {
        match (&self.status, &self.last_request) {
            (SubmissionStatus::Finalized { .. }, Some(ClaimRequest::Create { fingerprint, note })) => Some(format!(
                "You have successfully claimed file with hash {} with note {}.",
                fingerprint, note
            )),
            _ => None,
        }
    }
}
