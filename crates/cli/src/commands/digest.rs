// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;
use poe_kernel::digest::digest_file;
use poe_kernel::Fingerprint;
use std::path::Path;

pub fn run(path: &Path) -> anyhow::Result<Fingerprint> {
    digest_file(path).with_context(|| format!("Cannot digest {}", path.display()))
}
