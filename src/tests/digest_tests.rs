// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::digest::{digest_bytes, digest_file, digest_reader};
use crate::error::KernelError;
use crate::types::Fingerprint;
use std::io::{self, Read};

const HELLO_FINGERPRINT: &str = "0xea8f163db38682925e4491c5e58d4bb3506ef8c14eb78a86e908c5624a67200f";

/// Yields `data` then fails instead of reporting EOF.
struct FailingReader {
    data: Vec<u8>,
    served: bool,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.served {
            self.served = true;
            let n = self.data.len().min(buf.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            return Ok(n);
        }
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "handle revoked"))
    }
}

/// Interrupts every other read.
struct FlakyReader<'a> {
    inner: &'a [u8],
    interrupt: bool,
}

impl Read for FlakyReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.interrupt = !self.interrupt;
        if self.interrupt {
            return Err(io::Error::new(io::ErrorKind::Interrupted, "signal"));
        }
        let n = self.inner.len().min(buf.len()).min(3);
        buf[..n].copy_from_slice(&self.inner[..n]);
        self.inner = &self.inner[n..];
        Ok(n)
    }
}

#[test]
fn test_hello_known_constant() {
    let fp = digest_bytes(b"hello");
    assert_eq!(fp.to_string(), HELLO_FINGERPRINT);
    assert_eq!(fp.to_hex().len(), 64);
}

#[test]
fn test_identical_bytes_identical_fingerprint() {
    let a = digest_bytes(b"proof of existence");
    let b = digest_bytes(&b"proof of existence".to_vec());
    assert_eq!(a, b);
}

#[test]
fn test_distinct_files_distinct_fingerprints() {
    let dir = tempfile::tempdir().unwrap();
    let p1 = dir.path().join("one.txt");
    let p2 = dir.path().join("two.txt");
    let p3 = dir.path().join("one-copy.txt");
    std::fs::write(&p1, b"first document").unwrap();
    std::fs::write(&p2, b"second document").unwrap();
    std::fs::write(&p3, b"first document").unwrap();

    let f1 = digest_file(&p1).unwrap();
    let f2 = digest_file(&p2).unwrap();
    let f3 = digest_file(&p3).unwrap();

    assert_ne!(f1, f2);
    assert_eq!(f1, f3, "same bytes under a different name must match");
}

#[test]
fn test_reader_matches_bytes_across_chunks() {
    // Larger than one read buffer.
    let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    let streamed = digest_reader(&data[..]).unwrap();
    assert_eq!(streamed, digest_bytes(&data));
}

#[test]
fn test_interrupted_reads_are_retried() {
    let reader = FlakyReader { inner: b"hello", interrupt: false };
    assert_eq!(digest_reader(reader).unwrap(), digest_bytes(b"hello"));
}

#[test]
fn test_read_failure_is_an_error_not_a_hash() {
    let reader = FailingReader { data: b"partial".to_vec(), served: false };
    let result = digest_reader(reader);
    assert!(matches!(result, Err(KernelError::Read(_))));
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.bin");
    match digest_file(&missing) {
        Err(KernelError::ReadFile { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected ReadFile error, got {:?}", other),
    }
}

#[test]
fn test_empty_file_is_a_real_digest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty");
    std::fs::write(&path, b"").unwrap();
    assert_eq!(digest_file(&path).unwrap(), digest_bytes(b""));
}

#[test]
fn test_fingerprint_parse_and_serde() {
    let fp: Fingerprint = HELLO_FINGERPRINT.parse().unwrap();
    let bare: Fingerprint = HELLO_FINGERPRINT.trim_start_matches("0x").parse().unwrap();
    assert_eq!(fp, bare);

    let json = serde_json::to_string(&fp).unwrap();
    assert_eq!(json, format!("\"{}\"", HELLO_FINGERPRINT));
    let back: Fingerprint = serde_json::from_str(&json).unwrap();
    assert_eq!(back, fp);

    assert!("0x1234".parse::<Fingerprint>().is_err());
    assert!("not hex".parse::<Fingerprint>().is_err());
}
