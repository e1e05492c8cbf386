//! Binary identity verification tests
//!
//! The device reports a short digest prefix over its serial channel; these
//! tests drive the host-side check with a scratch artifact standing in for
//! the built ELF.

use std::fs;
use std::path::PathBuf;

use fw_provenance::identity::DEFAULT_MIN_PREFIX_LEN;
use fw_provenance::{artifact_sha256, verify_binary_identity, IdentityError, LaneConfig};
use tempfile::TempDir;

fn write_artifact(dir: &TempDir, contents: &[u8]) -> PathBuf {
    let path = dir.path().join("firmware.elf");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_digest_is_64_lowercase_hex_chars() {
    let dir = TempDir::new().unwrap();
    let path = write_artifact(&dir, &[0u8; 4096]);

    let digest = artifact_sha256(&path).unwrap();
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
}

#[test]
fn test_reported_prefix_passes_when_true_prefix() {
    let dir = TempDir::new().unwrap();
    let path = write_artifact(&dir, b"\x7fELF firmware image");

    let digest = artifact_sha256(&path).unwrap();
    for len in [8, 12, 16, 64] {
        let full =
            verify_binary_identity(&path, &digest[..len], DEFAULT_MIN_PREFIX_LEN).unwrap();
        assert_eq!(full, digest);
    }
}

#[test]
fn test_single_differing_character_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_artifact(&dir, b"\x7fELF firmware image");

    let digest = artifact_sha256(&path).unwrap();
    let mut reported: String = digest[..12].to_string();
    let last = reported.pop().unwrap();
    reported.push(if last == 'f' { 'e' } else { 'f' });

    let err = verify_binary_identity(&path, &reported, DEFAULT_MIN_PREFIX_LEN).unwrap_err();
    match err {
        IdentityError::HashMismatch { expected, reported: got } => {
            // The error carries the true digest for diagnostics
            assert_eq!(expected, digest);
            assert_eq!(got, reported);
        }
        other => panic!("expected HashMismatch, got {:?}", other),
    }
}

#[test]
fn test_stale_artifact_detected() {
    // Rebuilding the artifact after the device reported its digest must
    // fail the check: the report belongs to the old image.
    let dir = TempDir::new().unwrap();
    let path = write_artifact(&dir, b"old image");
    let reported = artifact_sha256(&path).unwrap()[..8].to_string();

    fs::write(&path, b"new image").unwrap();

    assert!(matches!(
        verify_binary_identity(&path, &reported, DEFAULT_MIN_PREFIX_LEN),
        Err(IdentityError::HashMismatch { .. })
    ));
}

#[test]
fn test_min_prefix_length_comes_from_config() {
    let dir = TempDir::new().unwrap();
    let path = write_artifact(&dir, b"\x7fELF firmware image");
    let digest = artifact_sha256(&path).unwrap();

    let config = LaneConfig::from_toml("min_prefix_len = 16").unwrap();

    // 8 chars is a true prefix but below the configured minimum
    let err = verify_binary_identity(&path, &digest[..8], config.min_prefix_len).unwrap_err();
    assert!(matches!(err, IdentityError::PrefixTooShort { min: 16, .. }));

    verify_binary_identity(&path, &digest[..16], config.min_prefix_len).unwrap();
}
