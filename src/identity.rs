//! Binary identity verification
//!
//! Ties a running firmware image back to the exact build artifact that
//! produced it. The firmware prints the first hex characters of its
//! embedded ELF SHA-256 on boot; the check recomputes the digest of the
//! reference artifact and requires the report to be a true prefix of it.
//! Prefix-of, not equality: the serial channel only carries a short
//! prefix, so collision resistance is bounded by the prefix length.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Default minimum accepted prefix length, in hex characters
pub const DEFAULT_MIN_PREFIX_LEN: usize = 8;

/// Error types for identity verification
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("IO error reading artifact: {0}")]
    Io(#[from] io::Error),

    #[error("reported prefix '{prefix}' is too short ({len} chars, minimum {min})")]
    PrefixTooShort {
        prefix: String,
        len: usize,
        min: usize,
    },

    #[error("reported prefix '{prefix}' is not lowercase hex")]
    InvalidPrefix { prefix: String },

    #[error("artifact SHA256 mismatch: expected {expected}, reported {reported}")]
    HashMismatch { expected: String, reported: String },
}

/// Compute the SHA-256 of a file's full byte content, as lowercase hex.
pub fn artifact_sha256(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)?;

    let mut hasher = Sha256::new();
    hasher.update(&contents);
    Ok(hex::encode(hasher.finalize()))
}

/// Verify a device-reported digest prefix against a reference artifact.
///
/// The claim is valid iff the recomputed digest starts with exactly the
/// reported prefix. Returns the full recomputed digest on success; on
/// mismatch the error carries both the expected digest and the reported
/// prefix for diagnostics.
pub fn verify_binary_identity(
    artifact: &Path,
    reported: &str,
    min_prefix_len: usize,
) -> Result<String, IdentityError> {
    if reported.len() < min_prefix_len {
        return Err(IdentityError::PrefixTooShort {
            prefix: reported.to_string(),
            len: reported.len(),
            min: min_prefix_len,
        });
    }
    if !reported.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')) {
        return Err(IdentityError::InvalidPrefix {
            prefix: reported.to_string(),
        });
    }

    let expected = artifact_sha256(artifact)?;
    if !expected.starts_with(reported) {
        return Err(IdentityError::HashMismatch {
            expected,
            reported: reported.to_string(),
        });
    }
    Ok(expected)
}
