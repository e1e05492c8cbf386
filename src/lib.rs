//! Firmware build-provenance lane
//!
//! Derives, persists, and verifies the identity of firmware builds:
//! a version store kept in the firmware's version header, a reconciled
//! `version.json` build-metadata record, and a SHA-256 prefix check tying
//! a running image back to the exact artifact that produced it.

pub mod config;
pub mod git;
pub mod identity;
pub mod metadata;
pub mod version;

pub use config::{ConfigError, LaneConfig, CONFIG_PATH};
pub use identity::{artifact_sha256, verify_binary_identity, IdentityError};
pub use metadata::{BuildMetadata, MetadataError, DEFAULT_VERSION, METADATA_FILENAME};
pub use version::{StoreError, VersionParseError, VersionRecord, VersionStore};
