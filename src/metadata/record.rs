//! The persisted build-metadata record and its assembly.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::LaneConfig;
use crate::git::{self, GitError};
use crate::version::VersionStore;

/// Version used when the store cannot be read
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Sentinel for an unobtainable commit id
pub const UNKNOWN_COMMIT: &str = "unknown";

/// Fallback when no descriptive tag exists
pub const FALLBACK_GIT_VERSION: &str = "1.0.0";

/// Filename of the persisted record
pub const METADATA_FILENAME: &str = "version.json";

/// Error types for metadata persistence
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Build metadata (version.json)
///
/// Regenerated wholesale on every reconciliation; the prior record is
/// fully replaced and no history is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMetadata {
    /// Resolved firmware version
    pub version: String,

    /// Calendar date of the build (ISO 8601)
    pub build_date: NaiveDate,

    /// Short commit id, or "unknown" when git is unavailable
    pub git_commit: String,

    /// `git describe` output, or the "1.0.0" fallback when no tag exists
    pub git_version: String,

    /// Free-text build description
    pub description: String,

    /// Hardware target identifier
    pub target: String,
}

impl BuildMetadata {
    /// Merge independently-obtained inputs into one record.
    ///
    /// The two git results fail independently; a failure substitutes that
    /// field's sentinel without affecting the other field.
    pub fn merge(
        version: String,
        build_date: NaiveDate,
        commit: Result<String, GitError>,
        describe: Result<String, GitError>,
        description: String,
        target: String,
    ) -> Self {
        Self {
            version,
            build_date,
            git_commit: commit.unwrap_or_else(|_| UNKNOWN_COMMIT.to_string()),
            git_version: describe.unwrap_or_else(|_| FALLBACK_GIT_VERSION.to_string()),
            description,
            target,
        }
    }

    /// Assemble a record for the working tree at `repo_dir`.
    ///
    /// An explicit `version` is used verbatim; otherwise the version store
    /// is consulted, falling back to [`DEFAULT_VERSION`] if it cannot be
    /// read. Nothing in assembly is fatal.
    pub fn collect(
        version: Option<String>,
        description: Option<String>,
        config: &LaneConfig,
        repo_dir: &Path,
    ) -> Self {
        let resolved =
            version.unwrap_or_else(|| resolve_store_version(&repo_dir.join(&config.store_path)));

        Self::merge(
            resolved,
            Local::now().date_naive(),
            git::short_commit(repo_dir),
            git::describe(repo_dir),
            description.unwrap_or_else(|| config.description.clone()),
            config.target.clone(),
        )
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Write to `<output_dir>/version.json`, creating the directory and any
    /// missing ancestors first. Fully replaces prior content. Returns the
    /// path written.
    pub fn write_to_dir(&self, output_dir: &Path) -> Result<PathBuf, MetadataError> {
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(METADATA_FILENAME);
        fs::write(&path, self.to_json()?)?;
        Ok(path)
    }

    /// Load a persisted record (the document the OTA server serves)
    pub fn from_file(path: &Path) -> Result<Self, MetadataError> {
        Ok(Self::from_json(&fs::read_to_string(path)?)?)
    }
}

/// Best-effort version resolution from the store. Any store failure yields
/// [`DEFAULT_VERSION`]; this step never fails the reconciliation.
pub fn resolve_store_version(store_path: &Path) -> String {
    match VersionStore::load(store_path) {
        Ok(store) => store.record().to_string(),
        Err(_) => DEFAULT_VERSION.to_string(),
    }
}
