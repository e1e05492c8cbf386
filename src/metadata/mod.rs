//! Build metadata (version.json)
//!
//! The point-in-time record of what a build produced: resolved version,
//! build date, revision-control state, description, and hardware target.
//! Assembly is best-effort; only persistence can fail.

mod record;

pub use record::{
    resolve_store_version, BuildMetadata, MetadataError, DEFAULT_VERSION, FALLBACK_GIT_VERSION,
    METADATA_FILENAME, UNKNOWN_COMMIT,
};
