//! Version store (version.h) parsing and mutation
//!
//! The store is the firmware's version header: three integer definitions
//! plus the composed string definition, each located by a fixed textual
//! pattern. The header also carries include guards and C declarations owned
//! by the firmware, so a rewrite touches only the definition lines and
//! leaves every other byte in place.

use regex_lite::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::record::VersionRecord;

/// Major-component definition name
pub const MAJOR_DEFINE: &str = "FIRMWARE_VERSION_MAJOR";
/// Minor-component definition name
pub const MINOR_DEFINE: &str = "FIRMWARE_VERSION_MINOR";
/// Patch-component definition name
pub const PATCH_DEFINE: &str = "FIRMWARE_VERSION_PATCH";
/// Composed version string definition name
pub const STRING_DEFINE: &str = "FIRMWARE_VERSION_STRING";

/// Error types for version store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("version store not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("could not find {name} in version store")]
    PatternNotMatched { name: &'static str },

    #[error("{name} has an invalid value: '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

/// The version store loaded into memory: parsed record, the composed string
/// as persisted, and the raw header content for in-place rewrites.
#[derive(Debug, Clone)]
pub struct VersionStore {
    path: PathBuf,
    content: String,
    record: VersionRecord,
    composed: String,
}

impl VersionStore {
    /// Load and parse the store, validating that all four definitions are
    /// present. A missing definition is a structured error naming it.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;

        let record = VersionRecord::new(
            parse_int_define(&content, MAJOR_DEFINE)?,
            parse_int_define(&content, MINOR_DEFINE)?,
            parse_int_define(&content, PATCH_DEFINE)?,
        );
        let composed = parse_string_define(&content)?;

        Ok(Self {
            path: path.to_path_buf(),
            content,
            record,
            composed,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed version components
    pub fn record(&self) -> VersionRecord {
        self.record
    }

    /// The composed version string as persisted in the store
    pub fn composed(&self) -> &str {
        &self.composed
    }

    /// Whether the persisted composed string agrees with the components
    pub fn is_consistent(&self) -> bool {
        self.composed == self.record.to_string()
    }

    /// Increment the patch component by one and rewrite the store in place.
    ///
    /// Only the patch definition and the composed string definition change;
    /// the composed string is rebuilt from the recorded major and minor plus
    /// the new patch, so the two representations cannot diverge. The write
    /// is a single whole-file replace with no lock: concurrent invocations
    /// are unsafe and must be serialized by the caller.
    pub fn bump_patch(&mut self) -> Result<(u32, u32), StoreError> {
        let old = self.record;
        let new = old.next_patch();

        let mut content = self.content.clone();
        replace_define(
            &mut content,
            PATCH_DEFINE,
            &int_pattern(PATCH_DEFINE),
            &format!("#define {} {}", PATCH_DEFINE, new.patch),
        )?;
        replace_define(
            &mut content,
            STRING_DEFINE,
            &string_pattern(),
            &format!("#define {} \"{}\"", STRING_DEFINE, new),
        )?;

        fs::write(&self.path, &content)?;

        self.content = content;
        self.record = new;
        self.composed = new.to_string();
        Ok((old.patch, new.patch))
    }
}

fn int_pattern(name: &str) -> String {
    format!(r"#define {}\s+(\d+)", name)
}

fn string_pattern() -> String {
    format!(r#"#define {}\s+"([^"]*)""#, STRING_DEFINE)
}

fn parse_int_define(content: &str, name: &'static str) -> Result<u32, StoreError> {
    let re = Regex::new(&int_pattern(name)).expect("static define pattern");
    let caps = re
        .captures(content)
        .ok_or(StoreError::PatternNotMatched { name })?;
    let value = &caps[1];
    value.parse().map_err(|_| StoreError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

fn parse_string_define(content: &str) -> Result<String, StoreError> {
    let re = Regex::new(&string_pattern()).expect("static define pattern");
    let caps = re.captures(content).ok_or(StoreError::PatternNotMatched {
        name: STRING_DEFINE,
    })?;
    Ok(caps[1].to_string())
}

fn replace_define(
    content: &mut String,
    name: &'static str,
    pattern: &str,
    replacement: &str,
) -> Result<(), StoreError> {
    let re = Regex::new(pattern).expect("static define pattern");
    let m = re
        .find(content)
        .ok_or(StoreError::PatternNotMatched { name })?;
    content.replace_range(m.start()..m.end(), replacement);
    Ok(())
}
