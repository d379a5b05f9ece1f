//! Pending-skill marker store.
//!
//! A single JSON file records skills used in the current session that have
//! not yet received a learning summary. The recorder hook appends to it,
//! the trigger hook consumes it on a satisfaction phrase, and the cleanup
//! hook clears it at session end. Single active session assumed — no
//! locking on the file.

use crate::error::Result;
use crate::io;
use crate::paths;
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One skill use awaiting a learning summary.
///
/// Field names match the marker files written by the earlier Python
/// tooling, so existing markers keep decoding. All fields default so
/// partial legacy entries still parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSkill {
    /// Full skill identifier, possibly namespaced ("suite:pdf").
    #[serde(default)]
    pub skill_name: String,
    /// Leaf name after the last `:`.
    #[serde(default)]
    pub skill_path_name: String,
    /// Session-local creation time, `YYYYMMDD_HHMMSS`.
    #[serde(default)]
    pub timestamp: String,
    /// Project-relative path where the learning summary should be written.
    #[serde(default)]
    pub learnings_path: String,
    /// ISO-8601 UTC creation time.
    #[serde(default)]
    pub created_at: String,
}

impl PendingSkill {
    /// Build a new entry for `skill_name`, stamping paths and times.
    pub fn new(skill_name: &str) -> Self {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        Self {
            skill_name: skill_name.to_string(),
            skill_path_name: paths::leaf_name(skill_name).to_string(),
            learnings_path: paths::learnings_path(skill_name, &timestamp),
            timestamp,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// Display name, tolerating legacy entries with the field missing.
    pub fn display_name(&self) -> &str {
        if self.skill_name.is_empty() {
            "unknown"
        } else {
            &self.skill_name
        }
    }
}

/// Outcome of recording a skill use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A new entry was appended; `pending` is the count after the append.
    Added { pending: usize },
    /// The skill was already pending this session; store untouched.
    Duplicate { pending: usize },
}

impl RecordOutcome {
    pub fn pending(self) -> usize {
        match self {
            Self::Added { pending } | Self::Duplicate { pending } => pending,
        }
    }
}

/// Handle on the marker file. The path is always injected — callers resolve
/// it once (flag, env var, or home default) and pass the store around.
#[derive(Debug, Clone)]
pub struct MarkerStore {
    path: PathBuf,
}

impl MarkerStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location under the user's home directory.
    pub fn default_location() -> Result<Self> {
        Ok(Self::at(paths::default_marker_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the pending entries. Missing file, unreadable file, and
    /// malformed JSON all degrade to an empty list.
    pub fn load(&self) -> Vec<PendingSkill> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => decode(&text),
            Err(_) => Vec::new(),
        }
    }

    /// Record a skill use, deduplicated by `skill_name` in first-seen order.
    pub fn record(&self, skill_name: &str) -> Result<RecordOutcome> {
        let mut pending = self.load();
        if pending.iter().any(|p| p.skill_name == skill_name) {
            return Ok(RecordOutcome::Duplicate {
                pending: pending.len(),
            });
        }
        pending.push(PendingSkill::new(skill_name));
        self.save(&pending)?;
        Ok(RecordOutcome::Added {
            pending: pending.len(),
        })
    }

    /// Consume the store: return whatever was pending and delete the file.
    /// A missing file is not an error. The store is only ever consumed
    /// once — a second take yields nothing.
    pub fn take(&self) -> Result<Vec<PendingSkill>> {
        let pending = self.load();
        io::remove_if_exists(&self.path)?;
        Ok(pending)
    }

    fn save(&self, pending: &[PendingSkill]) -> Result<()> {
        let json = serde_json::to_string_pretty(pending)?;
        io::atomic_write(&self.path, json.as_bytes())
    }
}

/// Decode marker file contents. The canonical schema is a JSON array of
/// entries; a bare object (legacy single-entry form) is accepted on read
/// and treated as a one-element list. Anything else yields an empty list.
fn decode(text: &str) -> Vec<PendingSkill> {
    if let Ok(entries) = serde_json::from_str::<Vec<PendingSkill>>(text) {
        return entries;
    }
    if let Ok(entry) = serde_json::from_str::<PendingSkill>(text) {
        return vec![entry];
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> MarkerStore {
        MarkerStore::at(dir.path().join("marker.json"))
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).load().is_empty());
    }

    #[test]
    fn load_malformed_json_is_empty() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        std::fs::write(s.path(), "not json {").unwrap();
        assert!(s.load().is_empty());
    }

    #[test]
    fn load_legacy_single_object() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        std::fs::write(s.path(), r#"{"skill_name": "pdf"}"#).unwrap();
        let pending = s.load();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].skill_name, "pdf");
        assert_eq!(pending[0].learnings_path, "");
    }

    #[test]
    fn record_keeps_first_seen_order_and_dedups() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        assert_eq!(s.record("a").unwrap(), RecordOutcome::Added { pending: 1 });
        assert_eq!(s.record("b").unwrap(), RecordOutcome::Added { pending: 2 });
        assert_eq!(
            s.record("a").unwrap(),
            RecordOutcome::Duplicate { pending: 2 }
        );
        assert_eq!(s.record("c").unwrap(), RecordOutcome::Added { pending: 3 });

        let pending = s.load();
        let names: Vec<&str> = pending.iter().map(|p| p.skill_name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn record_derives_leaf_and_paths() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.record("ms-office-suite:pdf").unwrap();
        let pending = s.load();
        assert_eq!(pending[0].skill_path_name, "pdf");
        assert!(pending[0]
            .learnings_path
            .starts_with(".claude/skills/pdf/learnings/"));
        assert!(pending[0].learnings_path.ends_with(".md"));
        assert!(!pending[0].created_at.is_empty());
    }

    #[test]
    fn round_trip_is_lossless_and_ordered() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        for name in ["one", "two", "three"] {
            s.record(name).unwrap();
        }
        let first = s.load();
        let text = std::fs::read_to_string(s.path()).unwrap();
        assert_eq!(decode(&text), first);
    }

    #[test]
    fn take_consumes_once() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.record("pdf").unwrap();
        let taken = s.take().unwrap();
        assert_eq!(taken.len(), 1);
        assert!(!s.path().exists());

        // Second take: nothing pending, still no error.
        assert!(s.take().unwrap().is_empty());
    }

    #[test]
    fn display_name_falls_back_for_legacy_entries() {
        let entry = PendingSkill {
            skill_name: String::new(),
            ..PendingSkill::new("x")
        };
        assert_eq!(entry.display_name(), "unknown");
    }
}
