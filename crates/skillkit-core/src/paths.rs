use crate::error::{Result, SkillkitError};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory and file constants
// ---------------------------------------------------------------------------

pub const CLAUDE_DIR: &str = ".claude";
pub const SKILLS_DIR: &str = ".claude/skills";
pub const EXTERNAL_DIR: &str = "external";

/// File that marks a directory as a skill.
pub const SKILL_FILENAME: &str = "SKILL.md";

/// Marker file name, stored under `~/.claude/`.
pub const MARKER_FILENAME: &str = ".pending-skill-learning.json";

/// Folders in the target repo that `sync` populates with symlinks.
pub const SYNC_FOLDERS: &[&str] = &[".claude", ".codex"];

/// Root-level files synced from the source repo alongside the folders.
pub const SYNC_ROOT_FILES: &[&str] = &["CLAUDE.md", "AGENTS.md"];

/// Section header written to `.gitignore` before synced entries.
pub const GITIGNORE_HEADER: &str = "# skillkit sync symlinks";

/// Env var pointing at the source repo that `sync` links from.
pub const SOURCE_DIR_ENV: &str = "SKILLKIT_DIR";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn skills_dir(root: &Path) -> PathBuf {
    root.join(SKILLS_DIR)
}

pub fn external_dir(root: &Path) -> PathBuf {
    root.join(EXTERNAL_DIR)
}

/// Default marker location: `~/.claude/.pending-skill-learning.json`.
pub fn default_marker_path() -> Result<PathBuf> {
    let home = home::home_dir().ok_or(SkillkitError::HomeNotFound)?;
    Ok(home.join(CLAUDE_DIR).join(MARKER_FILENAME))
}

/// Default `sync` source: `$SKILLKIT_DIR/.claude` when the env var is set,
/// else `~/Documents/skillkit/.claude`.
pub fn default_sync_source() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(SOURCE_DIR_ENV) {
        let dir = dir.trim();
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir).join(CLAUDE_DIR));
        }
    }
    let home = home::home_dir().ok_or(SkillkitError::HomeNotFound)?;
    Ok(home.join("Documents").join("skillkit").join(CLAUDE_DIR))
}

/// Leaf name of a possibly namespaced skill: text after the last `:`,
/// or the whole name if there is none ("ms-office-suite:pdf" -> "pdf").
pub fn leaf_name(skill_name: &str) -> &str {
    skill_name.rsplit(':').next().unwrap_or(skill_name)
}

/// Project-relative path where a learning summary for `skill_name` should
/// be written, using `timestamp` (YYYYMMDD_HHMMSS) as the filename.
pub fn learnings_path(skill_name: &str, timestamp: &str) -> String {
    format!(
        "{SKILLS_DIR}/{}/learnings/{timestamp}.md",
        leaf_name(skill_name)
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
