use crate::error::Result;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Prevents partial writes from corrupting state files.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Remove a file if it exists. Missing files are not an error.
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Create a symlink at `link` pointing to `target`.
#[cfg(unix)]
pub fn symlink(target: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link)?;
    Ok(())
}

#[cfg(windows)]
pub fn symlink(target: &Path, link: &Path) -> Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)?;
    } else {
        std::os::windows::fs::symlink_file(target, link)?;
    }
    Ok(())
}

/// Compute `target` relative to `base` (both assumed absolute), walking up
/// with `..` where needed. Falls back to `target` as-is when the two share
/// no common prefix (different roots).
pub fn relative_from(target: &Path, base: &Path) -> PathBuf {
    let target_parts: Vec<Component> = target.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    let common = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return target.to_path_buf();
    }

    let mut rel = PathBuf::new();
    for _ in common..base_parts.len() {
        rel.push("..");
    }
    for part in &target_parts[common..] {
        rel.push(part);
    }
    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    rel
}

/// Append `entries` to `root/.gitignore` under a section header, skipping
/// lines already present. Returns the entries that were added.
pub fn append_gitignore_section(
    root: &Path,
    header: &str,
    entries: &[String],
) -> Result<Vec<String>> {
    let gitignore = root.join(".gitignore");
    let existing = if gitignore.exists() {
        std::fs::read_to_string(&gitignore)?
    } else {
        String::new()
    };
    // Exact line match — avoids false positives from substring checks.
    let existing_lines: std::collections::HashSet<&str> = existing.lines().collect();

    let new_entries: Vec<String> = entries
        .iter()
        .filter(|e| !existing_lines.contains(e.as_str()))
        .cloned()
        .collect();
    if new_entries.is_empty() {
        return Ok(new_entries);
    }

    let mut f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&gitignore)?;
    if !existing_lines.contains(header) {
        let sep = if existing.is_empty() || existing.ends_with('\n') {
            ""
        } else {
            "\n"
        };
        writeln!(f, "{sep}{header}")?;
    }
    for entry in &new_entries {
        writeln!(f, "{entry}")?;
    }
    Ok(new_entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_creates_file_and_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/marker.json");
        atomic_write(&path, b"[]").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn remove_if_exists_tolerates_missing() {
        let dir = TempDir::new().unwrap();
        remove_if_exists(&dir.path().join("nope.json")).unwrap();

        let path = dir.path().join("yes.json");
        std::fs::write(&path, b"{}").unwrap();
        remove_if_exists(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn relative_from_sibling_dirs() {
        let rel = relative_from(
            Path::new("/repo/external/tools/pdf"),
            Path::new("/repo/.claude/skills"),
        );
        assert_eq!(rel, PathBuf::from("../../external/tools/pdf"));
    }

    #[test]
    fn relative_from_same_dir() {
        let rel = relative_from(Path::new("/repo/a"), Path::new("/repo"));
        assert_eq!(rel, PathBuf::from("a"));
    }

    #[test]
    fn gitignore_section_appends_once() {
        let dir = TempDir::new().unwrap();
        let entries = vec![".claude/skills".to_string(), "CLAUDE.md".to_string()];
        let added = append_gitignore_section(dir.path(), "# sync", &entries).unwrap();
        assert_eq!(added.len(), 2);

        let added = append_gitignore_section(dir.path(), "# sync", &entries).unwrap();
        assert!(added.is_empty());

        let content = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(content.matches("# sync").count(), 1);
        assert_eq!(content.matches("CLAUDE.md").count(), 1);
    }

    #[test]
    fn gitignore_section_preserves_existing_content() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".gitignore"), "node_modules").unwrap();
        append_gitignore_section(dir.path(), "# sync", &["target".to_string()]).unwrap();
        let content = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert!(content.contains("node_modules"));
        assert!(content.contains("target"));
    }
}
