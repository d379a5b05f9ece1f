//! Thin git wrapper: every invocation runs in the repo root with captured
//! output and is logged for traceability.

use crate::error::{Result, SkillkitError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Captured result of one git invocation.
#[derive(Debug)]
pub struct GitOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Handle on a git repository.
#[derive(Debug, Clone)]
pub struct Git {
    root: PathBuf,
}

impl Git {
    /// Open a wrapper on `root`, verifying git is on PATH.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        which::which("git").map_err(|_| SkillkitError::GitNotFound)?;
        Ok(Self { root: root.into() })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run git with `args`, capturing output. Non-zero exit is reported in
    /// the returned `GitOutput`, not as an error.
    pub fn run(&self, args: &[&str]) -> Result<GitOutput> {
        tracing::debug!(?args, root = %self.root.display(), "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()?;
        let out = GitOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if !out.stdout.trim().is_empty() {
            tracing::debug!(stdout = %out.stdout.trim(), "git stdout");
        }
        if !out.stderr.trim().is_empty() {
            tracing::debug!(stderr = %out.stderr.trim(), "git stderr");
        }
        Ok(out)
    }

    /// Run git with `args`, treating non-zero exit as an error carrying the
    /// captured stderr.
    pub fn run_ok(&self, args: &[&str]) -> Result<GitOutput> {
        let out = self.run(args)?;
        if !out.success {
            return Err(SkillkitError::GitFailed {
                command: args.join(" "),
                stderr: if out.stderr.trim().is_empty() {
                    out.stdout.trim().to_string()
                } else {
                    out.stderr.trim().to_string()
                },
            });
        }
        Ok(out)
    }

    /// Whether the working tree has uncommitted changes. Refreshes the
    /// index first to absorb stat-only changes from symlinked content.
    pub fn has_changes(&self) -> Result<bool> {
        let _ = self.run(&["update-index", "--refresh"])?;
        let out = self.run_ok(&["status", "--porcelain"])?;
        Ok(!out.stdout.trim().is_empty())
    }

    /// Files with unresolved merge conflicts.
    pub fn conflict_files(&self) -> Result<Vec<String>> {
        let out = self.run_ok(&["diff", "--name-only", "--diff-filter=U"])?;
        Ok(out
            .stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect())
    }

    /// `git submodule add <url> <path>`.
    pub fn submodule_add(&self, url: &str, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.run_ok(&["submodule", "add", url, path.as_ref()])?;
        Ok(())
    }

    /// `git submodule update --init -- <path>`.
    pub fn submodule_update_init(&self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.run_ok(&["submodule", "update", "--init", "--", path.as_ref()])?;
        Ok(())
    }

    /// Ensure `.gitmodules` has a path+url entry for `rel_path` so that
    /// `git submodule update` can find the remote. Existing entries win.
    pub fn ensure_gitmodules_entry(&self, rel_path: &str, url: &str) -> Result<()> {
        let key_url = format!("submodule.{rel_path}.url");
        let existing = self.run(&["config", "-f", ".gitmodules", "--get", &key_url])?;
        if existing.success && !existing.stdout.trim().is_empty() {
            return Ok(());
        }
        let key_path = format!("submodule.{rel_path}.path");
        self.run_ok(&["config", "-f", ".gitmodules", &key_path, rel_path])?;
        self.run_ok(&["config", "-f", ".gitmodules", &key_url, url])?;
        self.run_ok(&["submodule", "sync", "--"])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git_available() -> bool {
        which::which("git").is_ok()
    }

    #[test]
    fn open_rejects_when_git_missing_else_succeeds() {
        let dir = TempDir::new().unwrap();
        let result = Git::open(dir.path());
        assert_eq!(result.is_ok(), git_available());
    }

    #[test]
    fn run_ok_surfaces_stderr_on_failure() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let git = Git::open(dir.path()).unwrap();
        // Not a repository — status must fail with a GitFailed error.
        let err = git.run_ok(&["status", "--porcelain"]).unwrap_err();
        match err {
            SkillkitError::GitFailed { command, .. } => {
                assert!(command.starts_with("status"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn has_changes_in_fresh_repo() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let git = Git::open(dir.path()).unwrap();
        git.run_ok(&["init", "-q"]).unwrap();
        assert!(!git.has_changes().unwrap());

        std::fs::write(dir.path().join("file.txt"), "hello").unwrap();
        assert!(git.has_changes().unwrap());
    }
}
