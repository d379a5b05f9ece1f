//! Skill-repo submodule plumbing: deriving a repository name from a git
//! URL, discovering skill directories, and planning the symlinks that
//! expose them under `.claude/skills/`.

use crate::paths::SKILL_FILENAME;
use std::path::{Path, PathBuf};

/// Derive a repository name from a git URL by taking the last path segment
/// and stripping a `.git` suffix. Handles `https://host/org/repo`,
/// `git@host:org/repo.git`, and scp-short `git@host:repo` forms. Returns
/// `None` for empty or underivable URLs.
pub fn repo_name_from_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    let base = url.trim_end_matches('/');
    let base = base.strip_suffix(".git").unwrap_or(base);
    if base.is_empty() {
        return None;
    }
    let last = base.rsplit('/').next().unwrap_or(base);
    // git@host:repo (no slash in the remainder) — take the part after ':'
    let last = last.rsplit(':').next().unwrap_or(last);
    if last.is_empty() || last.contains('/') || last.contains('\\') {
        return None;
    }
    Some(last.to_string())
}

/// All directories under `root` (root included, any depth) that contain a
/// `SKILL.md`, sorted by depth then path.
pub fn skill_dirs(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    if !root.is_dir() {
        return out;
    }
    collect_skill_dirs(root, &mut out);
    out.sort_by_key(|p| (p.components().count(), p.clone()));
    out
}

fn collect_skill_dirs(dir: &Path, out: &mut Vec<PathBuf>) {
    if dir.join(SKILL_FILENAME).is_file() {
        out.push(dir.to_path_buf());
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        // Don't follow symlinks — a linked skill tree would recurse forever.
        if path.is_dir() && !path.is_symlink() {
            collect_skill_dirs(&path, out);
        }
    }
}

/// Reduce to the minimal covering set: drop any directory that has an
/// ancestor in the list, so one symlink covers nested skills.
pub fn minimal_skill_dirs(dirs: &[PathBuf]) -> Vec<PathBuf> {
    dirs.iter()
        .filter(|d| !dirs.iter().any(|a| a != *d && d.starts_with(a)))
        .cloned()
        .collect()
}

/// A planned symlink: `.claude/skills/<name>` pointing at `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPlan {
    pub name: String,
    pub target: PathBuf,
}

/// Plan flat symlinks for the minimal skill dirs found under a submodule.
/// The submodule root itself links under `repo_name`; nested skill dirs
/// link under their own leaf name.
pub fn plan_links(submodule: &Path, repo_name: &str, dirs: &[PathBuf]) -> Vec<LinkPlan> {
    let mut plans: Vec<LinkPlan> = dirs
        .iter()
        .map(|dir| {
            if dir == submodule {
                LinkPlan {
                    name: repo_name.to_string(),
                    target: dir.clone(),
                }
            } else {
                LinkPlan {
                    name: dir
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| repo_name.to_string()),
                    target: dir.clone(),
                }
            }
        })
        .collect();
    plans.sort_by_key(|p| p.target.components().count());
    plans
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn repo_name_from_url_returns_last_segment() {
        for (url, expected) in [
            ("git@github.com:austintgriffith/ethskills.git", "ethskills"),
            ("https://github.com/org/repo.git", "repo"),
            ("https://github.com/org/repo", "repo"),
            ("https://github.com/org/repo/", "repo"),
            ("git@host:onlyrepo", "onlyrepo"),
            ("https://example.com/a/b/c", "c"),
        ] {
            assert_eq!(repo_name_from_url(url).as_deref(), Some(expected), "{url}");
        }
    }

    #[test]
    fn repo_name_from_url_rejects_empty_and_junk() {
        for url in ["", "   ", ".git", "/"] {
            assert_eq!(repo_name_from_url(url), None, "{url:?}");
        }
    }

    fn mk_skill(root: &Path, rel: &str) {
        let dir = root.join(rel);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(SKILL_FILENAME), "# skill").unwrap();
    }

    #[test]
    fn skill_dirs_finds_nested_and_sorts_by_depth() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        mk_skill(root, "tools/pdf");
        mk_skill(root, "csv");
        std::fs::create_dir_all(root.join("empty")).unwrap();

        let found = skill_dirs(root);
        assert_eq!(found, vec![root.join("csv"), root.join("tools/pdf")]);
    }

    #[test]
    fn skill_dirs_includes_root_when_marked() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(SKILL_FILENAME), "# skill").unwrap();
        assert_eq!(skill_dirs(tmp.path()), vec![tmp.path().to_path_buf()]);
    }

    #[test]
    fn minimal_drops_covered_descendants() {
        let dirs = vec![
            PathBuf::from("/m/a"),
            PathBuf::from("/m/a/b"),
            PathBuf::from("/m/c"),
        ];
        assert_eq!(
            minimal_skill_dirs(&dirs),
            vec![PathBuf::from("/m/a"), PathBuf::from("/m/c")]
        );
    }

    #[test]
    fn plan_links_root_uses_repo_name() {
        let submodule = PathBuf::from("/repo/external/ethskills");
        let dirs = vec![submodule.clone()];
        let plans = plan_links(&submodule, "ethskills", &dirs);
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].name, "ethskills");
        assert_eq!(plans[0].target, submodule);
    }

    #[test]
    fn plan_links_nested_use_leaf_names() {
        let submodule = PathBuf::from("/repo/external/tools");
        let dirs = vec![submodule.join("skills/pdf"), submodule.join("csv")];
        let plans = plan_links(&submodule, "tools", &dirs);
        let names: Vec<&str> = plans.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["csv", "pdf"]);
    }
}
