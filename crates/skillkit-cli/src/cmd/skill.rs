//! Skill repository management: vendoring a skills repo as a git submodule
//! and exposing its skill folders under `.claude/skills/`.

use anyhow::Context;
use clap::Subcommand;
use skillkit_core::{io, paths, submodule, SkillkitError};
use skillkit_core::git::Git;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum SkillSubcommand {
    /// Add a git repo as a submodule under external/ and symlink its skills
    AddRepo {
        /// Git URL of the skills repository
        url: String,

        /// Directory for submodules (default: <root>/external)
        #[arg(long)]
        external: Option<PathBuf>,

        /// Directory for skill symlinks (default: <root>/.claude/skills)
        #[arg(long)]
        skills: Option<PathBuf>,

        /// If the submodule path exists, skip the add and only update
        /// symlinks; overwrite existing skill symlinks/dirs
        #[arg(long, short = 'f')]
        force: bool,
    },
}

pub fn run(root: &Path, subcommand: SkillSubcommand) -> anyhow::Result<i32> {
    match subcommand {
        SkillSubcommand::AddRepo {
            url,
            external,
            skills,
            force,
        } => add_repo(root, &url, external.as_deref(), skills.as_deref(), force),
    }
}

fn add_repo(
    root: &Path,
    url: &str,
    external: Option<&Path>,
    skills: Option<&Path>,
    force: bool,
) -> anyhow::Result<i32> {
    let name = submodule::repo_name_from_url(url)
        .ok_or_else(|| SkillkitError::InvalidRepoUrl(url.to_string()))?;

    let external_dir = external
        .map(Path::to_path_buf)
        .unwrap_or_else(|| paths::external_dir(root));
    let skills_dir = skills
        .map(Path::to_path_buf)
        .unwrap_or_else(|| paths::skills_dir(root));

    let submodule_path = external_dir.join(&name);
    let already_exists =
        submodule_path.exists() || std::fs::symlink_metadata(&submodule_path).is_ok();
    if already_exists && !force {
        return Err(SkillkitError::SubmoduleExists(submodule_path).into());
    }

    io::ensure_dir(&external_dir)?;
    let git = Git::open(root)?;

    // Paths handed to git are relative to the repo root where possible.
    let submodule_rel = submodule_path
        .strip_prefix(root)
        .unwrap_or(&submodule_path)
        .to_path_buf();

    if !already_exists {
        println!("Adding submodule {url} at {}", submodule_rel.display());
        git.submodule_add(url, &submodule_rel)
            .context("git submodule add failed")?;
    } else {
        println!("Submodule path already exists; updating and syncing symlinks (--force)");
        let rel_str = submodule_rel.to_string_lossy().replace('\\', "/");
        if let Err(e) = git.ensure_gitmodules_entry(&rel_str, url) {
            tracing::debug!("could not ensure .gitmodules entry: {e}");
        }
        if let Err(e) = git.submodule_update_init(&submodule_rel) {
            tracing::warn!("git submodule update failed: {e}; continuing with existing tree");
        }
    }

    io::ensure_dir(&skills_dir)?;

    let all_with_skill = submodule::skill_dirs(&submodule_path);
    let minimal = submodule::minimal_skill_dirs(&all_with_skill);
    if minimal.is_empty() {
        println!(
            "No directories with {} found; no symlinks created",
            paths::SKILL_FILENAME
        );
        return Ok(0);
    }

    let skills_abs = skills_dir
        .canonicalize()
        .context("cannot resolve skills directory")?;

    for plan in submodule::plan_links(&submodule_path, &name, &minimal) {
        let link_path = skills_dir.join(&plan.name);
        clear_link_target(&link_path, force)?;

        let target_abs = plan
            .target
            .canonicalize()
            .context("cannot resolve skill directory")?;
        let rel = io::relative_from(&target_abs, &skills_abs);
        io::symlink(&rel, &link_path)?;
        println!("Linked {} -> {}", link_path.display(), rel.display());
    }

    Ok(0)
}

/// Make room for a skill symlink. Without `force` any existing entry is an
/// error; with it, symlinks and directories are removed. Plain files are
/// never touched.
fn clear_link_target(link_path: &Path, force: bool) -> anyhow::Result<()> {
    let Ok(meta) = std::fs::symlink_metadata(link_path) else {
        return Ok(());
    };
    if !force {
        return Err(SkillkitError::LinkTargetExists(link_path.to_path_buf()).into());
    }
    if meta.file_type().is_symlink() {
        std::fs::remove_file(link_path)?;
    } else if meta.is_dir() {
        std::fs::remove_dir_all(link_path)?;
    } else {
        return Err(SkillkitError::LinkTargetIsFile(link_path.to_path_buf()).into());
    }
    Ok(())
}
