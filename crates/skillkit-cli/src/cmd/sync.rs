//! Symlink the contents of a source `.claude` folder (plus CLAUDE.md and
//! AGENTS.md from its repo root) into a target repo, and keep the synced
//! paths out of the target's git history.

use anyhow::Context;
use skillkit_core::link::{reconcile, LinkAction};
use skillkit_core::{io, paths, SkillkitError};
use std::path::{Path, PathBuf};

pub fn run(
    source: Option<&Path>,
    target: Option<&Path>,
    force: bool,
    dry_run: bool,
) -> anyhow::Result<i32> {
    let source = match source {
        Some(p) => p.to_path_buf(),
        None => paths::default_sync_source()?,
    };
    let target = match target {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    if !source.exists() {
        return Err(SkillkitError::SourceMissing(source).into());
    }
    let source = source.canonicalize()?;

    if dry_run {
        println!("[DRY RUN] No changes will be made\n");
    }
    println!("Source: {}", source.display());
    println!("Target: {}\n", target.display());

    let mut source_items: Vec<PathBuf> = std::fs::read_dir(&source)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    source_items.sort();
    if source_items.is_empty() {
        println!("No items found in source folder");
        return Ok(0);
    }

    // Paths to keep out of the target's git history, relative to target.
    let mut gitignore_entries: Vec<String> = Vec::new();

    for folder_name in paths::SYNC_FOLDERS {
        let target_folder = target.join(folder_name);
        println!("Syncing to {}/", target_folder.display());

        if !target_folder.exists() {
            if !dry_run {
                io::ensure_dir(&target_folder)?;
            }
            println!("  [create] {folder_name}/");
        }

        for source_item in &source_items {
            let item_name = source_item
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let target_item = target_folder.join(&item_name);
            let action = reconcile(source_item, &target_item, force, dry_run)?;
            print_action(action, &item_name, source_item, force);
            gitignore_entries.push(format!("{folder_name}/{item_name}"));
        }
        println!();
    }

    // Root files live next to the source .claude folder.
    let source_root = source.parent().unwrap_or(&source);
    println!("Syncing root files to target/");
    for name in paths::SYNC_ROOT_FILES {
        let source_file = source_root.join(name);
        if !source_file.is_file() {
            println!("  [skip] {name} (not found in source)");
            continue;
        }
        let target_file = target.join(name);
        let action = reconcile(&source_file, &target_file, force, dry_run)?;
        print_action(action, name, &source_file, force);
        gitignore_entries.push((*name).to_string());
    }
    println!();

    println!("Updating .gitignore");
    if dry_run {
        for entry in &gitignore_entries {
            println!("  [would add to .gitignore] {entry}");
        }
    } else {
        let added =
            io::append_gitignore_section(&target, paths::GITIGNORE_HEADER, &gitignore_entries)?;
        if added.is_empty() {
            println!("  [skip] .gitignore (already up to date)");
        } else {
            for entry in &added {
                println!("  [add to .gitignore] {entry}");
            }
        }
    }

    println!("\nDone!");
    Ok(0)
}

fn print_action(action: LinkAction, name: &str, source: &Path, force: bool) {
    match action {
        LinkAction::Linked | LinkAction::Updated | LinkAction::Replaced => {
            println!("  [{}] {name} -> {}", action.tag(), source.display());
        }
        LinkAction::AlreadyLinked => {
            println!("  [skip] {name} (already linked)");
        }
        LinkAction::SkippedExisting => {
            let hint = if force { "" } else { ", use --force to overwrite" };
            println!("  [skip] {name} (exists{hint})");
        }
    }
}
