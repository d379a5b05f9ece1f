//! Symlink reconciliation for `sync`: decide and apply a per-item action
//! based on what already sits at the link path.

use crate::error::Result;
use crate::io;
use std::path::Path;

/// What happened (or would happen, under dry-run) for one sync item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAction {
    /// Fresh symlink created.
    Linked,
    /// Symlink already points at the source.
    AlreadyLinked,
    /// Existing symlink replaced (`force`).
    Updated,
    /// Existing real file/dir removed and replaced (`force`).
    Replaced,
    /// Something else is in the way and `force` was not given.
    SkippedExisting,
}

impl LinkAction {
    /// Tag used in per-item output lines.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Linked => "link",
            Self::AlreadyLinked => "skip",
            Self::Updated => "update",
            Self::Replaced => "replace",
            Self::SkippedExisting => "skip",
        }
    }
}

/// Reconcile a symlink at `link` pointing to `source`.
///
/// Existing state decides the action: an up-to-date symlink is left alone;
/// a stale symlink or real entry is only replaced with `force`. With
/// `dry_run` the decision is returned without touching the filesystem.
pub fn reconcile(source: &Path, link: &Path, force: bool, dry_run: bool) -> Result<LinkAction> {
    let link_meta = std::fs::symlink_metadata(link);
    if let Ok(meta) = link_meta {
        if meta.file_type().is_symlink() {
            if let (Ok(current), Ok(wanted)) = (std::fs::canonicalize(link), source.canonicalize())
            {
                if current == wanted {
                    return Ok(LinkAction::AlreadyLinked);
                }
            }
            if !force {
                return Ok(LinkAction::SkippedExisting);
            }
            if !dry_run {
                std::fs::remove_file(link)?;
                io::symlink(source, link)?;
            }
            return Ok(LinkAction::Updated);
        }
        // Real file or directory in the way.
        if !force {
            return Ok(LinkAction::SkippedExisting);
        }
        if !dry_run {
            if meta.is_dir() {
                std::fs::remove_dir_all(link)?;
            } else {
                std::fs::remove_file(link)?;
            }
            io::symlink(source, link)?;
        }
        return Ok(LinkAction::Replaced);
    }

    if !dry_run {
        io::symlink(source, link)?;
    }
    Ok(LinkAction::Linked)
}
