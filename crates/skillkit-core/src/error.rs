use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkillkitError {
    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error("invalid git URL '{0}': could not derive a repository name")]
    InvalidRepoUrl(String),

    #[error("submodule path already exists: {0} (use --force to update symlinks)")]
    SubmoduleExists(PathBuf),

    #[error("skill link target already exists: {0} (use --force to overwrite)")]
    LinkTargetExists(PathBuf),

    #[error("skill link target exists and is a regular file: {0}")]
    LinkTargetIsFile(PathBuf),

    #[error("source folder does not exist: {0}")]
    SourceMissing(PathBuf),

    #[error("git not found on PATH")]
    GitNotFound,

    #[error("git {command} failed: {stderr}")]
    GitFailed { command: String, stderr: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SkillkitError>;
