use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrStatusError {
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("Git error: {0}")]
    GitError(String),

    #[error("GitHub CLI (gh) not installed. Install from https://cli.github.com")]
    GhNotInstalled,

    #[error("Failed to install signal handler: {0}")]
    Signal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PrStatusError>;
