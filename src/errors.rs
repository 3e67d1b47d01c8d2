// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid scheduler options: {0}")]
    InvalidSchedule(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Aborted(String),

    #[error("command `{command}` failed (exit code {code}): {stderr}")]
    Command {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("GitHub API error ({status}): {message}")]
    Github { status: u16, message: String },

    #[error("{failed} of {total} releases failed:\n{details}")]
    ReleaseBatch {
        failed: usize,
        total: usize,
        details: String,
    },

    #[error("package.json error: {0}")]
    Manifest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ReleaseError>;
