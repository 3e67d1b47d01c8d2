// src/github/token.rs

//! GitHub token lookup and storage (`~/.smooth-release/gh_token`).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::errors::{ReleaseError, Result};
use crate::prompt::Prompt;

/// Length of a classic GitHub personal access token.
pub const TOKEN_LENGTH: usize = 40;

/// Default token location, if a home directory can be determined.
pub fn default_token_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".smooth-release").join("gh_token"))
}

/// Read a stored token. Missing or empty files yield `None`.
pub fn load_token(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    let token = fs::read_to_string(path)?.trim().to_string();
    Ok((!token.is_empty()).then_some(token))
}

pub fn store_token(path: &Path, token: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, token)?;
    info!(path = %path.display(), "GitHub token saved");
    Ok(())
}

/// Pick the token to use: command line, then stored file, then the rc
/// file's `github.token`.
pub fn resolve_token(
    cli_token: Option<&str>,
    stored: Option<String>,
    config_token: Option<&str>,
) -> Option<String> {
    cli_token
        .map(str::to_string)
        .or(stored)
        .or_else(|| config_token.map(str::to_string))
}

/// Only the length is checked; GitHub prefixes such as `ghp_` vary.
pub fn looks_valid(token: &str) -> bool {
    token.len() == TOKEN_LENGTH
}

/// Ask until a plausible token is entered, then store it at `path`.
///
/// Gives up after `attempts` invalid answers.
pub async fn ask_for_token(
    prompt: &dyn Prompt,
    path: &Path,
    message: Option<&str>,
    attempts: usize,
) -> Result<String> {
    let mut message = message
        .unwrap_or("Could not find any stored GitHub token. Please write here a valid token:")
        .to_string();

    for _ in 0..attempts {
        let token = prompt.question(&message, None).await?;
        if looks_valid(&token) {
            store_token(path, &token)?;
            return Ok(token);
        }
        warn!("entered GitHub token is not a {TOKEN_LENGTH}-character token");
        message = "The given token was invalid! Please write here a valid token:".to_string();
    }

    Err(ReleaseError::Aborted(
        "No valid GitHub token was provided. Aborting.".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_cli_then_stored_then_config() {
        assert_eq!(
            resolve_token(Some("cli"), Some("stored".into()), Some("cfg")).as_deref(),
            Some("cli")
        );
        assert_eq!(
            resolve_token(None, Some("stored".into()), Some("cfg")).as_deref(),
            Some("stored")
        );
        assert_eq!(resolve_token(None, None, Some("cfg")).as_deref(), Some("cfg"));
        assert_eq!(resolve_token(None, None, None), None);
    }

    #[test]
    fn store_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("gh_token");
        assert_eq!(load_token(&path).unwrap(), None);

        store_token(&path, "abc").unwrap();
        assert_eq!(load_token(&path).unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn token_shape() {
        assert!(looks_valid(&"a".repeat(40)));
        assert!(!looks_valid(&"a".repeat(39)));
        assert!(!looks_valid(&"a".repeat(41)));
    }

    #[test]
    fn prefixed_classic_token_is_accepted() {
        let token = format!("ghp_{}", "aB3".repeat(12));
        assert_eq!(token.len(), 40);
        assert!(looks_valid(&token));
    }
}
