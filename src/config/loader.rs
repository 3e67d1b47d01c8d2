// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{ReleaseError, Result};

/// Name of the per-repository config file.
pub const RC_FILE_NAME: &str = ".smooth-releaserc";

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs JSON deserialization (defaults included); semantic
/// checks live in [`load_and_validate`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = serde_json::from_str(&contents).map_err(|e| {
        ReleaseError::Config(format!("\"{}\" is invalid: {e}", path.display()))
    })?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load `<root>/.smooth-releaserc`, or the defaults if the file doesn't
/// exist. An explicit `path` overrides the lookup and must exist.
pub fn load_for_repo(root: &Path, path: Option<&Path>) -> Result<ConfigFile> {
    if let Some(path) = path {
        return load_and_validate(path);
    }

    let rc = default_config_path(root);
    if rc.is_file() {
        debug!(path = %rc.display(), "loading config file");
        load_and_validate(&rc)
    } else {
        debug!(path = %rc.display(), "no config file; using defaults");
        ConfigFile::try_from(RawConfigFile::default())
    }
}

pub fn default_config_path(root: &Path) -> PathBuf {
    root.join(RC_FILE_NAME)
}
