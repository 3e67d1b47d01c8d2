// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{ReleaseError, Result};
use crate::stagger::StaggerOptions;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ReleaseError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;

        let changelog_stagger = stagger_options("stagger.changelog", raw.stagger.changelog)?;
        let release_stagger = stagger_options("stagger.release", raw.stagger.release)?;

        Ok(ConfigFile::new_unchecked(
            raw.github,
            raw.publish,
            raw.tasks,
            changelog_stagger,
            release_stagger,
        ))
    }
}

/// Check the invariants serde can't express.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_changelog(cfg)?;
    validate_publish(cfg)?;
    Ok(())
}

fn validate_changelog(cfg: &RawConfigFile) -> Result<()> {
    let changelog = &cfg.github.changelog;

    if changelog.output_path.trim().is_empty() {
        return Err(ReleaseError::Config(
            "github.changelog.outputPath must not be empty".to_string(),
        ));
    }

    let titles = [
        ("breaking", &changelog.breaking.title),
        ("bug", &changelog.bug.title),
        ("feature", &changelog.feature.title),
    ];
    for (name, title) in titles {
        if title.trim().is_empty() {
            return Err(ReleaseError::Config(format!(
                "github.changelog.{name}.title must not be empty"
            )));
        }
    }

    Ok(())
}

fn validate_publish(cfg: &RawConfigFile) -> Result<()> {
    if let Some(branch) = &cfg.publish.branch {
        if branch.trim().is_empty() {
            return Err(ReleaseError::Config(
                "publish.branch must be a branch name or null".to_string(),
            ));
        }
    }
    Ok(())
}

fn stagger_options(
    key: &str,
    settings: crate::stagger::StaggerSettings,
) -> Result<StaggerOptions> {
    StaggerOptions::try_from(settings)
        .map_err(|e| ReleaseError::Config(format!("{key}: {e}")))
}
