// src/tasks/version.rs

//! Compute the next version and write it to `package.json`.

use std::fmt;

use semver::Version;
use tracing::info;

use crate::errors::{ReleaseError, Result};
use crate::exec::npm;
use crate::github::last_version_tag;
use crate::tasks::ReleaseContext;
use crate::types::ReleaseLevel;

/// The computed release, shown to the user before anything changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub is_beta: bool,
    pub is_breaking: bool,
    pub level: ReleaseLevel,
    pub version: Version,
}

impl fmt::Display for ReleaseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("isBeta", self.is_beta.to_string()),
            ("isBreaking", self.is_breaking.to_string()),
            ("level", self.level.to_string()),
            ("version", self.version.to_string()),
        ];
        let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, value) in rows {
            writeln!(f, "  {key}:{:pad$} {value}", "", pad = width - key.len())?;
        }
        Ok(())
    }
}

/// Pre-1.0 packages never get a major bump from the automatic rule.
pub fn automatic_level(is_beta: bool, is_breaking: bool) -> ReleaseLevel {
    match (is_beta, is_breaking) {
        (true, true) => ReleaseLevel::Minor,
        (false, true) => ReleaseLevel::Major,
        (_, false) => ReleaseLevel::Patch,
    }
}

fn is_beta(current: &Version) -> bool {
    current.major == 0
}

/// Release for an explicit `--npm-version=<version|level>`.
pub fn manual_release(current: &Version, requested: &str) -> Result<ReleaseInfo> {
    let version = match Version::parse(requested.trim().trim_start_matches('v')) {
        Ok(v) => v,
        Err(_) => requested
            .parse::<ReleaseLevel>()
            .map(|level| level.apply(current))
            .map_err(|_| {
                ReleaseError::Validation(format!(
                    "\"{requested}\" is neither a valid version nor one of major, minor, patch"
                ))
            })?,
    };

    if version <= *current {
        return Err(ReleaseError::Validation(format!(
            "You can't pass a version lower than or equal to \"{current}\" (current version)"
        )));
    }

    // `version > current` guarantees a differing component unless only
    // pre-release/build metadata changed.
    let level = ReleaseLevel::between(current, &version).unwrap_or(ReleaseLevel::Patch);

    Ok(ReleaseInfo {
        is_beta: is_beta(current),
        is_breaking: level == ReleaseLevel::Major,
        level,
        version,
    })
}

/// Release derived from what was closed since the last version tag.
pub async fn automatic_release(ctx: &ReleaseContext<'_>, current: &Version) -> Result<ReleaseInfo> {
    let breaking_labels = &ctx.config.github.changelog.breaking.labels;
    let tags = ctx.github.tags().await?;

    let is_breaking = match last_version_tag(&tags) {
        Some(tag) => {
            let commit = ctx.github.commit(&tag.commit_sha).await?;
            let since = commit.author_date;
            info!(tag = %tag.name, %since, "last version tag");

            let unpublished: Vec<_> = ctx
                .github
                .closed_issues(Some(since))
                .await?
                .into_iter()
                .filter(|i| i.closed_at.is_some_and(|closed| closed >= since))
                .collect();

            if unpublished.is_empty() {
                return Err(ReleaseError::Validation(
                    "Can't find any issue closed after last publish. Are you sure there are new features to publish?"
                        .to_string(),
                ));
            }

            unpublished
                .iter()
                .any(|i| i.labels.iter().any(|l| breaking_labels.contains(l)))
        }
        None => ctx
            .github
            .closed_issues(None)
            .await?
            .iter()
            .any(|i| i.labels.iter().any(|l| breaking_labels.contains(l))),
    };

    let beta = is_beta(current);
    let level = automatic_level(beta, is_breaking);
    Ok(ReleaseInfo {
        is_beta: beta,
        is_breaking,
        level,
        version: level.apply(current),
    })
}

/// Compute the release, confirm it and update `package.json`.
///
/// `requested` is the value of `--npm-version`; empty means automatic.
pub async fn run_version(
    ctx: &ReleaseContext<'_>,
    current: &Version,
    requested: &str,
) -> Result<ReleaseInfo> {
    info!(%current, "computing release");

    let release = if requested.trim().is_empty() {
        automatic_release(ctx, current).await?
    } else {
        manual_release(current, requested)?
    };

    println!("Release Info\n{release}");

    if ctx.config.publish.npm_version_confirmation
        && !ctx
            .prompt
            .confirm("If you continue you will update \"package.json\". Are you sure?")
            .await?
    {
        return Err(ReleaseError::Aborted(
            "You refused the computed release. Aborting".to_string(),
        ));
    }

    npm::version(ctx.runner, &release.version.to_string()).await?;
    info!(version = %release.version, "package.json updated");
    Ok(release)
}
