// src/tasks/validations.rs

//! Pre-release checks on the repository, the package and the credentials.

use tracing::{info, warn};

use crate::errors::{ReleaseError, Result};
use crate::exec::git::{self, SyncStatus};
use crate::exec::npm;
use crate::github::TokenStatus;
use crate::github::token::ask_for_token;
use crate::manifest::PackageManifest;
use crate::tasks::ReleaseContext;
use crate::types::PackageFilesFilter;

const NPMIGNORE: &str = ".npmignore";

fn fail(message: impl Into<String>) -> ReleaseError {
    ReleaseError::Validation(message.into())
}

/// Run every enabled validation, stopping at the first failure.
///
/// npm credentials are only checked when the package is about to be
/// published.
pub async fn run_validations(ctx: &ReleaseContext<'_>, may_publish: bool) -> Result<()> {
    info!("running validations");

    validate_branch(ctx).await?;
    validate_no_uncommitted_changes(ctx).await?;
    validate_no_untracked_files(ctx).await?;
    validate_in_sync_with_remote(ctx).await?;
    validate_package_files_filter(ctx)?;
    validate_github_token(ctx).await?;
    if may_publish {
        validate_npm_credentials(ctx).await?;
    }

    info!("validations passed");
    Ok(())
}

pub async fn validate_branch(ctx: &ReleaseContext<'_>) -> Result<()> {
    let Some(required) = &ctx.config.publish.branch else {
        return Ok(());
    };

    let current = git::current_branch(ctx.runner).await?;
    if &current != required {
        return Err(fail(format!(
            "You must be on \"{required}\" branch to perform this task. Aborting."
        )));
    }
    info!(branch = %current, "branch ok");
    Ok(())
}

pub async fn validate_no_uncommitted_changes(ctx: &ReleaseContext<'_>) -> Result<()> {
    if !ctx.config.publish.no_uncommitted_changes {
        return Ok(());
    }

    let status = git::status_porcelain(ctx.runner).await?;
    if git::has_uncommitted_changes(&status) {
        return Err(fail(
            "You have uncommited changes in your working tree. Aborting.",
        ));
    }
    info!("no uncommitted changes");
    Ok(())
}

pub async fn validate_no_untracked_files(ctx: &ReleaseContext<'_>) -> Result<()> {
    if !ctx.config.publish.no_untracked_files {
        return Ok(());
    }

    let status = git::status_porcelain(ctx.runner).await?;
    if git::has_untracked_files(&status) {
        return Err(fail("You have untracked files in your working tree. Aborting."));
    }
    info!("no untracked files");
    Ok(())
}

pub async fn validate_in_sync_with_remote(ctx: &ReleaseContext<'_>) -> Result<()> {
    if !ctx.config.publish.in_sync_with_remote {
        return Ok(());
    }

    match git::sync_status(ctx.runner).await? {
        SyncStatus::UpToDate => {
            info!("in sync with remote");
            Ok(())
        }
        SyncStatus::Behind => Err(fail(
            "Your local branch is out-of-date. Please pull the latest remote changes. Aborting.",
        )),
        SyncStatus::Ahead => Err(fail(
            "Your local branch is ahead of its remote branch. Please push your local changes. Aborting.",
        )),
        SyncStatus::Diverged => Err(fail(
            "Your local and remote branches have diverged. Please put them in sync. Aborting.",
        )),
    }
}

pub fn validate_package_files_filter(ctx: &ReleaseContext<'_>) -> Result<()> {
    let filter = ctx.config.publish.package_files_filter;
    if filter == PackageFilesFilter::Disabled {
        return Ok(());
    }

    let manifest = PackageManifest::load(ctx.root())?;
    let has_files = manifest.has_files_whitelist();
    let has_npmignore = ctx.root().join(NPMIGNORE).is_file();

    check_files_filter(filter, has_files, has_npmignore)?;
    info!(?filter, "package files filter ok");
    Ok(())
}

/// Pure part of the package-files check.
pub fn check_files_filter(
    filter: PackageFilesFilter,
    has_files: bool,
    has_npmignore: bool,
) -> Result<()> {
    match filter {
        PackageFilesFilter::Disabled => return Ok(()),
        PackageFilesFilter::NpmIgnore if !has_npmignore => {
            return Err(fail("There must be a \".npmignore\" file"));
        }
        PackageFilesFilter::Files if !has_files => {
            return Err(fail("The package.json must contain the \"files\" whitelist"));
        }
        PackageFilesFilter::Either if !has_files && !has_npmignore => {
            return Err(fail(
                "One of \".npmignore\" or \"package.json.files\" must exist",
            ));
        }
        _ => {}
    }

    if has_files && has_npmignore {
        return Err(fail(
            "A project can't have both a \".npmignore\" blacklist and a \"package.json.files\" whitelist",
        ));
    }
    Ok(())
}

/// A rejected token is replaced interactively; the new one only takes
/// effect on the next run.
pub async fn validate_github_token(ctx: &ReleaseContext<'_>) -> Result<()> {
    if !ctx.config.publish.valid_github_token {
        return Ok(());
    }

    match ctx.github.check_token().await? {
        TokenStatus::Valid => {
            info!("GitHub token ok");
            Ok(())
        }
        TokenStatus::Invalid => {
            warn!("stored GitHub token was rejected");
            let Some(path) = &ctx.token_path else {
                return Err(fail("The GitHub token is invalid."));
            };
            ask_for_token(
                ctx.prompt,
                path,
                Some("The stored GitHub token is invalid. Please write here a valid token:"),
                3,
            )
            .await?;
            Err(ReleaseError::Aborted(
                "Token correctly saved. Please restart smooth-release.".to_string(),
            ))
        }
    }
}

pub async fn validate_npm_credentials(ctx: &ReleaseContext<'_>) -> Result<()> {
    if !ctx.config.publish.valid_npm_credentials {
        return Ok(());
    }

    let Some(user) = npm::whoami(ctx.runner).await else {
        return Err(fail("There is no logged in user for \"npm\""));
    };

    let manifest = PackageManifest::load(ctx.root())?;
    let Some(collaborators) = npm::collaborators(ctx.runner, &manifest.name).await else {
        // Not in the registry yet: anyone logged in may publish it.
        info!(%user, "package not yet published; npm credentials ok");
        return Ok(());
    };

    if collaborators.get(&user).map(String::as_str) == Some("read-write") {
        info!(%user, "npm credentials ok");
        return Ok(());
    }

    let teams = collaborators
        .iter()
        .filter(|(name, access)| name.contains(':') && access.as_str() == "read-write")
        .map(|(name, _)| name.as_str());

    for team in teams {
        if npm::team_members(ctx.runner, team).await.contains(&user) {
            info!(%user, %team, "npm credentials ok (team member)");
            return Ok(());
        }
    }

    Err(fail(format!(
        "\"{user}\" does not have write permissions for \"{}\"",
        manifest.name
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_filter_rules() {
        use PackageFilesFilter::*;
        assert!(check_files_filter(Files, true, false).is_ok());
        assert!(check_files_filter(Files, false, true).is_err());
        assert!(check_files_filter(NpmIgnore, false, true).is_ok());
        assert!(check_files_filter(NpmIgnore, true, false).is_err());
        assert!(check_files_filter(Either, false, false).is_err());
        assert!(check_files_filter(Either, false, true).is_ok());
        assert!(check_files_filter(Either, true, true).is_err());
        assert!(check_files_filter(Disabled, true, true).is_ok());
    }
}
