// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod github;
pub mod logging;
pub mod manifest;
pub mod prompt;
pub mod stagger;
pub mod tasks;
pub mod types;

use std::path::Path;

use semver::Version;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::load_for_repo;
use crate::errors::{ReleaseError, Result};
use crate::exec::{SystemRunner, git};
use crate::github::token::{ask_for_token, default_token_path, load_token, resolve_token};
use crate::github::{GithubClient, Repo};
use crate::manifest::PackageManifest;
use crate::prompt::{AutoConfirm, Prompt, TerminalPrompt};
use crate::tasks::release::ReleaseScope;
use crate::tasks::version::ReleaseInfo;
use crate::tasks::{ReleaseContext, TaskSelection};

/// What a pipeline run changed.
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub release: Option<ReleaseInfo>,
    pub changelog: Option<String>,
    pub tag: Option<String>,
    pub published: bool,
    pub released: Option<ReleaseScope>,
}

/// High-level entry point used by `main.rs`.
///
/// Locates the repository, loads the config, resolves the GitHub token and
/// then runs the selected steps.
pub async fn run(args: CliArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let root = git::root_dir(&SystemRunner::new(&cwd)).await?;
    let runner = SystemRunner::new(&root);
    debug!(root = %root.display(), "repository root");

    let config = load_for_repo(&root, args.config.as_deref().map(Path::new))?;
    let selection = TaskSelection::resolve(&args, &config.tasks);
    if selection.is_empty() {
        info!("no task selected; nothing to do");
        return Ok(());
    }

    let repo = Repo::from_remote_url(&git::remote_origin_url(&runner).await?)?;
    info!(repo = %repo.slug(), "releasing");

    let prompt: Box<dyn Prompt> = if args.yes {
        Box::new(AutoConfirm)
    } else {
        Box::new(TerminalPrompt)
    };

    let token_path = default_token_path();
    let stored = match &token_path {
        Some(path) => load_token(path)?,
        None => None,
    };
    let token = match resolve_token(
        args.token.as_deref(),
        stored,
        config.github.token.as_deref(),
    ) {
        Some(token) => token,
        None => {
            let path = token_path.as_deref().ok_or_else(|| {
                ReleaseError::Config(
                    "no GitHub token given and no home directory to store one".to_string(),
                )
            })?;
            ask_for_token(prompt.as_ref(), path, None, 3).await?
        }
    };

    let github = GithubClient::new(repo.clone(), token)?;

    let ctx = ReleaseContext {
        config: &config,
        root,
        repo,
        runner: &runner,
        github: &github,
        prompt: prompt.as_ref(),
        token_path,
    };

    let report = run_pipeline(&ctx, &selection).await?;
    debug!(?report, "pipeline finished");
    Ok(())
}

/// Run the selected steps in order: validations, version, changelog,
/// commit, publish, release. Stops at the first failing step.
pub async fn run_pipeline(
    ctx: &ReleaseContext<'_>,
    selection: &TaskSelection,
) -> Result<PipelineReport> {
    let manifest = PackageManifest::load(ctx.root())?;
    let current = manifest.semver()?;
    let mut report = PipelineReport::default();

    if selection.validations {
        tasks::validations::run_validations(ctx, selection.npm_publish).await?;
    }

    if let Some(requested) = &selection.npm_version {
        report.release = Some(tasks::version::run_version(ctx, &current, requested).await?);
    }
    let bumped: Option<&Version> = report.release.as_ref().map(|r| &r.version);

    if selection.changelog {
        report.changelog = Some(tasks::changelog::run_changelog(ctx).await?);
    }

    report.tag = tasks::commit::run_commit(ctx, bumped, report.changelog.is_some()).await?;

    if selection.npm_publish {
        tasks::publish::run_publish(ctx).await?;
        report.published = true;
    }

    let scope = if selection.gh_release_all {
        Some(ReleaseScope::All)
    } else if selection.gh_release {
        Some(ReleaseScope::Latest)
    } else {
        None
    };
    if let Some(scope) = scope {
        let version = bumped.unwrap_or(&current).to_string();
        tasks::release::run_release(ctx, scope, &version).await?;
        report.released = Some(scope);
    }

    info!("all done");
    Ok(report)
}
