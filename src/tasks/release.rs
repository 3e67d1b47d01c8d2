// src/tasks/release.rs

//! GitHub release records for version tags.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::errors::{ReleaseError, Result};
use crate::github::{NewRelease, Repo, Tag, version_tags};
use crate::stagger::stagger_indexed;
use crate::tasks::ReleaseContext;

const DEFAULT_CHANGELOG_BRANCH: &str = "master";

/// Which tags get a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseScope {
    /// Only `v<package.json version>`.
    Latest,
    /// Every version tag.
    All,
}

/// Release payload for `tag`, linking to its changelog section.
///
/// The anchor is the tag without dots followed by the tag's commit date,
/// e.g. `#v120-2024-03-01`.
pub fn release_for(
    repo: &Repo,
    tag: &str,
    date: DateTime<Utc>,
    branch: &str,
    changelog_path: &str,
) -> NewRelease {
    let file = changelog_path.trim_start_matches("./");
    let anchor = format!("{}-{}", tag.replace('.', ""), date.format("%Y-%m-%d"));
    let link = format!("{}/blob/{branch}/{file}#{anchor}", repo.html_url());

    NewRelease {
        tag_name: tag.to_string(),
        name: tag.to_string(),
        body: format!("See [CHANGELOG.md]({link}) for details about this release."),
    }
}

async fn post_release(ctx: &ReleaseContext<'_>, tag: &Tag) -> Result<()> {
    let commit = ctx.github.commit(&tag.commit_sha).await?;
    let release = release_for(
        &ctx.repo,
        &tag.name,
        commit.author_date,
        ctx.config
            .publish
            .branch
            .as_deref()
            .unwrap_or(DEFAULT_CHANGELOG_BRANCH),
        &ctx.config.github.changelog.output_path,
    );
    ctx.github.create_release(&release).await?;
    info!(tag = %tag.name, "release created");
    Ok(())
}

/// Create the release(s) for `scope`.
///
/// `version` is the current `package.json` version, used by
/// [`ReleaseScope::Latest`].
pub async fn run_release(ctx: &ReleaseContext<'_>, scope: ReleaseScope, version: &str) -> Result<()> {
    let tags = ctx.github.tags().await?;

    match scope {
        ReleaseScope::Latest => {
            let wanted = format!("v{version}");
            match tags.iter().find(|t| t.name == wanted) {
                Some(tag) => post_release(ctx, tag).await,
                None => {
                    warn!(tag = %wanted, "no tag for the current version; skipping release");
                    Ok(())
                }
            }
        }
        ReleaseScope::All => release_all(ctx, &version_tags(&tags)).await,
    }
}

/// Release every tag through the scheduler. All releases are attempted;
/// failures are reported together at the end.
pub async fn release_all(ctx: &ReleaseContext<'_>, tags: &[Tag]) -> Result<()> {
    info!(count = tags.len(), "creating releases for every version tag");

    let jobs = tags.iter().map(|tag| move || post_release(ctx, tag));
    let mut completed = stagger_indexed(jobs, ctx.config.release_stagger).await;
    completed.sort_by_key(|c| c.index);

    let failures: Vec<String> = completed
        .into_iter()
        .filter_map(|c| {
            c.outcome.err().map(|e| {
                warn!(tag = %tags[c.index].name, error = %e, "release failed");
                format!("  {}: {e}", tags[c.index].name)
            })
        })
        .collect();

    if failures.is_empty() {
        return Ok(());
    }

    Err(ReleaseError::ReleaseBatch {
        failed: failures.len(),
        total: tags.len(),
        details: failures.join("\n"),
    })
}
