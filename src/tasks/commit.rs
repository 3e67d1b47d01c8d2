// src/tasks/commit.rs

use semver::Version;
use tracing::info;

use crate::errors::Result;
use crate::exec::git;
use crate::manifest::MANIFEST_FILE;
use crate::tasks::ReleaseContext;

const CHANGELOG_ONLY_MESSAGE: &str = "Update CHANGELOG.md";

/// Commit message and tag for what the earlier steps changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPlan {
    pub message: String,
    pub tag: Option<String>,
}

impl CommitPlan {
    /// `None` when neither the version nor the changelog changed.
    pub fn new(bumped: Option<&Version>, changelog_updated: bool) -> Option<Self> {
        match bumped {
            Some(version) => Some(Self {
                message: version.to_string(),
                tag: Some(format!("v{version}")),
            }),
            None if changelog_updated => Some(Self {
                message: CHANGELOG_ONLY_MESSAGE.to_string(),
                tag: None,
            }),
            None => None,
        }
    }
}

/// Stage the manifest and changelog, commit, tag the new version and push.
///
/// Returns the created tag, if any.
pub async fn run_commit(
    ctx: &ReleaseContext<'_>,
    bumped: Option<&Version>,
    changelog_updated: bool,
) -> Result<Option<String>> {
    let Some(plan) = CommitPlan::new(bumped, changelog_updated) else {
        info!("nothing to commit");
        return Ok(None);
    };

    let changelog = ctx.changelog_path();
    let changelog = changelog
        .strip_prefix(ctx.root())
        .unwrap_or(&changelog)
        .to_string_lossy()
        .into_owned();

    let mut paths = vec![MANIFEST_FILE];
    if changelog_updated {
        paths.push(changelog.as_str());
    }
    git::add(ctx.runner, &paths).await?;
    git::commit(ctx.runner, &plan.message).await?;
    info!(message = %plan.message, "created commit");

    if let Some(tag) = &plan.tag {
        git::tag(ctx.runner, tag).await?;
        info!(%tag, "created tag");
    }

    git::push(ctx.runner).await?;
    if plan.tag.is_some() {
        git::push_tags(ctx.runner).await?;
    }
    info!("pushed to remote");

    Ok(plan.tag)
}
