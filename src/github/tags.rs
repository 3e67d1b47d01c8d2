// src/github/tags.rs

//! Tag queries that need more than one API call.

use tracing::{debug, warn};

use crate::errors::Result;
use crate::github::api::GithubApi;
use crate::github::types::{DatedTag, Tag};
use crate::stagger::{StaggerOptions, stagger_indexed};

/// Attach the commit date to every tag, fetching the commits through the
/// rate-limited scheduler. The result is sorted oldest first.
///
/// Every lookup runs even if some fail; afterwards each failure is logged
/// and the first one (by tag order) is returned.
pub async fn enrich_tags(
    api: &dyn GithubApi,
    tags: &[Tag],
    options: StaggerOptions,
) -> Result<Vec<DatedTag>> {
    if tags.is_empty() {
        return Ok(Vec::new());
    }

    debug!(count = tags.len(), "fetching commit dates for tags");

    let lookups = tags.iter().map(|tag| {
        move || async move {
            let commit = api.commit(&tag.commit_sha).await?;
            Ok::<_, crate::errors::ReleaseError>(DatedTag {
                name: tag.name.clone(),
                commit_sha: tag.commit_sha.clone(),
                created_at: commit.author_date,
            })
        }
    });

    let mut completed = stagger_indexed(lookups, options).await;
    completed.sort_by_key(|c| c.index);

    let mut dated = Vec::with_capacity(tags.len());
    let mut first_err = None;
    for c in completed {
        match c.outcome {
            Ok(tag) => dated.push(tag),
            Err(e) => {
                warn!(tag = %tags[c.index].name, error = %e, "failed to fetch tag commit");
                first_err.get_or_insert(e);
            }
        }
    }

    if let Some(e) = first_err {
        return Err(e);
    }

    dated.sort_by_key(|t| t.created_at);
    Ok(dated)
}

/// The first version tag in API order (GitHub lists newest first).
pub fn last_version_tag(tags: &[Tag]) -> Option<&Tag> {
    tags.iter().find(|t| t.is_version_tag())
}

pub fn version_tags(tags: &[Tag]) -> Vec<Tag> {
    tags.iter().filter(|t| t.is_version_tag()).cloned().collect()
}
