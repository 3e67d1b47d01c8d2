// src/tasks/changelog.rs

//! Changelog generation from closed issues (or merged pull requests).

use std::collections::HashMap;
use std::fs;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::ChangelogSection;
use crate::errors::Result;
use crate::github::{DatedTag, Issue, PullRequest, Repo, enrich_tags};
use crate::tasks::ReleaseContext;
use crate::types::DataType;

/// An issue or pull request as it appears in the changelog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogItem {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub labels: Vec<String>,
    pub closed_at: DateTime<Utc>,
}

impl ChangelogItem {
    fn has_any_label(&self, labels: &[String]) -> bool {
        self.labels.iter().any(|l| labels.contains(l))
    }

    fn from_issue(issue: Issue) -> Option<Self> {
        if issue.is_pull_request {
            return None;
        }
        Some(Self {
            number: issue.number,
            title: issue.title,
            url: issue.html_url,
            labels: issue.labels,
            closed_at: issue.closed_at?,
        })
    }

    fn from_pull_request(pr: PullRequest) -> Option<Self> {
        Some(Self {
            number: pr.number,
            title: pr.title,
            url: pr.html_url,
            labels: pr.labels,
            closed_at: pr.merged_at?,
        })
    }
}

/// Subsection an item is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Breaking,
    Bug,
    Feature,
}

impl ItemKind {
    const ORDER: [ItemKind; 3] = [ItemKind::Breaking, ItemKind::Bug, ItemKind::Feature];

    pub fn classify(item: &ChangelogItem, cfg: &ChangelogSection) -> Self {
        if item.has_any_label(&cfg.breaking.labels) {
            ItemKind::Breaking
        } else if item.has_any_label(&cfg.bug.labels) {
            ItemKind::Bug
        } else {
            ItemKind::Feature
        }
    }

    fn title<'a>(&self, cfg: &'a ChangelogSection) -> &'a str {
        match self {
            ItemKind::Breaking => &cfg.breaking.title,
            ItemKind::Bug => &cfg.bug.title,
            ItemKind::Feature => &cfg.feature.title,
        }
    }
}

/// Items split by the tag that first shipped them.
#[derive(Debug, Default)]
pub struct GroupedItems {
    pub by_tag: HashMap<String, Vec<ChangelogItem>>,
    pub unreleased: Vec<ChangelogItem>,
}

/// Assign each item to the earliest tag created after it was closed.
///
/// `tags` must be sorted oldest first.
pub fn group_by_tag(items: Vec<ChangelogItem>, tags: &[DatedTag]) -> GroupedItems {
    let mut grouped = GroupedItems::default();
    for item in items {
        match tags.iter().find(|t| t.created_at > item.closed_at) {
            Some(tag) => grouped.by_tag.entry(tag.name.clone()).or_default().push(item),
            None => grouped.unreleased.push(item),
        }
    }
    grouped
}

/// One `## [tag]` block. `tag = None` renders the "Unreleased" block.
pub fn render_section(
    repo: &Repo,
    cfg: &ChangelogSection,
    tag: Option<&str>,
    previous: Option<&str>,
    items: &[ChangelogItem],
) -> String {
    let base = repo.html_url();
    let target = tag.unwrap_or("HEAD");

    let mut out = format!(
        "## [{}]({base}/tree/{target})",
        tag.unwrap_or("Unreleased")
    );
    if let Some(previous) = previous {
        out.push_str(&format!(
            "\n[Full Changelog]({base}/compare/{previous}...{target})"
        ));
    }

    for kind in ItemKind::ORDER {
        let lines: Vec<String> = items
            .iter()
            .filter(|i| ItemKind::classify(i, cfg) == kind)
            .map(|i| format!("- {} [#{}]({})", i.title, i.number, i.url))
            .collect();
        if lines.is_empty() {
            continue;
        }
        out.push_str(&format!("\n\n{}\n\n{}", kind.title(cfg), lines.join("\n")));
    }

    out
}

/// The whole document. `tags` must be sorted oldest first; sections are
/// rendered newest first, preceded by "Unreleased" when needed.
pub fn render_changelog(
    repo: &Repo,
    cfg: &ChangelogSection,
    tags: &[DatedTag],
    items: Vec<ChangelogItem>,
) -> String {
    let grouped = group_by_tag(items, tags);
    let newest_first: Vec<&str> = tags.iter().rev().map(|t| t.name.as_str()).collect();

    let mut sections = Vec::with_capacity(newest_first.len() + 1);
    if !grouped.unreleased.is_empty() {
        sections.push(render_section(
            repo,
            cfg,
            None,
            newest_first.first().copied(),
            &grouped.unreleased,
        ));
    }

    for (i, tag) in newest_first.iter().enumerate() {
        let items = grouped.by_tag.get(*tag).map(Vec::as_slice).unwrap_or(&[]);
        sections.push(render_section(
            repo,
            cfg,
            Some(tag),
            newest_first.get(i + 1).copied(),
            items,
        ));
    }

    format!("# Change Log\n\n{}\n", sections.join("\n\n"))
}

/// Fetch the tracker items the changelog is built from, without ignored
/// labels.
pub async fn collect_items(ctx: &ReleaseContext<'_>) -> Result<Vec<ChangelogItem>> {
    let cfg = &ctx.config.github;
    let items: Vec<ChangelogItem> = match cfg.data_type {
        DataType::Issues => ctx
            .github
            .closed_issues(None)
            .await?
            .into_iter()
            .filter_map(ChangelogItem::from_issue)
            .collect(),
        DataType::PullRequests => ctx
            .github
            .merged_pull_requests()
            .await?
            .into_iter()
            .filter_map(ChangelogItem::from_pull_request)
            .collect(),
    };

    Ok(items
        .into_iter()
        .filter(|i| !i.has_any_label(&cfg.changelog.ignored_labels))
        .collect())
}

/// Build the changelog and write it to the configured output path.
pub async fn run_changelog(ctx: &ReleaseContext<'_>) -> Result<String> {
    info!("generating changelog");

    let items = collect_items(ctx).await?;
    info!(count = items.len(), "collected closed items");

    let tags = ctx.github.tags().await?;
    let dated = enrich_tags(ctx.github, &tags, ctx.config.changelog_stagger).await?;
    info!(count = dated.len(), "dated tags");

    let markdown = render_changelog(&ctx.repo, &ctx.config.github.changelog, &dated, items);

    let path = ctx.changelog_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, &markdown)?;
    info!(path = %path.display(), "changelog saved");

    Ok(markdown)
}
