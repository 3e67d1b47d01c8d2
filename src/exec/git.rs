// src/exec/git.rs

//! Thin `git` helpers over a [`CommandRunner`].

use std::path::PathBuf;

use regex::Regex;

use crate::errors::Result;
use crate::exec::CommandRunner;

pub async fn current_branch(runner: &dyn CommandRunner) -> Result<String> {
    Ok(runner
        .run("git", &["rev-parse", "--abbrev-ref", "HEAD"])
        .await?
        .trim()
        .to_string())
}

pub async fn root_dir(runner: &dyn CommandRunner) -> Result<PathBuf> {
    let out = runner.run("git", &["rev-parse", "--show-toplevel"]).await?;
    Ok(PathBuf::from(out.trim()))
}

pub async fn remote_origin_url(runner: &dyn CommandRunner) -> Result<String> {
    Ok(runner
        .run("git", &["config", "--get", "remote.origin.url"])
        .await?
        .trim()
        .to_string())
}

pub async fn status_porcelain(runner: &dyn CommandRunner) -> Result<String> {
    runner.run("git", &["status", "--porcelain"]).await
}

pub async fn fetch(runner: &dyn CommandRunner) -> Result<()> {
    runner.run("git", &["fetch"]).await.map(drop)
}

pub async fn rev_parse(runner: &dyn CommandRunner, rev: &str) -> Result<String> {
    Ok(runner.run("git", &["rev-parse", rev]).await?.trim().to_string())
}

pub async fn merge_base(runner: &dyn CommandRunner, a: &str, b: &str) -> Result<String> {
    Ok(runner
        .run("git", &["merge-base", a, b])
        .await?
        .trim()
        .to_string())
}

pub async fn add(runner: &dyn CommandRunner, paths: &[&str]) -> Result<()> {
    let mut args = vec!["add"];
    args.extend_from_slice(paths);
    runner.run("git", &args).await.map(drop)
}

pub async fn commit(runner: &dyn CommandRunner, message: &str) -> Result<()> {
    runner.run("git", &["commit", "-m", message]).await.map(drop)
}

pub async fn tag(runner: &dyn CommandRunner, name: &str) -> Result<()> {
    runner.run("git", &["tag", name]).await.map(drop)
}

pub async fn push(runner: &dyn CommandRunner) -> Result<()> {
    runner.run("git", &["push"]).await.map(drop)
}

pub async fn push_tags(runner: &dyn CommandRunner) -> Result<()> {
    runner.run("git", &["push", "--tags"]).await.map(drop)
}

/// Whether `git status --porcelain` output shows staged or unstaged changes
/// to tracked files.
pub fn has_uncommitted_changes(porcelain: &str) -> bool {
    porcelain_matches(porcelain, r"(?m)^([ADRM]| [ADRM])")
}

/// Whether `git status --porcelain` output lists untracked files.
pub fn has_untracked_files(porcelain: &str) -> bool {
    porcelain_matches(porcelain, r"(?m)^\?\?")
}

fn porcelain_matches(porcelain: &str, pattern: &str) -> bool {
    Regex::new(pattern)
        .map(|re| re.is_match(porcelain))
        .unwrap_or(false)
}

/// Relationship between the local branch and its upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    UpToDate,
    Behind,
    Ahead,
    Diverged,
}

impl SyncStatus {
    /// Classify from the `@`, `@{u}` and `merge-base @ @{u}` commit ids.
    pub fn classify(local: &str, remote: &str, base: &str) -> Self {
        if local == remote {
            SyncStatus::UpToDate
        } else if local == base {
            SyncStatus::Behind
        } else if remote == base {
            SyncStatus::Ahead
        } else {
            SyncStatus::Diverged
        }
    }
}

pub async fn sync_status(runner: &dyn CommandRunner) -> Result<SyncStatus> {
    fetch(runner).await?;
    let local = rev_parse(runner, "@").await?;
    let remote = rev_parse(runner, "@{u}").await?;
    let base = merge_base(runner, "@", "@{u}").await?;
    Ok(SyncStatus::classify(&local, &remote, &base))
}
