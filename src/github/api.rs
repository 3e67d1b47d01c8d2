// src/github/api.rs

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;

use crate::errors::Result;
use crate::github::types::{Commit, Issue, NewRelease, PullRequest, Tag, TokenStatus};

/// Trait abstracting the GitHub calls the workflow makes.
///
/// Production code uses [`GithubClient`](super::GithubClient); tests provide
/// an in-memory implementation. List methods return every page.
pub trait GithubApi: Send + Sync {
    /// All tags of the repository, in the order GitHub returns them.
    fn tags(&self) -> BoxFuture<'_, Result<Vec<Tag>>>;

    fn commit<'a>(&'a self, sha: &'a str) -> BoxFuture<'a, Result<Commit>>;

    /// Closed issues (pull requests included), optionally only those updated
    /// since the given instant.
    fn closed_issues(&self, since: Option<DateTime<Utc>>) -> BoxFuture<'_, Result<Vec<Issue>>>;

    /// Closed pull requests that were merged.
    fn merged_pull_requests(&self) -> BoxFuture<'_, Result<Vec<PullRequest>>>;

    fn create_release<'a>(&'a self, release: &'a NewRelease) -> BoxFuture<'a, Result<()>>;

    /// Whether the configured token is accepted.
    fn check_token(&self) -> BoxFuture<'_, Result<TokenStatus>>;
}
