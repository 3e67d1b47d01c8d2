// src/github/types.rs

//! Domain types for the pieces of the GitHub API the workflow uses.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::{ReleaseError, Result};

/// `owner/name` of the hosting repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    pub owner: String,
    pub name: String,
}

impl Repo {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `remote.origin.url`.
    ///
    /// Accepts `https://github.com/o/r(.git)`, `git@github.com:o/r(.git)` and
    /// `ssh://git@github.com/o/r(.git)`.
    pub fn from_remote_url(url: &str) -> Result<Self> {
        let url = url.trim();
        let path = if let Some(rest) = url.strip_prefix("git@") {
            rest.split_once(':').map(|(_, p)| p)
        } else {
            url.split_once("://")
                .and_then(|(_, rest)| rest.split_once('/'))
                .map(|(_, p)| p)
        };

        let path = path
            .map(|p| p.trim_end_matches('/'))
            .map(|p| p.strip_suffix(".git").unwrap_or(p));

        match path.and_then(|p| p.split_once('/')) {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Repo::new(owner, name))
            }
            _ => Err(ReleaseError::Config(format!(
                "can't read a GitHub owner/repo from remote url \"{url}\""
            ))),
        }
    }

    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }

    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub commit_sha: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, commit_sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_sha: commit_sha.into(),
        }
    }

    /// `v` followed by dot-separated numbers, e.g. `v1.4.0`.
    pub fn is_version_tag(&self) -> bool {
        match self.name.strip_prefix('v') {
            Some(rest) if !rest.is_empty() => rest
                .split('.')
                .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())),
            _ => false,
        }
    }
}

/// A tag together with the author date of the commit it points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedTag {
    pub name: String,
    pub commit_sha: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub sha: String,
    pub author_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub labels: Vec<String>,
    pub closed_at: Option<DateTime<Utc>>,
    /// GitHub lists pull requests in the issues endpoint too.
    pub is_pull_request: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub labels: Vec<String>,
    pub merged_at: Option<DateTime<Utc>>,
}

/// Body of `POST /repos/{owner}/{repo}/releases`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRelease {
    pub tag_name: String,
    pub name: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    Valid,
    Invalid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_remote_urls() {
        let expected = Repo::new("acme", "widgets");
        for url in [
            "https://github.com/acme/widgets.git",
            "https://github.com/acme/widgets",
            "git@github.com:acme/widgets.git",
            "ssh://git@github.com/acme/widgets.git",
        ] {
            assert_eq!(Repo::from_remote_url(url).unwrap(), expected, "{url}");
        }
        assert!(Repo::from_remote_url("not a url").is_err());
    }

    #[test]
    fn version_tags() {
        assert!(Tag::new("v1.2.3", "x").is_version_tag());
        assert!(Tag::new("v10", "x").is_version_tag());
        assert!(!Tag::new("1.2.3", "x").is_version_tag());
        assert!(!Tag::new("v1.2-beta", "x").is_version_tag());
        assert!(!Tag::new("v", "x").is_version_tag());
        assert!(!Tag::new("v1..2", "x").is_version_tag());
    }
}
