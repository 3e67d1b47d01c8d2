// src/github/client.rs

//! `reqwest`-backed implementation of [`GithubApi`].

use anyhow::Context;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, LINK, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::{ReleaseError, Result};
use crate::github::api::GithubApi;
use crate::github::types::{Commit, Issue, NewRelease, PullRequest, Repo, Tag, TokenStatus};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const PER_PAGE: &str = "100";

pub struct GithubClient {
    http: Client,
    base_url: String,
    repo: Repo,
    token: String,
}

impl GithubClient {
    pub fn new(repo: Repo, token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(repo, token, DEFAULT_API_URL)
    }

    /// Point the client at a different API root (GitHub Enterprise).
    pub fn with_base_url(
        repo: Repo,
        token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            repo,
            token: token.into(),
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}{}", self.base_url, self.repo.slug(), path)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(USER_AGENT, "smooth-release")
            .header(ACCEPT, "application/vnd.github+json")
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self.request(reqwest::Method::GET, url).send().await.with_context(|| format!("GET {url}"))?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await.with_context(|| format!("decoding response of GET {url}"))?)
    }

    /// GET every page of a list endpoint by following `Link: rel="next"`.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut resp = self
            .request(reqwest::Method::GET, url)
            .query(query)
            .query(&[("per_page", PER_PAGE)])
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        let mut page = 1;

        loop {
            resp = check_status(resp).await?;
            let next = next_page_url(resp.headers());
            let batch: Vec<T> = resp
                .json()
                .await
                .with_context(|| format!("decoding page {page} of {url}"))?;
            debug!(url, page, count = batch.len(), "fetched page");
            items.extend(batch);

            let Some(next) = next else {
                break;
            };
            page += 1;
            resp = self
                .request(reqwest::Method::GET, &next)
                .send()
                .await
                .with_context(|| format!("GET {next}"))?;
        }

        Ok(items)
    }
}

impl GithubApi for GithubClient {
    fn tags(&self) -> BoxFuture<'_, Result<Vec<Tag>>> {
        Box::pin(async move {
            let raw: Vec<RawTag> = self.get_all_pages(&self.repo_url("/tags"), &[]).await?;
            Ok(raw.into_iter().map(Tag::from).collect())
        })
    }

    fn commit<'a>(&'a self, sha: &'a str) -> BoxFuture<'a, Result<Commit>> {
        Box::pin(async move {
            let raw: RawCommit = self.get_json(&self.repo_url(&format!("/commits/{sha}"))).await?;
            Ok(Commit {
                sha: raw.sha,
                author_date: raw.commit.author.date,
            })
        })
    }

    fn closed_issues(&self, since: Option<DateTime<Utc>>) -> BoxFuture<'_, Result<Vec<Issue>>> {
        Box::pin(async move {
            let mut query = vec![("state", "closed".to_string())];
            if let Some(since) = since {
                query.push(("since", since.to_rfc3339()));
            }
            let raw: Vec<RawIssue> = self.get_all_pages(&self.repo_url("/issues"), &query).await?;
            Ok(raw.into_iter().map(Issue::from).collect())
        })
    }

    fn merged_pull_requests(&self) -> BoxFuture<'_, Result<Vec<PullRequest>>> {
        Box::pin(async move {
            let query = [("state", "closed".to_string())];
            let raw: Vec<RawPullRequest> =
                self.get_all_pages(&self.repo_url("/pulls"), &query).await?;
            Ok(raw
                .into_iter()
                .map(PullRequest::from)
                .filter(|pr| pr.merged_at.is_some())
                .collect())
        })
    }

    fn create_release<'a>(&'a self, release: &'a NewRelease) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let url = self.repo_url("/releases");
            let resp = self
                .request(reqwest::Method::POST, &url)
                .json(release)
                .send()
                .await
                .with_context(|| format!("POST {url}"))?;

            match check_status(resp).await {
                Ok(_) => {
                    debug!(tag = %release.tag_name, "POST release ok");
                    Ok(())
                }
                Err(ReleaseError::Github { status: 422, message })
                    if message == "Validation Failed" =>
                {
                    Err(ReleaseError::Github {
                        status: 422,
                        message: format!("Release \"{}\" already exists", release.tag_name),
                    })
                }
                Err(e) => Err(e),
            }
        })
    }

    fn check_token(&self) -> BoxFuture<'_, Result<TokenStatus>> {
        Box::pin(async move {
            let url = format!("{}/user", self.base_url);
            let resp = self
                .request(reqwest::Method::GET, &url)
                .send()
                .await
                .with_context(|| format!("GET {url}"))?;
            if resp.status() == StatusCode::UNAUTHORIZED {
                return Ok(TokenStatus::Invalid);
            }
            check_status(resp).await?;
            Ok(TokenStatus::Valid)
        })
    }
}

async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or(body);
    Err(ReleaseError::Github {
        status: status.as_u16(),
        message,
    })
}

fn next_page_url(headers: &HeaderMap) -> Option<String> {
    headers
        .get(LINK)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_next_link)
}

/// Extract the `rel="next"` target from a `Link` header value.
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        let is_next = params
            .split(';')
            .any(|p| p.trim() == r#"rel="next""#);
        if !is_next {
            return None;
        }
        let target = target.trim();
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

// Wire formats.

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct RawTag {
    name: String,
    commit: RawSha,
}

#[derive(Deserialize)]
struct RawSha {
    sha: String,
}

impl From<RawTag> for Tag {
    fn from(raw: RawTag) -> Self {
        Tag::new(raw.name, raw.commit.sha)
    }
}

#[derive(Deserialize)]
struct RawCommit {
    sha: String,
    commit: RawCommitDetail,
}

#[derive(Deserialize)]
struct RawCommitDetail {
    author: RawAuthor,
}

#[derive(Deserialize)]
struct RawAuthor {
    date: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawLabel {
    name: String,
}

#[derive(Deserialize)]
struct RawIssue {
    number: u64,
    title: String,
    html_url: String,
    #[serde(default)]
    labels: Vec<RawLabel>,
    closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

impl From<RawIssue> for Issue {
    fn from(raw: RawIssue) -> Self {
        Issue {
            number: raw.number,
            title: raw.title,
            html_url: raw.html_url,
            labels: raw.labels.into_iter().map(|l| l.name).collect(),
            closed_at: raw.closed_at,
            is_pull_request: raw.pull_request.is_some(),
        }
    }
}

#[derive(Deserialize)]
struct RawPullRequest {
    number: u64,
    title: String,
    html_url: String,
    #[serde(default)]
    labels: Vec<RawLabel>,
    merged_at: Option<DateTime<Utc>>,
}

impl From<RawPullRequest> for PullRequest {
    fn from(raw: RawPullRequest) -> Self {
        PullRequest {
            number: raw.number,
            title: raw.title,
            html_url: raw.html_url,
            labels: raw.labels.into_iter().map(|l| l.name).collect(),
            merged_at: raw.merged_at,
        }
    }
}
