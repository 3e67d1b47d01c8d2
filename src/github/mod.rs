// src/github/mod.rs

//! Hosting-platform integration.
//!
//! - [`api`] defines the `GithubApi` trait the workflow depends on.
//! - [`client`] implements it over the GitHub REST API with `reqwest`.
//! - [`tags`] combines calls (tag dates through the scheduler).
//! - [`token`] finds, validates and stores the access token.
//! - [`types`] holds the domain types.

pub mod api;
pub mod client;
pub mod tags;
pub mod token;
pub mod types;

pub use api::GithubApi;
pub use client::GithubClient;
pub use tags::{enrich_tags, last_version_tag, version_tags};
pub use types::{Commit, DatedTag, Issue, NewRelease, PullRequest, Repo, Tag, TokenStatus};
