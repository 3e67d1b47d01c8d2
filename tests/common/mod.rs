#![allow(dead_code)]

use std::fs;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use smooth_release::config::ConfigFile;
use smooth_release::github::Repo;
use smooth_release::tasks::ReleaseContext;
use smooth_release_test_utils::fakes::{FakeGithub, FakeRunner, ScriptedPrompt};
use tempfile::TempDir;

pub use smooth_release_test_utils::{init_tracing, with_timeout};

/// Noon UTC on the given day of January 2024.
pub fn jan(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
}

/// A temporary project root holding a `package.json`.
pub fn project(manifest: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("package.json"), manifest).unwrap();
    dir
}

pub fn widgets_project(version: &str) -> TempDir {
    project(&format!(
        r#"{{ "name": "widgets", "version": "{version}", "files": ["lib"] }}"#
    ))
}

pub fn context<'a>(
    config: &'a ConfigFile,
    root: &Path,
    runner: &'a FakeRunner,
    github: &'a FakeGithub,
    prompt: &'a ScriptedPrompt,
) -> ReleaseContext<'a> {
    ReleaseContext {
        config,
        root: root.to_path_buf(),
        repo: Repo::new("acme", "widgets"),
        runner,
        github,
        prompt,
        token_path: None,
    }
}
