// src/tasks/mod.rs

//! The release workflow steps.
//!
//! Each step is an async function over a [`ReleaseContext`], run in this
//! order by [`crate::run`]:
//!
//! 1. [`validations`]: repository and credential checks
//! 2. [`version`]: compute and apply the version bump
//! 3. [`changelog`]: regenerate the changelog from tracker data
//! 4. [`commit`]: commit, tag and push what the previous steps changed
//! 5. [`publish`]: publish the package to the registry
//! 6. [`release`]: create release records on GitHub
//!
//! [`selection`] decides which of them run.

use std::path::{Path, PathBuf};

use crate::config::ConfigFile;
use crate::exec::CommandRunner;
use crate::github::{GithubApi, Repo};
use crate::prompt::Prompt;

pub mod changelog;
pub mod commit;
pub mod publish;
pub mod release;
pub mod selection;
pub mod validations;
pub mod version;

pub use selection::TaskSelection;

/// Everything a workflow step needs: config, repository location and the
/// collaborators that talk to the outside world.
pub struct ReleaseContext<'a> {
    pub config: &'a ConfigFile,
    pub root: PathBuf,
    pub repo: Repo,
    pub runner: &'a dyn CommandRunner,
    pub github: &'a dyn GithubApi,
    pub prompt: &'a dyn Prompt,
    /// Where a replacement GitHub token gets stored, if known.
    pub token_path: Option<PathBuf>,
}

impl ReleaseContext<'_> {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the generated changelog.
    pub fn changelog_path(&self) -> PathBuf {
        let rel = self.config.github.changelog.output_path.trim_start_matches("./");
        self.root.join(rel)
    }
}
