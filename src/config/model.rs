// src/config/model.rs

use serde::Deserialize;

use crate::stagger::{StaggerOptions, StaggerSettings};
use crate::types::{DataType, PackageFilesFilter};

/// Top-level configuration as read from `.smooth-releaserc` (JSON).
///
/// Every section and field is optional; whatever the file omits is taken
/// from the defaults below. Arrays in the file replace the default arrays.
///
/// ```json
/// {
///   "github": { "changelog": { "ignoredLabels": ["wontfix"] } },
///   "publish": { "branch": "main", "packageFilesFilter": true },
///   "tasks": { "gh-release-all": false },
///   "stagger": { "changelog": { "concurrencyLimit": 5, "perSecond": 10 } }
/// }
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfigFile {
    pub github: GithubSection,
    pub publish: PublishSection,
    pub tasks: TasksSection,
    pub stagger: StaggerSection,
}

/// Validated configuration handed to the rest of the application.
///
/// Construct through `ConfigFile::try_from(raw)` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub github: GithubSection,
    pub publish: PublishSection,
    pub tasks: TasksSection,
    /// Throttling for the per-tag commit lookups of the changelog.
    pub changelog_stagger: StaggerOptions,
    /// Throttling for `gh-release-all`.
    pub release_stagger: StaggerOptions,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        github: GithubSection,
        publish: PublishSection,
        tasks: TasksSection,
        changelog_stagger: StaggerOptions,
        release_stagger: StaggerOptions,
    ) -> Self {
        Self {
            github,
            publish,
            tasks,
            changelog_stagger,
            release_stagger,
        }
    }
}

/// `github` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GithubSection {
    /// Token stored directly in the rc file. `--token` and the stored token
    /// file take precedence.
    pub token: Option<String>,
    pub data_type: DataType,
    pub changelog: ChangelogSection,
}

impl Default for GithubSection {
    fn default() -> Self {
        Self {
            token: None,
            data_type: DataType::default(),
            changelog: ChangelogSection::default(),
        }
    }
}

/// `github.changelog` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ChangelogSection {
    /// Path of the generated file, relative to the repository root.
    pub output_path: String,
    /// Items carrying any of these labels are left out of the changelog.
    pub ignored_labels: Vec<String>,
    pub breaking: LabelledSection,
    pub bug: LabelledSection,
    pub feature: TitledSection,
}

impl Default for ChangelogSection {
    fn default() -> Self {
        Self {
            output_path: "./CHANGELOG.md".to_string(),
            ignored_labels: vec![
                "DX".to_string(),
                "invalid".to_string(),
                "discussion".to_string(),
            ],
            breaking: LabelledSection {
                title: "#### Breaking:".to_string(),
                labels: vec!["breaking".to_string()],
            },
            bug: LabelledSection {
                title: "#### Fixes (bugs & defects):".to_string(),
                labels: vec!["bug".to_string(), "defect".to_string()],
            },
            feature: TitledSection {
                title: "#### New features:".to_string(),
            },
        }
    }
}

/// A changelog subsection selected by labels.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LabelledSection {
    pub title: String,
    pub labels: Vec<String>,
}

/// The catch-all changelog subsection.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TitledSection {
    pub title: String,
}

/// `publish` section: which validations run and which confirmations are
/// asked before touching the registry.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PublishSection {
    /// Required branch; `null` disables the check.
    pub branch: Option<String>,
    pub in_sync_with_remote: bool,
    pub no_uncommitted_changes: bool,
    pub no_untracked_files: bool,
    pub valid_npm_credentials: bool,
    pub valid_github_token: bool,
    pub package_files_filter: PackageFilesFilter,
    pub npm_version_confirmation: bool,
    pub tar_package_confirmation: bool,
}

impl Default for PublishSection {
    fn default() -> Self {
        Self {
            branch: Some("master".to_string()),
            in_sync_with_remote: true,
            no_uncommitted_changes: true,
            no_untracked_files: true,
            valid_npm_credentials: true,
            valid_github_token: true,
            package_files_filter: PackageFilesFilter::default(),
            npm_version_confirmation: true,
            tar_package_confirmation: true,
        }
    }
}

/// `tasks` section. `None` means "decided by the command line".
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TasksSection {
    pub validations: Option<bool>,
    #[serde(rename = "npm-version")]
    pub npm_version: Option<bool>,
    pub changelog: Option<bool>,
    #[serde(rename = "npm-publish")]
    pub npm_publish: Option<bool>,
    #[serde(rename = "gh-release")]
    pub gh_release: Option<bool>,
    #[serde(rename = "gh-release-all")]
    pub gh_release_all: Option<bool>,
}

impl Default for TasksSection {
    fn default() -> Self {
        Self {
            validations: Some(true),
            npm_version: None,
            changelog: None,
            npm_publish: None,
            gh_release: None,
            gh_release_all: Some(false),
        }
    }
}

/// `stagger` section: throttling for the fan-out GitHub calls.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaggerSection {
    pub changelog: StaggerSettings,
    pub release: StaggerSettings,
}

impl Default for StaggerSection {
    fn default() -> Self {
        Self {
            changelog: StaggerSettings {
                concurrency_limit: 10,
                per_second: 20,
            },
            release: StaggerSettings {
                concurrency_limit: 1,
                per_second: 5,
            },
        }
    }
}
