#![allow(dead_code)]

use smooth_release::config::{ConfigFile, RawConfigFile};
use smooth_release::stagger::StaggerSettings;
use smooth_release::types::{DataType, PackageFilesFilter};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the defaults with every interactive confirmation and
/// repository check turned off; tests switch on what they exercise.
pub struct ConfigBuilder {
    config: RawConfigFile,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.publish.branch = None;
        config.publish.in_sync_with_remote = false;
        config.publish.no_uncommitted_changes = false;
        config.publish.no_untracked_files = false;
        config.publish.valid_npm_credentials = false;
        config.publish.valid_github_token = false;
        config.publish.package_files_filter = PackageFilesFilter::Disabled;
        config.publish.npm_version_confirmation = false;
        config.publish.tar_package_confirmation = false;
        Self { config }
    }

    /// The untouched defaults, as if no `.smooth-releaserc` existed.
    pub fn defaults() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_branch(mut self, branch: &str) -> Self {
        self.config.publish.branch = Some(branch.to_string());
        self
    }

    pub fn with_repo_checks(mut self) -> Self {
        self.config.publish.in_sync_with_remote = true;
        self.config.publish.no_uncommitted_changes = true;
        self.config.publish.no_untracked_files = true;
        self
    }

    pub fn with_token_check(mut self) -> Self {
        self.config.publish.valid_github_token = true;
        self
    }

    pub fn with_npm_credentials_check(mut self) -> Self {
        self.config.publish.valid_npm_credentials = true;
        self
    }

    pub fn with_files_filter(mut self, filter: PackageFilesFilter) -> Self {
        self.config.publish.package_files_filter = filter;
        self
    }

    pub fn with_version_confirmation(mut self) -> Self {
        self.config.publish.npm_version_confirmation = true;
        self
    }

    pub fn with_tar_confirmation(mut self) -> Self {
        self.config.publish.tar_package_confirmation = true;
        self
    }

    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.config.github.data_type = data_type;
        self
    }

    pub fn with_output_path(mut self, path: &str) -> Self {
        self.config.github.changelog.output_path = path.to_string();
        self
    }

    pub fn with_ignored_labels(mut self, labels: &[&str]) -> Self {
        self.config.github.changelog.ignored_labels =
            labels.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn with_changelog_stagger(mut self, concurrency_limit: usize, per_second: u32) -> Self {
        self.config.stagger.changelog = StaggerSettings {
            concurrency_limit,
            per_second,
        };
        self
    }

    pub fn with_release_stagger(mut self, concurrency_limit: usize, per_second: u32) -> Self {
        self.config.stagger.release = StaggerSettings {
            concurrency_limit,
            per_second,
        };
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
