// src/tasks/selection.rs

use crate::cli::CliArgs;
use crate::config::TasksSection;

/// Which workflow steps run in this invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSelection {
    pub validations: bool,
    /// `Some("")` = compute the version automatically, `Some(v)` = use the
    /// given version or level.
    pub npm_version: Option<String>,
    pub changelog: bool,
    pub npm_publish: bool,
    pub gh_release: bool,
    pub gh_release_all: bool,
}

impl TaskSelection {
    /// Combine command-line flags with the `tasks` config section.
    ///
    /// - Any task flag on the command line: run exactly the flagged tasks.
    /// - No task flag: run every task the config doesn't turn off
    ///   (`gh-release-all` only when the config turns it on).
    /// - Validations follow the config unless `--no-validations` is given.
    pub fn resolve(args: &CliArgs, tasks: &TasksSection) -> Self {
        let validations = !args.no_validations && tasks.validations.unwrap_or(true);

        if args.has_task_flags() {
            return Self {
                validations,
                npm_version: args.npm_version.clone(),
                changelog: args.changelog,
                npm_publish: args.npm_publish,
                gh_release: args.gh_release,
                gh_release_all: args.gh_release_all,
            };
        }

        Self {
            validations,
            npm_version: tasks.npm_version.unwrap_or(true).then(String::new),
            changelog: tasks.changelog.unwrap_or(true),
            npm_publish: tasks.npm_publish.unwrap_or(true),
            gh_release: tasks.gh_release.unwrap_or(true),
            gh_release_all: tasks.gh_release_all.unwrap_or(false),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.npm_version.is_none()
            && !self.changelog
            && !self.npm_publish
            && !self.gh_release
            && !self.gh_release_all
    }
}
