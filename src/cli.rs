// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `smooth-release`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "smooth-release",
    version,
    about = "Validate, version, changelog, publish and release a package in one go.",
    long_about = None
)]
pub struct CliArgs {
    /// Bump the version in package.json.
    ///
    /// Without a value the bump is computed from closed issues; otherwise
    /// pass an explicit version (`1.4.0`) or a level (`major`, `minor`,
    /// `patch`).
    #[arg(
        long,
        value_name = "VERSION|LEVEL",
        num_args = 0..=1,
        default_missing_value = "",
        require_equals = true
    )]
    pub npm_version: Option<String>,

    /// Regenerate the changelog from GitHub data.
    #[arg(long)]
    pub changelog: bool,

    /// Publish the package on npm.
    #[arg(long)]
    pub npm_publish: bool,

    /// Create a GitHub release for the current version tag.
    #[arg(long)]
    pub gh_release: bool,

    /// Create GitHub releases for every version tag.
    #[arg(long)]
    pub gh_release_all: bool,

    /// Skip the repository validations.
    #[arg(long)]
    pub no_validations: bool,

    /// GitHub token to use instead of the stored one.
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Path to the config file (JSON).
    ///
    /// Default: `.smooth-releaserc` at the repository root, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Answer "yes" to every confirmation.
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SMOOTH_RELEASE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

impl CliArgs {
    /// Whether any workflow step was requested explicitly.
    pub fn has_task_flags(&self) -> bool {
        self.npm_version.is_some()
            || self.changelog
            || self.npm_publish
            || self.gh_release
            || self.gh_release_all
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
