// src/exec/runner.rs

//! Pluggable command runner abstraction.
//!
//! Workflow steps talk to a `CommandRunner` instead of spawning processes
//! themselves, so tests can swap in a scripted fake while production uses
//! [`SystemRunner`].

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::Context;
use futures::future::BoxFuture;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{ReleaseError, Result};

/// Trait abstracting how external commands (`git`, `npm`, `tar`) are run.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` and return its stdout with trailing
    /// whitespace removed.
    ///
    /// A non-zero exit status is reported as [`ReleaseError::Command`].
    fn run<'a>(&'a self, program: &'a str, args: &'a [&'a str]) -> BoxFuture<'a, Result<String>>;
}

/// Runner backed by `tokio::process::Command`, executing inside `cwd`.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    cwd: PathBuf,
}

impl SystemRunner {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}

impl CommandRunner for SystemRunner {
    fn run<'a>(&'a self, program: &'a str, args: &'a [&'a str]) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let command = display_command(program, args);
            debug!(%command, cwd = %self.cwd.display(), "running command");

            let output = Command::new(program)
                .args(args)
                .current_dir(&self.cwd)
                .stdin(Stdio::inherit())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output()
                .await
                .with_context(|| format!("spawning `{command}`"))?;

            let code = output.status.code().unwrap_or(-1);
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                info!(%command, exit_code = code, "command failed");
                return Err(ReleaseError::Command {
                    command,
                    code,
                    stderr,
                });
            }

            let stdout = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
            debug!(%command, exit_code = code, bytes = stdout.len(), "command finished");
            Ok(stdout)
        })
    }
}

/// Render a command line for logs and error messages.
pub fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
