// src/exec/npm.rs

//! `npm` (and `tar`) helpers over a [`CommandRunner`].

use std::collections::HashMap;

use crate::errors::Result;
use crate::exec::CommandRunner;

pub const NPM_REGISTRY: &str = "https://registry.npmjs.org/";

/// Logged-in npm user, or `None` if `npm whoami` fails.
pub async fn whoami(runner: &dyn CommandRunner) -> Option<String> {
    runner
        .run("npm", &["whoami"])
        .await
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Collaborators of a published package and their access level
/// (`"read-only"` / `"read-write"`). `None` if the package isn't in the
/// registry yet.
pub async fn collaborators(
    runner: &dyn CommandRunner,
    package: &str,
) -> Option<HashMap<String, String>> {
    let out = runner
        .run("npm", &["access", "ls-collaborators", package])
        .await
        .ok()?;
    serde_json::from_str(out.trim()).ok()
}

/// Members of an npm team (`org:team`). Empty when the lookup fails.
pub async fn team_members(runner: &dyn CommandRunner, team: &str) -> Vec<String> {
    match runner.run("npm", &["team", "ls", team]).await {
        Ok(out) => serde_json::from_str(out.trim()).unwrap_or_default(),
        Err(_) => Vec::new(),
    }
}

pub async fn run_script(runner: &dyn CommandRunner, script: &str) -> Result<()> {
    runner.run("npm", &["run", script]).await.map(drop)
}

pub async fn pack(runner: &dyn CommandRunner) -> Result<()> {
    runner.run("npm", &["pack"]).await.map(drop)
}

/// `npm publish [tarball]` against the public registry.
pub async fn publish(runner: &dyn CommandRunner, tarball: Option<&str>) -> Result<()> {
    let mut args = vec!["publish"];
    if let Some(tarball) = tarball {
        args.push(tarball);
    }
    args.extend(["--registry", NPM_REGISTRY]);
    runner.run("npm", &args).await.map(drop)
}

/// Update `package.json` to `version` without committing or tagging; the
/// commit step takes care of that.
pub async fn version(runner: &dyn CommandRunner, version: &str) -> Result<()> {
    runner
        .run("npm", &["version", version, "--no-git-tag-version"])
        .await
        .map(drop)
}

/// File paths inside a packed tarball, with the leading `package/` removed.
pub async fn list_tarball(runner: &dyn CommandRunner, tarball: &str) -> Result<Vec<String>> {
    let out = runner.run("tar", &["-tzf", tarball]).await?;
    Ok(out
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| l.strip_prefix("package/").unwrap_or(l).to_string())
        .collect())
}
