// src/tasks/publish.rs

//! Publish the package to the npm registry.
//!
//! With `tarPackageConfirmation` on, the package is packed first and its
//! file list shown, so nothing unexpected ends up on the registry.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::errors::{ReleaseError, Result};
use crate::exec::npm;
use crate::manifest::PackageManifest;
use crate::tasks::ReleaseContext;

const PREPUBLISH_SCRIPT: &str = "prepublish";

pub async fn run_publish(ctx: &ReleaseContext<'_>) -> Result<()> {
    let manifest = PackageManifest::load(ctx.root())?;
    info!(package = %manifest.name, version = %manifest.version, "publishing package");

    if !ctx.config.publish.tar_package_confirmation {
        npm::publish(ctx.runner, None).await?;
        info!("package published");
        return Ok(());
    }

    let tarball = manifest.tarball_name();
    let tarball_path = ctx.root().join(&tarball);

    if manifest.has_script(PREPUBLISH_SCRIPT) {
        npm::run_script(ctx.runner, PREPUBLISH_SCRIPT).await?;
    }
    npm::pack(ctx.runner).await?;

    let contents = npm::list_tarball(ctx.runner, &tarball).await?;
    println!("Package contents");
    for file in &contents {
        println!("  {file}");
    }
    println!();

    let accepted = ctx
        .prompt
        .confirm("If you continue you will publish the package on npm. Are you sure?")
        .await?;
    if !accepted {
        remove_tarball(&tarball_path);
        return Err(ReleaseError::Aborted(
            "You refused the generated package. Aborting".to_string(),
        ));
    }

    let published = npm::publish(ctx.runner, Some(&tarball)).await;
    remove_tarball(&tarball_path);
    published?;

    info!("package published");
    Ok(())
}

fn remove_tarball(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "could not delete package tarball");
    }
}
