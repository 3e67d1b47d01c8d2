// src/manifest.rs

//! Read-only view of the project's `package.json`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::errors::{ReleaseError, Result};

pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    /// The `files` whitelist, if any.
    #[serde(default)]
    pub files: Option<Vec<String>>,
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
}

impl PackageManifest {
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(MANIFEST_FILE);
        let contents = fs::read_to_string(&path)
            .map_err(|e| ReleaseError::Manifest(format!("reading {}: {e}", path.display())))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).map_err(|e| ReleaseError::Manifest(e.to_string()))
    }

    pub fn semver(&self) -> Result<semver::Version> {
        semver::Version::parse(&self.version).map_err(|e| {
            ReleaseError::Manifest(format!("invalid version \"{}\": {e}", self.version))
        })
    }

    pub fn has_files_whitelist(&self) -> bool {
        self.files.is_some()
    }

    pub fn has_script(&self, name: &str) -> bool {
        self.scripts.contains_key(name)
    }

    /// File name `npm pack` produces: `<name>-<version>.tgz`, with a scope
    /// prefix `@scope/pkg` flattened to `scope-pkg`.
    pub fn tarball_name(&self) -> String {
        let name = self
            .name
            .strip_prefix('@')
            .map(|n| n.replacen('/', "-", 1))
            .unwrap_or_else(|| self.name.clone());
        format!("{name}-{}.tgz", self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_manifest() {
        let m = PackageManifest::parse(r#"{ "name": "pkg", "version": "1.2.3" }"#).unwrap();
        assert_eq!(m.semver().unwrap(), semver::Version::new(1, 2, 3));
        assert!(!m.has_files_whitelist());
        assert!(!m.has_script("prepublish"));
        assert_eq!(m.tarball_name(), "pkg-1.2.3.tgz");
    }

    #[test]
    fn scoped_tarball_name() {
        let m = PackageManifest::parse(
            r#"{ "name": "@acme/widgets", "version": "0.4.0", "files": ["lib"],
                 "scripts": { "prepublish": "make" } }"#,
        )
        .unwrap();
        assert_eq!(m.tarball_name(), "acme-widgets-0.4.0.tgz");
        assert!(m.has_files_whitelist());
        assert!(m.has_script("prepublish"));
    }

    #[test]
    fn missing_version_is_manifest_error() {
        let err = PackageManifest::parse(r#"{ "name": "pkg" }"#).unwrap_err();
        assert!(matches!(err, ReleaseError::Manifest(_)));
    }
}
