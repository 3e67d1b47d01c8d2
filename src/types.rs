use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Which tracker items feed the changelog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataType {
    Issues,
    PullRequests,
}

impl Default for DataType {
    fn default() -> Self {
        DataType::Issues
    }
}

/// How the package decides which files end up in the published tarball.
///
/// In `.smooth-releaserc` this is either a string (`"files"`, `"npmignore"`)
/// or a boolean (`true` = either mechanism, `false` = don't check).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFilesFilter {
    /// `package.json` must contain a `files` whitelist.
    Files,
    /// The project must contain an `.npmignore` file.
    NpmIgnore,
    /// One of the two must exist.
    Either,
    /// Skip the check entirely.
    Disabled,
}

impl Default for PackageFilesFilter {
    fn default() -> Self {
        PackageFilesFilter::Files
    }
}

impl<'de> Deserialize<'de> for PackageFilesFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(PackageFilesFilter::Either),
            Raw::Flag(false) => Ok(PackageFilesFilter::Disabled),
            Raw::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}

impl FromStr for PackageFilesFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "files" => Ok(PackageFilesFilter::Files),
            "npmignore" => Ok(PackageFilesFilter::NpmIgnore),
            other => Err(format!(
                "invalid packageFilesFilter: {other} (expected \"files\", \"npmignore\", true or false)"
            )),
        }
    }
}

/// Semver component to increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseLevel {
    Major,
    Minor,
    Patch,
}

impl ReleaseLevel {
    pub fn apply(&self, version: &semver::Version) -> semver::Version {
        match self {
            ReleaseLevel::Major => semver::Version::new(version.major + 1, 0, 0),
            ReleaseLevel::Minor => semver::Version::new(version.major, version.minor + 1, 0),
            ReleaseLevel::Patch => {
                semver::Version::new(version.major, version.minor, version.patch + 1)
            }
        }
    }

    /// The highest component that differs between `from` and `to`.
    pub fn between(from: &semver::Version, to: &semver::Version) -> Option<ReleaseLevel> {
        if from.major != to.major {
            Some(ReleaseLevel::Major)
        } else if from.minor != to.minor {
            Some(ReleaseLevel::Minor)
        } else if from.patch != to.patch {
            Some(ReleaseLevel::Patch)
        } else {
            None
        }
    }
}

impl FromStr for ReleaseLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "major" => Ok(ReleaseLevel::Major),
            "minor" => Ok(ReleaseLevel::Minor),
            "patch" => Ok(ReleaseLevel::Patch),
            other => Err(format!("invalid release level: {other}")),
        }
    }
}

impl fmt::Display for ReleaseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReleaseLevel::Major => "major",
            ReleaseLevel::Minor => "minor",
            ReleaseLevel::Patch => "patch",
        };
        f.write_str(s)
    }
}
