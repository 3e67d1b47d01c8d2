// src/config/mod.rs

//! Configuration loading and validation.
//!
//! Responsibilities:
//! - Define the JSON-backed data model and its defaults (`model.rs`).
//! - Load `.smooth-releaserc` from disk (`loader.rs`).
//! - Validate what serde can't express (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{RC_FILE_NAME, load_and_validate, load_for_repo, load_from_path};
pub use model::{
    ChangelogSection, ConfigFile, GithubSection, LabelledSection, PublishSection, RawConfigFile,
    StaggerSection, TasksSection, TitledSection,
};
pub use validate::validate_config;
