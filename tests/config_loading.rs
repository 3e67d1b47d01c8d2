// tests/config_loading.rs

use std::fs;
use std::io::Write;

use smooth_release::config::{RC_FILE_NAME, load_and_validate, load_for_repo};
use smooth_release::errors::ReleaseError;
use smooth_release::types::{DataType, PackageFilesFilter};
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn config_error(contents: &str) -> String {
    let file = write_config(contents);
    match load_and_validate(file.path()) {
        Err(ReleaseError::Config(msg)) => msg,
        Err(e) => panic!("Expected Config error, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn partial_file_keeps_defaults_for_the_rest() {
    let file = write_config(
        r#"{
            "github": { "dataType": "pullRequests", "changelog": { "ignoredLabels": ["wontfix"] } },
            "publish": { "branch": "main", "packageFilesFilter": "npmignore" },
            "stagger": { "changelog": { "concurrencyLimit": 4, "perSecond": 8 } }
        }"#,
    );
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.github.data_type, DataType::PullRequests);
    assert_eq!(cfg.github.changelog.ignored_labels, vec!["wontfix"]);
    assert_eq!(cfg.github.changelog.output_path, "./CHANGELOG.md");
    assert_eq!(cfg.publish.branch.as_deref(), Some("main"));
    assert_eq!(cfg.publish.package_files_filter, PackageFilesFilter::NpmIgnore);
    assert!(cfg.publish.tar_package_confirmation);
    assert_eq!(cfg.changelog_stagger.concurrency_limit(), 4);
    assert_eq!(cfg.changelog_stagger.per_second(), 8);
    assert_eq!(cfg.release_stagger.concurrency_limit(), 1);
}

#[test]
fn null_branch_disables_branch_check() {
    let file = write_config(r#"{ "publish": { "branch": null, "packageFilesFilter": false } }"#);
    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.publish.branch, None);
    assert_eq!(cfg.publish.package_files_filter, PackageFilesFilter::Disabled);
}

#[test]
fn tasks_section_uses_dashed_keys() {
    let file = write_config(r#"{ "tasks": { "npm-publish": false, "gh-release-all": true } }"#);
    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.tasks.npm_publish, Some(false));
    assert_eq!(cfg.tasks.gh_release_all, Some(true));
    assert_eq!(cfg.tasks.validations, Some(true));
}

#[test]
fn malformed_json_is_a_config_error() {
    let msg = config_error("{ \"github\": ");
    assert!(msg.contains("is invalid"), "{msg}");
}

#[test]
fn unknown_field_is_rejected() {
    let msg = config_error(r#"{ "publish": { "brnach": "main" } }"#);
    assert!(msg.contains("brnach"), "{msg}");
}

#[test]
fn negative_rate_is_rejected_while_parsing() {
    let msg = config_error(r#"{ "stagger": { "release": { "concurrencyLimit": 1, "perSecond": -5 } } }"#);
    assert!(msg.contains("is invalid"), "{msg}");
}

#[test]
fn fractional_limit_is_rejected_while_parsing() {
    let msg = config_error(r#"{ "stagger": { "release": { "concurrencyLimit": 1.5, "perSecond": 5 } } }"#);
    assert!(msg.contains("is invalid"), "{msg}");
}

#[test]
fn zero_limit_is_rejected_by_validation() {
    let msg = config_error(r#"{ "stagger": { "changelog": { "concurrencyLimit": 0, "perSecond": 5 } } }"#);
    assert!(msg.contains("stagger.changelog"), "{msg}");
    assert!(msg.contains("concurrencyLimit"), "{msg}");
}

#[test]
fn repo_without_rc_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load_for_repo(dir.path(), None).unwrap();
    assert_eq!(cfg.publish.branch.as_deref(), Some("master"));
    assert_eq!(cfg.changelog_stagger.per_second(), 20);
}

#[test]
fn repo_rc_file_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(RC_FILE_NAME),
        r#"{ "github": { "changelog": { "outputPath": "./docs/CHANGES.md" } } }"#,
    )
    .unwrap();

    let cfg = load_for_repo(dir.path(), None).unwrap();
    assert_eq!(cfg.github.changelog.output_path, "./docs/CHANGES.md");
}

#[test]
fn explicit_path_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    assert!(matches!(
        load_for_repo(dir.path(), Some(&missing)),
        Err(ReleaseError::Io(_))
    ));
}
