// tests/validations_flow.rs

use std::fs;

use smooth_release::errors::ReleaseError;
use smooth_release::github::TokenStatus;
use smooth_release::github::token::load_token;
use smooth_release::tasks::validations::{
    run_validations, validate_github_token, validate_npm_credentials,
    validate_package_files_filter,
};
use smooth_release::types::PackageFilesFilter;
use smooth_release_test_utils::builders::ConfigBuilder;
use smooth_release_test_utils::fakes::{FakeGithub, FakeRunner, ScriptedPrompt};

mod common;
use common::{context, project, widgets_project};

fn validation_message(err: ReleaseError) -> String {
    match err {
        ReleaseError::Validation(msg) => msg,
        other => panic!("Expected Validation error, got: {other:?}"),
    }
}

#[tokio::test]
async fn clean_repository_passes() {
    common::init_tracing();
    let dir = widgets_project("1.0.0");
    let config = ConfigBuilder::new()
        .with_branch("master")
        .with_repo_checks()
        .with_files_filter(PackageFilesFilter::Files)
        .with_token_check()
        .build();
    let runner = FakeRunner::clean_repo();
    let github = FakeGithub::new();
    let prompt = ScriptedPrompt::new();

    let ctx = context(&config, dir.path(), &runner, &github, &prompt);
    run_validations(&ctx, false).await.unwrap();

    assert!(runner.was_called("git fetch"));
    assert!(!runner.was_called("npm whoami"));
}

#[tokio::test]
async fn wrong_branch_fails_first() {
    let dir = widgets_project("1.0.0");
    let config = ConfigBuilder::new().with_branch("master").with_repo_checks().build();
    let runner = FakeRunner::clean_repo().reply("git rev-parse --abbrev-ref HEAD", "feature/x");
    let github = FakeGithub::new();
    let prompt = ScriptedPrompt::new();

    let ctx = context(&config, dir.path(), &runner, &github, &prompt);
    let msg = validation_message(run_validations(&ctx, false).await.unwrap_err());

    assert_eq!(msg, "You must be on \"master\" branch to perform this task. Aborting.");
    assert!(!runner.was_called("git status --porcelain"));
}

#[tokio::test]
async fn dirty_working_tree_is_reported() {
    let dir = widgets_project("1.0.0");
    let config = ConfigBuilder::new().with_repo_checks().build();
    let prompt = ScriptedPrompt::new();
    let github = FakeGithub::new();

    let runner = FakeRunner::clean_repo().reply("git status --porcelain", " M src/index.js");
    let ctx = context(&config, dir.path(), &runner, &github, &prompt);
    let msg = validation_message(run_validations(&ctx, false).await.unwrap_err());
    assert!(msg.contains("uncommited changes"), "{msg}");

    let runner = FakeRunner::clean_repo().reply("git status --porcelain", "?? notes.txt");
    let ctx = context(&config, dir.path(), &runner, &github, &prompt);
    let msg = validation_message(run_validations(&ctx, false).await.unwrap_err());
    assert!(msg.contains("untracked files"), "{msg}");
}

#[tokio::test]
async fn out_of_sync_branches_are_reported() {
    let dir = widgets_project("1.0.0");
    let config = ConfigBuilder::new().with_repo_checks().build();
    let github = FakeGithub::new();
    let prompt = ScriptedPrompt::new();

    let cases = [
        ("abc", "def", "abc", "out-of-date"),
        ("def", "abc", "abc", "ahead"),
        ("def", "ghi", "abc", "diverged"),
    ];
    for (local, remote, base, expected) in cases {
        let runner = FakeRunner::clean_repo()
            .reply("git rev-parse @", local)
            .reply("git rev-parse @{u}", remote)
            .reply("git merge-base @ @{u}", base);
        let ctx = context(&config, dir.path(), &runner, &github, &prompt);
        let msg = validation_message(run_validations(&ctx, false).await.unwrap_err());
        assert!(msg.contains(expected), "{expected}: {msg}");
    }
}

#[tokio::test]
async fn files_whitelist_and_npmignore_conflict() {
    let dir = widgets_project("1.0.0");
    fs::write(dir.path().join(".npmignore"), "test/\n").unwrap();
    let config = ConfigBuilder::new()
        .with_files_filter(PackageFilesFilter::Either)
        .build();
    let runner = FakeRunner::new();
    let github = FakeGithub::new();
    let prompt = ScriptedPrompt::new();

    let ctx = context(&config, dir.path(), &runner, &github, &prompt);
    let msg = validation_message(validate_package_files_filter(&ctx).unwrap_err());
    assert!(msg.contains("can't have both"), "{msg}");
}

#[tokio::test]
async fn rejected_token_is_replaced_and_run_stops() {
    let dir = widgets_project("1.0.0");
    let home = tempfile::tempdir().unwrap();
    let token_path = home.path().join(".smooth-release").join("gh_token");
    let new_token = "a".repeat(40);

    let config = ConfigBuilder::new().with_token_check().build();
    let runner = FakeRunner::new();
    let github = FakeGithub::new().with_token_status(TokenStatus::Invalid);
    let prompt = ScriptedPrompt::new().answer("too-short").answer(&new_token);

    let mut ctx = context(&config, dir.path(), &runner, &github, &prompt);
    ctx.token_path = Some(token_path.clone());

    let err = validate_github_token(&ctx).await.unwrap_err();
    assert!(matches!(err, ReleaseError::Aborted(ref m) if m.contains("restart")));
    assert_eq!(load_token(&token_path).unwrap(), Some(new_token));
    assert_eq!(prompt.asked().len(), 2);
}

#[tokio::test]
async fn npm_credentials_via_team_membership() {
    let dir = widgets_project("1.0.0");
    let config = ConfigBuilder::new().with_npm_credentials_check().build();
    let github = FakeGithub::new();
    let prompt = ScriptedPrompt::new();

    let runner = FakeRunner::new()
        .reply("npm whoami", "alice")
        .reply(
            "npm access ls-collaborators widgets",
            r#"{ "bob": "read-write", "acme:devs": "read-write", "acme:ops": "read-only" }"#,
        )
        .reply("npm team ls acme:devs", r#"["alice", "carol"]"#);

    let ctx = context(&config, dir.path(), &runner, &github, &prompt);
    validate_npm_credentials(&ctx).await.unwrap();
    assert!(!runner.was_called("npm team ls acme:ops"));
}

#[tokio::test]
async fn npm_credentials_fail_without_login_or_rights() {
    let dir = project(r#"{ "name": "@acme/widgets", "version": "1.0.0" }"#);
    let config = ConfigBuilder::new().with_npm_credentials_check().build();
    let github = FakeGithub::new();
    let prompt = ScriptedPrompt::new();

    let runner = FakeRunner::new().fail("npm whoami", 1, "ENEEDAUTH");
    let ctx = context(&config, dir.path(), &runner, &github, &prompt);
    let msg = validation_message(validate_npm_credentials(&ctx).await.unwrap_err());
    assert!(msg.contains("no logged in user"), "{msg}");

    let runner = FakeRunner::new()
        .reply("npm whoami", "mallory")
        .reply(
            "npm access ls-collaborators @acme/widgets",
            r#"{ "alice": "read-write" }"#,
        );
    let ctx = context(&config, dir.path(), &runner, &github, &prompt);
    let msg = validation_message(validate_npm_credentials(&ctx).await.unwrap_err());
    assert_eq!(msg, "\"mallory\" does not have write permissions for \"@acme/widgets\"");
}
