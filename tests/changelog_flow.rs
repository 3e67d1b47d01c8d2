// tests/changelog_flow.rs

use std::fs;
use std::time::Duration;

use smooth_release::errors::ReleaseError;
use smooth_release::github::{Tag, enrich_tags};
use smooth_release::tasks::changelog::run_changelog;
use smooth_release::types::DataType;
use smooth_release_test_utils::builders::ConfigBuilder;
use smooth_release_test_utils::fakes::{FakeGithub, FakeRunner, ScriptedPrompt};

mod common;
use common::{context, jan, widgets_project};

#[tokio::test]
async fn writes_changelog_grouped_by_tag() {
    common::init_tracing();
    let dir = widgets_project("0.2.0");
    let config = ConfigBuilder::new().build();
    let runner = FakeRunner::new();
    let prompt = ScriptedPrompt::new();
    let github = FakeGithub::new()
        .with_tag("v0.2.0", jan(10))
        .with_tag("v0.1.0", jan(5))
        .with_issue(1, &["bug"], jan(2))
        .with_issue(2, &[], jan(7))
        .with_issue(3, &["discussion"], jan(8))
        .with_issue(4, &["breaking"], jan(12));

    let ctx = context(&config, dir.path(), &runner, &github, &prompt);
    let markdown = run_changelog(&ctx).await.unwrap();

    let on_disk = fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
    assert_eq!(on_disk, markdown);

    assert!(markdown.starts_with("# Change Log\n\n## [Unreleased]"));
    assert!(markdown.contains("- Issue 4 [#4](https://github.com/acme/widgets/issues/4)"));
    assert!(!markdown.contains("#3"), "ignored label leaked:\n{markdown}");

    let unreleased = markdown.find("## [Unreleased]").unwrap();
    let v2 = markdown.find("## [v0.2.0]").unwrap();
    let v1 = markdown.find("## [v0.1.0]").unwrap();
    assert!(unreleased < v2 && v2 < v1);

    let issue2 = markdown.find("[#2]").unwrap();
    let issue1 = markdown.find("[#1]").unwrap();
    assert!(v2 < issue2 && issue2 < v1);
    assert!(v1 < issue1);
    assert!(markdown.contains("[Full Changelog](https://github.com/acme/widgets/compare/v0.1.0...v0.2.0)"));
}

#[tokio::test]
async fn merged_pull_requests_as_data_source() {
    let dir = widgets_project("0.1.0");
    let config = ConfigBuilder::new()
        .with_data_type(DataType::PullRequests)
        .with_output_path("./docs/CHANGES.md")
        .build();
    let runner = FakeRunner::new();
    let prompt = ScriptedPrompt::new();
    let github = FakeGithub::new()
        .with_tag("v0.1.0", jan(5))
        .with_pull_request(7, &["defect"], Some(jan(3)))
        .with_pull_request(8, &[], None);

    let ctx = context(&config, dir.path(), &runner, &github, &prompt);
    let markdown = run_changelog(&ctx).await.unwrap();

    assert!(dir.path().join("docs/CHANGES.md").is_file());
    assert!(markdown.contains("#### Fixes (bugs & defects):\n\n- PR 7 [#7](https://github.com/acme/widgets/pull/7)"));
    assert!(!markdown.contains("PR 8"));
    assert!(!markdown.contains("Unreleased"));
}

#[tokio::test(start_paused = true)]
async fn tag_lookups_are_throttled() {
    let mut github = FakeGithub::new().with_commit_delay(Duration::from_millis(30));
    for day in 1..=12 {
        github = github.with_tag(&format!("v0.{day}.0"), jan(day));
    }
    let config = ConfigBuilder::new().with_changelog_stagger(2, 50).build();

    let dated = enrich_tags(&github, &github.tags, config.changelog_stagger)
        .await
        .unwrap();

    assert_eq!(dated.len(), 12);
    assert_eq!(github.max_in_flight(), 2);
    assert!(dated.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    assert_eq!(dated[0].name, "v0.1.0");
}

#[tokio::test]
async fn failed_tag_lookup_fails_after_all_lookups_ran() {
    let mut github = FakeGithub::new()
        .with_tag("v0.1.0", jan(1))
        .with_tag("v0.2.0", jan(2));
    github.tags.insert(1, Tag::new("v0.1.5", "missing-sha"));
    let config = ConfigBuilder::new().with_changelog_stagger(1, 1000).build();

    let err = enrich_tags(&github, &github.tags, config.changelog_stagger)
        .await
        .unwrap_err();

    assert!(matches!(err, ReleaseError::Github { status: 404, .. }));
    assert_eq!(github.commit_calls(), 3);
}
