//! In-memory stand-ins for the command runner, GitHub and the terminal.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use smooth_release::errors::{ReleaseError, Result};
use smooth_release::exec::{CommandRunner, display_command};
use smooth_release::github::{
    Commit, GithubApi, Issue, NewRelease, PullRequest, Tag, TokenStatus,
};
use smooth_release::prompt::Prompt;

/// Scripted reply for one command line.
#[derive(Debug, Clone)]
pub enum Reply {
    Ok(String),
    Fail { code: i32, stderr: String },
}

/// A fake runner that:
/// - records every command line it is asked to run
/// - answers from a script keyed by the full command line, `Ok("")` otherwise.
#[derive(Default)]
pub struct FakeRunner {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, command: &str, stdout: &str) -> Self {
        self.replies
            .insert(command.to_string(), Reply::Ok(stdout.to_string()));
        self
    }

    pub fn fail(mut self, command: &str, code: i32, stderr: &str) -> Self {
        self.replies.insert(
            command.to_string(),
            Reply::Fail {
                code,
                stderr: stderr.to_string(),
            },
        );
        self
    }

    /// A runner whose `git` answers describe a clean `master` checkout in
    /// sync with its upstream.
    pub fn clean_repo() -> Self {
        Self::new()
            .reply("git rev-parse --abbrev-ref HEAD", "master")
            .reply("git status --porcelain", "")
            .reply("git rev-parse @", "abc")
            .reply("git rev-parse @{u}", "abc")
            .reply("git merge-base @ @{u}", "abc")
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_called(&self, command: &str) -> bool {
        self.calls().iter().any(|c| c == command)
    }
}

impl CommandRunner for FakeRunner {
    fn run<'a>(&'a self, program: &'a str, args: &'a [&'a str]) -> BoxFuture<'a, Result<String>> {
        let command = display_command(program, args);
        self.calls.lock().unwrap().push(command.clone());

        let reply = self.replies.get(&command).cloned();
        Box::pin(async move {
            match reply {
                None => Ok(String::new()),
                Some(Reply::Ok(out)) => Ok(out),
                Some(Reply::Fail { code, stderr }) => Err(ReleaseError::Command {
                    command,
                    code,
                    stderr,
                }),
            }
        })
    }
}

/// In-memory GitHub with a configurable latency on commit lookups, used to
/// observe how many lookups run at once.
#[derive(Default)]
pub struct FakeGithub {
    pub tags: Vec<Tag>,
    pub commit_dates: HashMap<String, DateTime<Utc>>,
    pub issues: Vec<Issue>,
    pub pull_requests: Vec<PullRequest>,
    pub token_status: Option<TokenStatus>,
    pub commit_delay: Duration,
    /// Tag names whose release creation fails.
    pub failing_releases: HashSet<String>,
    releases: Mutex<Vec<NewRelease>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    commit_calls: AtomicUsize,
}

impl FakeGithub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag pointing at a commit authored at `date`.
    pub fn with_tag(mut self, name: &str, date: DateTime<Utc>) -> Self {
        let sha = format!("sha-{name}");
        self.commit_dates.insert(sha.clone(), date);
        self.tags.push(Tag::new(name, sha));
        self
    }

    pub fn with_issue(mut self, number: u64, labels: &[&str], closed_at: DateTime<Utc>) -> Self {
        self.issues.push(Issue {
            number,
            title: format!("Issue {number}"),
            html_url: format!("https://github.com/acme/widgets/issues/{number}"),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            closed_at: Some(closed_at),
            is_pull_request: false,
        });
        self
    }

    pub fn with_pull_request(
        mut self,
        number: u64,
        labels: &[&str],
        merged_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.pull_requests.push(PullRequest {
            number,
            title: format!("PR {number}"),
            html_url: format!("https://github.com/acme/widgets/pull/{number}"),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            merged_at,
        });
        self
    }

    pub fn with_commit_delay(mut self, delay: Duration) -> Self {
        self.commit_delay = delay;
        self
    }

    pub fn with_failing_release(mut self, tag: &str) -> Self {
        self.failing_releases.insert(tag.to_string());
        self
    }

    pub fn with_token_status(mut self, status: TokenStatus) -> Self {
        self.token_status = Some(status);
        self
    }

    pub fn releases(&self) -> Vec<NewRelease> {
        self.releases.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn commit_calls(&self) -> usize {
        self.commit_calls.load(Ordering::SeqCst)
    }
}

impl GithubApi for FakeGithub {
    fn tags(&self) -> BoxFuture<'_, Result<Vec<Tag>>> {
        Box::pin(async move { Ok(self.tags.clone()) })
    }

    fn commit<'a>(&'a self, sha: &'a str) -> BoxFuture<'a, Result<Commit>> {
        Box::pin(async move {
            self.commit_calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if !self.commit_delay.is_zero() {
                tokio::time::sleep(self.commit_delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.commit_dates.get(sha) {
                Some(date) => Ok(Commit {
                    sha: sha.to_string(),
                    author_date: *date,
                }),
                None => Err(ReleaseError::Github {
                    status: 404,
                    message: "No commit found for SHA".to_string(),
                }),
            }
        })
    }

    fn closed_issues(&self, since: Option<DateTime<Utc>>) -> BoxFuture<'_, Result<Vec<Issue>>> {
        Box::pin(async move {
            Ok(self
                .issues
                .iter()
                .filter(|i| match (since, i.closed_at) {
                    (Some(since), Some(closed)) => closed >= since,
                    _ => true,
                })
                .cloned()
                .collect())
        })
    }

    fn merged_pull_requests(&self) -> BoxFuture<'_, Result<Vec<PullRequest>>> {
        Box::pin(async move {
            Ok(self
                .pull_requests
                .iter()
                .filter(|pr| pr.merged_at.is_some())
                .cloned()
                .collect())
        })
    }

    fn create_release<'a>(&'a self, release: &'a NewRelease) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if self.failing_releases.contains(&release.tag_name) {
                return Err(ReleaseError::Github {
                    status: 422,
                    message: format!("Release \"{}\" already exists", release.tag_name),
                });
            }
            self.releases.lock().unwrap().push(release.clone());
            Ok(())
        })
    }

    fn check_token(&self) -> BoxFuture<'_, Result<TokenStatus>> {
        Box::pin(async move { Ok(self.token_status.unwrap_or(TokenStatus::Valid)) })
    }
}

/// Prompt that replays canned answers and records what it was asked.
///
/// Running out of answers is an error, so an unexpected question fails the
/// test instead of hanging it.
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<String>>,
    confirmations: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(self, text: &str) -> Self {
        self.answers.lock().unwrap().push_back(text.to_string());
        self
    }

    pub fn confirm_with(self, yes: bool) -> Self {
        self.confirmations.lock().unwrap().push_back(yes);
        self
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

impl Prompt for ScriptedPrompt {
    fn question<'a>(
        &'a self,
        message: &'a str,
        default: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            self.asked.lock().unwrap().push(message.to_string());
            match self.answers.lock().unwrap().pop_front() {
                Some(answer) if answer.is_empty() => {
                    Ok(default.map(str::to_string).unwrap_or_default())
                }
                Some(answer) => Ok(answer),
                None => Err(ReleaseError::Aborted(format!("unexpected question: {message}"))),
            }
        })
    }

    fn confirm<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            self.asked.lock().unwrap().push(message.to_string());
            self.confirmations
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ReleaseError::Aborted(format!("unexpected confirmation: {message}")))
        })
    }
}
