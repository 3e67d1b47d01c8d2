// src/prompt.rs

//! Interactive questions and confirmations.

use futures::future::BoxFuture;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::errors::Result;

pub trait Prompt: Send + Sync {
    /// Ask a free-form question. An empty answer yields `default`.
    fn question<'a>(
        &'a self,
        message: &'a str,
        default: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String>>;

    /// Ask a yes/no question; anything but `y`/`yes` means no.
    fn confirm<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<bool>>;
}

/// Prompt on stderr, read answers from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    async fn ask(message: &str) -> Result<String> {
        let mut stderr = tokio::io::stderr();
        stderr.write_all(format!("? {message} ").as_bytes()).await?;
        stderr.flush().await?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        Ok(lines.next_line().await?.unwrap_or_default().trim().to_string())
    }
}

impl Prompt for TerminalPrompt {
    fn question<'a>(
        &'a self,
        message: &'a str,
        default: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let message = match default {
                Some(d) => format!("{message} ({d})"),
                None => message.to_string(),
            };
            let answer = Self::ask(&message).await?;
            Ok(match (answer.is_empty(), default) {
                (true, Some(d)) => d.to_string(),
                _ => answer,
            })
        })
    }

    fn confirm<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            let answer = Self::ask(&format!("{message} (y/n)")).await?;
            Ok(is_yes(&answer))
        })
    }
}

/// Answers every confirmation with "yes" (`--yes`). Free-form questions
/// still need a terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

impl Prompt for AutoConfirm {
    fn question<'a>(
        &'a self,
        message: &'a str,
        default: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move { TerminalPrompt.question(message, default).await })
    }

    fn confirm<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            tracing::info!(question = message, "auto-confirmed");
            Ok(true)
        })
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_answers() {
        assert!(is_yes("y"));
        assert!(is_yes(" Yes "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
    }

    #[tokio::test]
    async fn auto_confirm_says_yes() {
        assert!(AutoConfirm.confirm("publish?").await.unwrap());
    }
}
