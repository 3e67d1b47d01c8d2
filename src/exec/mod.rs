// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`runner`] provides the `CommandRunner` trait and the production
//!   `SystemRunner` built on `tokio::process::Command`.
//! - [`git`] and [`npm`] wrap the individual commands the workflow needs.

pub mod git;
pub mod npm;
pub mod runner;

pub use runner::{CommandRunner, SystemRunner, display_command};
