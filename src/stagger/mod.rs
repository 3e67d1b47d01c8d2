// src/stagger/mod.rs

//! Rate-limited concurrent task scheduler.
//!
//! Used wherever the release workflow fans out remote calls (e.g. fetching
//! the commit behind every tag) and must stay under the API's request rate
//! and concurrency limits.
//!
//! - [`options`] holds the validated throttling parameters.
//! - [`scheduler`] holds the coordinating loop.

pub mod options;
pub mod scheduler;

pub use options::{StaggerOptions, StaggerSettings};
pub use scheduler::{Completed, stagger, stagger_indexed};
