// src/stagger/options.rs

use std::time::Duration;

use serde::Deserialize;

use crate::errors::{ReleaseError, Result};

/// Throttling parameters for one [`stagger`](super::stagger) invocation.
///
/// Fields are private so that every value in circulation has passed
/// [`StaggerOptions::new`]; a zero limit or rate cannot reach the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaggerOptions {
    concurrency_limit: usize,
    per_second: u32,
}

impl StaggerOptions {
    /// Validate and build options.
    ///
    /// Fails with [`ReleaseError::InvalidSchedule`] if either value is zero.
    pub fn new(concurrency_limit: usize, per_second: u32) -> Result<Self> {
        if concurrency_limit == 0 {
            return Err(ReleaseError::InvalidSchedule(
                "concurrencyLimit must be >= 1 (got 0)".to_string(),
            ));
        }
        if per_second == 0 {
            return Err(ReleaseError::InvalidSchedule(
                "perSecond must be >= 1 (got 0)".to_string(),
            ));
        }
        Ok(Self {
            concurrency_limit,
            per_second,
        })
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    pub fn per_second(&self) -> u32 {
        self.per_second
    }

    /// Minimum gap between two consecutive task starts.
    pub fn min_interval(&self) -> Duration {
        Duration::from_secs(1) / self.per_second
    }
}

/// Scheduler settings as they appear in `.smooth-releaserc`.
///
/// ```json
/// { "concurrencyLimit": 10, "perSecond": 20 }
/// ```
///
/// Negative or fractional numbers are rejected by `serde` while parsing the
/// file; zero is rejected by the `TryFrom` conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StaggerSettings {
    pub concurrency_limit: usize,
    pub per_second: u32,
}

impl TryFrom<StaggerSettings> for StaggerOptions {
    type Error = ReleaseError;

    fn try_from(raw: StaggerSettings) -> std::result::Result<Self, Self::Error> {
        StaggerOptions::new(raw.concurrency_limit, raw.per_second)
    }
}
