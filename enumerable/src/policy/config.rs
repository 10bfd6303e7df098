//! Serializable error policy configuration.

use super::ErrorPolicy;
use crate::errors::EnumerableError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

/// How a pipeline handles stage failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Abort the traversal on the first failure (default).
    #[default]
    FailFast,
    /// Skip failed entries silently.
    Skip,
    /// Log failed entries at warn level and skip them.
    LogAndSkip,
}

/// Configuration for building an [`ErrorPolicy`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Failure mode.
    #[serde(default)]
    pub mode: FailureMode,
    /// Maximum number of failures that may be skipped.
    ///
    /// Once exceeded the policy raises [`EnumerableError::FailureLimitExceeded`].
    /// Ignored in [`FailureMode::FailFast`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_failures: Option<usize>,
}

impl PolicyConfig {
    /// Creates a new fail-fast config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failure mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: FailureMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the failure budget.
    #[must_use]
    pub const fn with_max_failures(mut self, max_failures: usize) -> Self {
        self.max_failures = Some(max_failures);
        self
    }

    /// Parses a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, EnumerableError> {
        serde_json::from_str(json)
            .map_err(|e| EnumerableError::invalid_argument(format!("invalid policy config: {e}")))
    }

    /// Builds the policy.
    ///
    /// The failure budget is counted across every traversal that shares the
    /// built policy.
    #[must_use]
    pub fn build(&self) -> ErrorPolicy {
        let log = self.mode == FailureMode::LogAndSkip;
        match (self.mode, self.max_failures) {
            (FailureMode::FailFast, _) => ErrorPolicy::rethrow(),
            (FailureMode::Skip, None) => ErrorPolicy::skip(),
            (FailureMode::LogAndSkip, None) => ErrorPolicy::log_and_skip(),
            (_, Some(limit)) => {
                let seen = AtomicUsize::new(0);
                ErrorPolicy::labeled("bounded", move |failure| {
                    if seen.fetch_add(1, Ordering::SeqCst) >= limit {
                        return Err(EnumerableError::FailureLimitExceeded {
                            limit,
                            last: failure,
                        });
                    }
                    if log {
                        warn!(
                            stage = failure.stage,
                            index = failure.index,
                            key = %failure.key,
                            error = %failure.source,
                            "skipping entry after stage failure"
                        );
                    }
                    Ok(())
                })
            }
        }
    }
}
