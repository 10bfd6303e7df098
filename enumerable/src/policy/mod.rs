//! Error policies.
//!
//! An [`ErrorPolicy`] is the single decision point for failures raised by
//! stage callbacks. Returning `Ok(())` absorbs the failure and the failing
//! entry is skipped; returning `Err` aborts the traversal with that error.
//!
//! This module provides:
//! - The policy handle shared by every stage of a pipeline
//! - Serializable policy configuration
//! - A collecting policy that records absorbed failures

mod collector;
mod config;

pub use collector::{FailureLog, FailureRecord};
pub use config::{FailureMode, PolicyConfig};

use crate::errors::{EnumerableError, StageFailure};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

type Handler = dyn Fn(StageFailure) -> Result<(), EnumerableError> + Send + Sync;

/// Decides whether a failed entry is skipped or aborts the traversal.
///
/// Cloning shares the handler; every enumerable derived from another
/// holds a clone of the same policy, see [`ErrorPolicy::ptr_eq`].
#[derive(Clone)]
pub struct ErrorPolicy {
    label: &'static str,
    handler: Arc<Handler>,
}

impl ErrorPolicy {
    /// Creates a policy from a custom handler.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(StageFailure) -> Result<(), EnumerableError> + Send + Sync + 'static,
    {
        Self::labeled("custom", handler)
    }

    pub(crate) fn labeled<F>(label: &'static str, handler: F) -> Self
    where
        F: Fn(StageFailure) -> Result<(), EnumerableError> + Send + Sync + 'static,
    {
        Self {
            label,
            handler: Arc::new(handler),
        }
    }

    /// Propagates every failure unchanged. This is the default.
    #[must_use]
    pub fn rethrow() -> Self {
        Self::labeled("rethrow", |failure| Err(EnumerableError::Stage(failure)))
    }

    /// Silently skips every failed entry.
    #[must_use]
    pub fn skip() -> Self {
        Self::labeled("skip", |_| Ok(()))
    }

    /// Logs every failure at warn level and skips the entry.
    #[must_use]
    pub fn log_and_skip() -> Self {
        Self::labeled("log_and_skip", |failure| {
            warn!(
                stage = failure.stage,
                index = failure.index,
                key = %failure.key,
                error = %failure.source,
                "skipping entry after stage failure"
            );
            Ok(())
        })
    }

    /// Skips every failed entry and records it into `log`.
    #[must_use]
    pub fn collecting(log: &FailureLog) -> Self {
        let log = log.clone();
        Self::labeled("collecting", move |failure| {
            log.record(&failure);
            Ok(())
        })
    }

    /// Handles one stage failure.
    pub fn handle(&self, failure: StageFailure) -> Result<(), EnumerableError> {
        (self.handler)(failure)
    }

    /// Returns the policy's label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Returns true if both handles share the same handler.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler)
    }
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self::rethrow()
    }
}

impl fmt::Debug for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorPolicy")
            .field("label", &self.label)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn failure() -> StageFailure {
        StageFailure::new("map_by", 1, &1_usize, &2, anyhow!("Fail"))
    }

    #[test]
    fn test_rethrow_propagates_original_failure() {
        let policy = ErrorPolicy::default();
        let err = policy.handle(failure()).unwrap_err();

        assert_eq!(policy.label(), "rethrow");
        assert!(matches!(err, EnumerableError::Stage(ref f) if f.index == 1));
    }

    #[test]
    fn test_skip_absorbs() {
        assert!(ErrorPolicy::skip().handle(failure()).is_ok());
        assert!(ErrorPolicy::log_and_skip().handle(failure()).is_ok());
    }

    #[test]
    fn test_custom_policy_can_replace_failure() {
        let policy =
            ErrorPolicy::new(|f| Err(EnumerableError::policy(anyhow!("wrapped {}", f.stage))));
        let err = policy.handle(failure()).unwrap_err();

        assert_eq!(err.to_string(), "Error policy raised: wrapped map_by");
    }

    #[test]
    fn test_clones_share_handler() {
        let policy = ErrorPolicy::skip();
        assert!(policy.ptr_eq(&policy.clone()));
        assert!(!policy.ptr_eq(&ErrorPolicy::skip()));
    }

    #[test]
    fn test_collecting_policy_records() {
        let log = FailureLog::new();
        let policy = ErrorPolicy::collecting(&log);

        policy.handle(failure()).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.records()[0].stage, "map_by");
    }
}
