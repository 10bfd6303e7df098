//! Error types for enumerable pipelines.
//!
//! Three kinds of failure exist: a user callback failing while a stage
//! evaluates one entry ([`StageFailure`]), the error policy itself raising
//! while handling such a failure, and malformed construction arguments.

use serde_json::json;
use std::fmt::Debug;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EnumerableError>;

/// The main error type for enumerable operations.
#[derive(Debug, Error)]
pub enum EnumerableError {
    /// A stage callback failed and the policy propagated it unchanged.
    #[error("{0}")]
    Stage(#[from] StageFailure),

    /// The error policy raised a failure of its own.
    #[error("Error policy raised: {0}")]
    Policy(anyhow::Error),

    /// A stage or enumerable was constructed with an invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A single-use input was needed again after it had been consumed.
    #[error("Input already consumed: {0}")]
    Consumed(String),

    /// A tolerant policy ran out of failure budget.
    #[error("Failure limit exceeded: more than {limit} entries failed")]
    FailureLimitExceeded {
        /// The configured number of failures that may be skipped.
        limit: usize,
        /// The failure that exceeded the limit.
        #[source]
        last: StageFailure,
    },
}

impl EnumerableError {
    /// Wraps an arbitrary error as a policy failure.
    pub fn policy(error: impl Into<anyhow::Error>) -> Self {
        Self::Policy(error.into())
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Returns the stage failure carried by this error, if any.
    #[must_use]
    pub fn stage_failure(&self) -> Option<&StageFailure> {
        match self {
            Self::Stage(failure) | Self::FailureLimitExceeded { last: failure, .. } => {
                Some(failure)
            }
            Self::Policy(_) | Self::InvalidArgument(_) | Self::Consumed(_) => None,
        }
    }
}

/// A user callback failed while a stage was evaluating one entry.
///
/// Carries the stage name, the entry's position in the stage's input and
/// `Debug` renderings of the offending key and value so that policies can
/// report which element was affected.
#[derive(Debug, Error)]
#[error("Stage '{stage}' failed on entry {index} (key: {key}, value: {value}): {source}")]
pub struct StageFailure {
    /// Name of the stage or consumer whose callback failed.
    pub stage: &'static str,
    /// Zero-based position of the entry in the stage's input.
    pub index: usize,
    /// `Debug` rendering of the entry key.
    pub key: String,
    /// `Debug` rendering of the entry value.
    pub value: String,
    /// The error returned by the callback.
    pub source: anyhow::Error,
}

impl StageFailure {
    /// Creates a new stage failure for the given entry.
    pub fn new<K, V>(
        stage: &'static str,
        index: usize,
        key: &K,
        value: &V,
        source: anyhow::Error,
    ) -> Self
    where
        K: Debug + ?Sized,
        V: Debug + ?Sized,
    {
        Self {
            stage,
            index,
            key: format!("{key:?}"),
            value: format!("{value:?}"),
            source,
        }
    }

    /// Returns true if the underlying callback error is of type `E`.
    #[must_use]
    pub fn is<E>(&self) -> bool
    where
        E: std::fmt::Display + Debug + Send + Sync + 'static,
    {
        self.source.is::<E>()
    }

    /// Converts to a JSON representation.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "stage": self.stage,
            "index": self.index,
            "key": self.key,
            "value": self.value,
            "error": self.source.to_string(),
        })
    }
}
