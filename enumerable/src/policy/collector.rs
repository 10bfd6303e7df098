//! Recording of absorbed failures.

use crate::errors::StageFailure;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Record of one failure absorbed by a collecting policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Stage name.
    pub stage: String,
    /// Position of the entry in the stage's input.
    pub index: usize,
    /// `Debug` rendering of the entry key.
    pub key: String,
    /// `Debug` rendering of the entry value.
    pub value: String,
    /// Error message.
    pub error: String,
}

impl From<&StageFailure> for FailureRecord {
    fn from(failure: &StageFailure) -> Self {
        Self {
            stage: failure.stage.to_string(),
            index: failure.index,
            key: failure.key.clone(),
            value: failure.value.clone(),
            error: failure.source.to_string(),
        }
    }
}

/// Shared log of absorbed failures.
///
/// Clones share the same underlying records.
#[derive(Debug, Clone, Default)]
pub struct FailureLog {
    records: Arc<Mutex<Vec<FailureRecord>>>,
}

impl FailureLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, failure: &StageFailure) {
        self.records.lock().push(FailureRecord::from(failure));
    }

    /// Returns the number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Returns a snapshot of the recorded failures in order.
    #[must_use]
    pub fn records(&self) -> Vec<FailureRecord> {
        self.records.lock().clone()
    }

    /// Removes all records.
    pub fn clear(&self) {
        self.records.lock().clear();
    }

    /// Summarizes the log as JSON: total count and count per stage.
    #[must_use]
    pub fn summary(&self) -> serde_json::Value {
        let records = self.records.lock();
        let mut by_stage: BTreeMap<&str, usize> = BTreeMap::new();
        for record in records.iter() {
            *by_stage.entry(record.stage.as_str()).or_default() += 1;
        }
        serde_json::json!({
            "total": records.len(),
            "by_stage": by_stage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summary_counts_per_stage() {
        let log = FailureLog::new();
        log.record(&StageFailure::new("map_by", 0, &0, &1, anyhow!("a")));
        log.record(&StageFailure::new("map_by", 2, &2, &3, anyhow!("b")));
        log.record(&StageFailure::new("group_by", 1, &1, &2, anyhow!("c")));

        assert_eq!(
            log.summary(),
            serde_json::json!({"total": 3, "by_stage": {"group_by": 1, "map_by": 2}})
        );
    }

    #[test]
    fn test_clones_share_records() {
        let log = FailureLog::new();
        let clone = log.clone();
        clone.record(&StageFailure::new("filter_by", 4, &"k", &"v", anyhow!("bad")));

        assert_eq!(log.len(), 1);
        assert_eq!(
            log.records()[0],
            FailureRecord {
                stage: "filter_by".to_string(),
                index: 4,
                key: "\"k\"".to_string(),
                value: "\"v\"".to_string(),
                error: "bad".to_string(),
            }
        );

        log.clear();
        assert!(clone.is_empty());
    }
}
