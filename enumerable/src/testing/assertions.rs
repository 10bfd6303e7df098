//! Assertions over pipeline results.

use crate::core::{Element, Enumerable};
use crate::errors::{Result, StageFailure};
use std::fmt::Debug;

/// Asserts that traversing `enumerable` yields exactly `expected`.
pub fn assert_entries<K, V>(enumerable: &Enumerable<K, V>, expected: &[(K, V)])
where
    K: Element + PartialEq,
    V: Element + PartialEq,
{
    let actual = match enumerable.iter().collect::<Result<Vec<_>>>() {
        Ok(entries) => entries,
        Err(err) => panic!("Expected entries {expected:?}, traversal failed: {err}"),
    };
    assert_eq!(actual.as_slice(), expected, "Entries differ");
}

/// Asserts that traversing `enumerable` yields exactly `expected` values,
/// ignoring keys.
pub fn assert_values<K, V>(enumerable: &Enumerable<K, V>, expected: &[V])
where
    K: Element,
    V: Element + PartialEq,
{
    let actual = match enumerable
        .iter()
        .map(|item| item.map(|(_, value)| value))
        .collect::<Result<Vec<_>>>()
    {
        Ok(values) => values,
        Err(err) => panic!("Expected values {expected:?}, traversal failed: {err}"),
    };
    assert_eq!(actual.as_slice(), expected, "Values differ");
}

/// Asserts that `result` failed inside `stage` and returns the failure.
pub fn assert_stage_failure<'a, T: Debug>(result: &'a Result<T>, stage: &str) -> &'a StageFailure {
    let err = match result {
        Ok(value) => panic!("Expected failure in stage '{stage}', got Ok({value:?})"),
        Err(err) => err,
    };
    let Some(failure) = err.stage_failure() else {
        panic!("Expected failure in stage '{stage}', got {err:?}");
    };
    assert_eq!(
        failure.stage, stage,
        "Expected failure in stage '{}', got '{}'",
        stage, failure.stage
    );
    failure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::map_by;
    use crate::testing::{fail_on, numbers};

    #[test]
    fn test_assert_entries_passes() {
        assert_entries(&numbers(2), &[(0, 1), (1, 2)]);
        assert_values(&numbers(3), &[1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "Entries differ")]
    fn test_assert_entries_detects_mismatch() {
        assert_entries(&numbers(2), &[(0, 1)]);
    }

    #[test]
    fn test_assert_stage_failure_returns_failure() {
        let result = numbers(3).then(map_by(fail_on(2))).collect_entries();
        let failure = assert_stage_failure(&result, "map_by");
        assert_eq!(failure.index, 1);
        assert_eq!(failure.value, "2");
    }

    #[test]
    #[should_panic(expected = "got Ok")]
    fn test_assert_stage_failure_rejects_success() {
        let result = numbers(1).collect_entries();
        assert_stage_failure(&result, "map_by");
    }
}
