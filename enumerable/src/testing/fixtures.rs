//! Fixtures for pipeline tests.

use crate::core::{enumerate_values, from_factory, Element, Enumerable};
use anyhow::bail;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly `tracing` subscriber.
///
/// Honors `RUST_LOG`; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Restartable enumerable over `1..=n`, keyed by position.
#[must_use]
pub fn numbers(n: i32) -> Enumerable<usize, i32> {
    from_factory(move || (1..=n).enumerate())
}

/// Single-use enumerable over `values`, keyed by position.
#[must_use]
pub fn single_use<V: Element>(values: Vec<V>) -> Enumerable<usize, V> {
    enumerate_values(values)
}

/// Mapping callback that returns its input unchanged except for `target`,
/// on which it fails with `"Fail"`.
pub fn fail_on<K, V>(
    target: V,
) -> impl Fn(&V, &K) -> anyhow::Result<V> + Clone + Send + Sync + 'static
where
    K: 'static,
    V: PartialEq + Clone + Send + Sync + 'static,
{
    move |value: &V, _: &K| {
        if *value == target {
            bail!("Fail");
        }
        Ok(value.clone())
    }
}

/// Records every entry passed to its callback.
#[derive(Debug)]
pub struct Recorder<K, V> {
    seen: Arc<Mutex<Vec<(K, V)>>>,
}

impl<K, V> Clone for Recorder<K, V> {
    fn clone(&self) -> Self {
        Self {
            seen: Arc::clone(&self.seen),
        }
    }
}

impl<K, V> Default for Recorder<K, V> {
    fn default() -> Self {
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<K: Clone + Send + 'static, V: Clone + Send + 'static> Recorder<K, V> {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback for [`for_each_with`](crate::stages::for_each_with).
    pub fn callback(&self) -> impl Fn(&V, &K) -> anyhow::Result<()> + Send + Sync + 'static {
        let seen = Arc::clone(&self.seen);
        move |value: &V, key: &K| {
            seen.lock().push((key.clone(), value.clone()));
            Ok(())
        }
    }

    /// Entries recorded so far.
    #[must_use]
    pub fn entries(&self) -> Vec<(K, V)> {
        self.seen.lock().clone()
    }

    /// Number of entries recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.lock().is_empty()
    }
}
