//! Pipeline stages.
//!
//! A stage has the shape `FnOnce(Source<K, V>, &ErrorPolicy) -> Source<K2, V2>`
//! and is appended with [`Enumerable::then`](crate::core::Enumerable::then).
//!
//! Streaming stages evaluate their callback once per entry as entries are
//! pulled. A failing callback is handed to the policy: if the policy absorbs
//! it the entry is skipped, otherwise the policy's error ends the traversal.
//! Entries emitted before the failure stay emitted.
//!
//! Eager stages (`group_by`, `window_by`) accumulate input before emitting.

mod eager;
mod flatten;
mod streaming;

pub use eager::{group_by, window_by};
pub use flatten::{flat_map_by, flatten};
pub use streaming::{
    drop_while, filter_by, for_each_with, identity, map_by, map_keys_by, take_while,
};

use crate::core::{Element, Source, Traversal};
use crate::errors::{EnumerableError, StageFailure};
use crate::policy::ErrorPolicy;
use std::marker::PhantomData;
use tracing::debug;

/// Outcome of one streaming step.
pub(crate) enum Step<T> {
    /// Emit an output entry.
    Emit(T),
    /// Drop the input entry.
    Skip,
    /// End the whole sequence.
    Halt,
}

/// Drives a per-entry step function over a traversal.
pub(crate) struct Streaming<K, V, T, S> {
    stage: &'static str,
    input: Traversal<K, V>,
    policy: ErrorPolicy,
    step: S,
    index: usize,
    done: bool,
    _output: PhantomData<fn() -> T>,
}

impl<K, V, T, S> Iterator for Streaming<K, V, T, S>
where
    S: FnMut((K, V), usize) -> Result<Step<T>, StageFailure>,
{
    type Item = Result<T, EnumerableError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let entry = match self.input.next() {
                Some(Ok(entry)) => entry,
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err));
                }
                None => {
                    self.done = true;
                    return None;
                }
            };

            let index = self.index;
            self.index += 1;

            match (self.step)(entry, index) {
                Ok(Step::Emit(output)) => return Some(Ok(output)),
                Ok(Step::Skip) => {}
                Ok(Step::Halt) => {
                    debug!(stage = self.stage, index, "stage halted sequence");
                    self.done = true;
                }
                Err(failure) => {
                    if let Err(err) = self.policy.handle(failure) {
                        self.done = true;
                        return Some(Err(err));
                    }
                }
            }
        }
        None
    }
}

/// Builds a streaming stage output.
///
/// `make_step` runs once per traversal; state captured by the step it
/// returns is private to that traversal.
pub(crate) fn streaming<K, V, K2, V2, F, S>(
    stage: &'static str,
    source: Source<K, V>,
    policy: &ErrorPolicy,
    make_step: F,
) -> Source<K2, V2>
where
    K: Element,
    V: Element,
    K2: Element,
    V2: Element,
    F: Fn() -> S + Send + Sync + 'static,
    S: FnMut((K, V), usize) -> Result<Step<(K2, V2)>, StageFailure> + Send + 'static,
{
    let policy = policy.clone();
    source.derive(move |input| {
        Box::new(Streaming {
            stage,
            input,
            policy: policy.clone(),
            step: make_step(),
            index: 0,
            done: false,
            _output: PhantomData,
        })
    })
}
