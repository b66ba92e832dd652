//! Bounded fan-out of async operations over a list of inputs.
//!
//! [`execute_parallel`] keeps at most `max_workers` operations in flight and
//! returns one outcome per input, in input order. A failed item never
//! cancels the others: callers decide what a partial failure means, either
//! by inspecting [`BatchResult::failures`] or by collapsing the batch with
//! [`BatchResult::into_all`].

use std::future::Future;
use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::error::{HighbondError, Result};

/// Default number of concurrent operations in a batch.
pub const DEFAULT_MAX_WORKERS: usize = 5;

/// Concurrency limits for batch operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadingConfig {
    /// Maximum operations in flight at once (at least 1).
    pub max_workers: usize,
    /// Upper bound on the wait for the whole batch.
    pub timeout: Option<Duration>,
}

impl Default for ThreadingConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            timeout: None,
        }
    }
}

impl ThreadingConfig {
    /// Create a config with the given worker count (0 is treated as 1).
    #[must_use]
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn workers_for(&self, items: usize) -> usize {
        self.max_workers.clamp(1, items.max(1))
    }
}

/// Per-item outcomes of a batch, in input order.
#[derive(Debug)]
pub struct BatchResult<T> {
    outcomes: Vec<Result<T>>,
}

impl<T> BatchResult<T> {
    pub fn new(outcomes: Vec<Result<T>>) -> Self {
        Self { outcomes }
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Whether every item succeeded.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(Result::is_ok)
    }

    /// Outcome for the input at `index`.
    pub fn get(&self, index: usize) -> Option<&Result<T>> {
        self.outcomes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Result<T>> {
        self.outcomes.iter()
    }

    /// Successful values, in input order.
    pub fn successes(&self) -> impl Iterator<Item = &T> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    /// Failed items as `(input index, error)`.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &HighbondError)> {
        self.outcomes
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.as_ref().err().map(|e| (i, e)))
    }

    pub fn into_outcomes(self) -> Vec<Result<T>> {
        self.outcomes
    }

    /// Collapse into all values, or the first error in input order.
    ///
    /// # Errors
    ///
    /// Returns the error of the lowest-indexed failed item.
    pub fn into_all(self) -> Result<Vec<T>> {
        self.outcomes.into_iter().collect()
    }

    /// Map successful values.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> BatchResult<U> {
        BatchResult {
            outcomes: self.outcomes.into_iter().map(|o| o.map(&mut f)).collect(),
        }
    }
}

impl<T> IntoIterator for BatchResult<T> {
    type Item = Result<T>;
    type IntoIter = std::vec::IntoIter<Result<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}

/// Run `op` for every item with at most `config.max_workers` in flight.
///
/// Results line up with the input order regardless of completion order.
/// Operations are started lazily, so the `n`-th call to `op` happens only
/// once a slot frees up. When `config.timeout` elapses first, unfinished
/// operations are dropped and their slots hold [`HighbondError::Timeout`].
///
/// # Example
///
/// ```no_run
/// use highbond::{execute_parallel, HighbondClient};
///
/// # async fn example(client: &HighbondClient) {
/// let paths = vec!["orgs/1/issues/1", "orgs/1/issues/2"];
/// let batch = execute_parallel(
///     |path| client.delete_json(path),
///     paths,
///     client.threading(),
/// )
/// .await;
/// for (index, error) in batch.failures() {
///     eprintln!("item {index} failed: {error}");
/// }
/// # }
/// ```
pub async fn execute_parallel<I, T, F, Fut>(op: F, items: I, config: ThreadingConfig) -> BatchResult<T>
where
    I: IntoIterator,
    F: Fn(I::Item) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let items: Vec<I::Item> = items.into_iter().collect();
    let total = items.len();
    if total == 0 {
        return BatchResult::new(Vec::new());
    }

    let workers = config.workers_for(total);
    tracing::debug!(items = total, workers, "dispatching batch");

    let mut slots: Vec<Option<Result<T>>> = std::iter::repeat_with(|| None).take(total).collect();
    let mut pending = stream::iter(items.into_iter().enumerate())
        .map(|(index, item)| {
            let call = op(item);
            async move { (index, call.await) }
        })
        .buffer_unordered(workers);

    let drain = async {
        while let Some((index, outcome)) = pending.next().await {
            slots[index] = Some(outcome);
        }
    };

    let waited = match config.timeout {
        Some(limit) => match tokio::time::timeout(limit, drain).await {
            Ok(()) => None,
            Err(_) => Some(limit),
        },
        None => {
            drain.await;
            None
        }
    };
    drop(pending);

    if let Some(waited) = waited {
        let unfinished = slots.iter().filter(|s| s.is_none()).count();
        tracing::warn!(unfinished, ?waited, "batch timed out");
    }

    let outcomes: Vec<Result<T>> = slots
        .into_iter()
        .map(|slot| {
            slot.unwrap_or_else(|| {
                Err(HighbondError::Timeout {
                    waited: waited.unwrap_or_default(),
                })
            })
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.is_err()).count();
    if failed > 0 {
        tracing::debug!(failed, items = total, "batch finished with failures");
    }

    BatchResult::new(outcomes)
}
