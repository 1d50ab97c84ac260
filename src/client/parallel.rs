//! Bounded parallel execution for independent collaborator calls.
//!
//! Keeps at most `max_concurrent` futures in flight and hands results back in
//! submission order, so callers that merge them get deterministic output no
//! matter which call finishes first.

use std::future::Future;
use std::pin::Pin;

use futures::stream::{FuturesUnordered, StreamExt};
use log::debug;

/// Default number of concurrent collaborator calls.
pub const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Type alias for boxed futures used in parallel execution
type TaskFuture<T> = Pin<Box<dyn Future<Output = (usize, T)> + Send>>;

/// Run `task` for every key with at most `max_concurrent` running at once.
///
/// # Arguments
///
/// * `keys` - Task inputs, in the order results should be returned
/// * `task` - Async function producing one result per key
/// * `max_concurrent` - Maximum number of concurrent tasks (0 is treated as 1)
///
/// # Returns
///
/// One `(key, result)` pair per input key, in submission order.
///
/// # Example
///
/// ```ignore
/// let pairs = vec![(ResourceType::LoadBalancer, "us-east-1".to_string())];
/// let results = run_bounded(
///     pairs,
///     |(rt, region)| {
///         let c = client.clone();
///         async move { c.enumerate_resources(rt, &region).await }
///     },
///     8,
/// ).await;
/// ```
pub async fn run_bounded<K, T, F, Fut>(keys: Vec<K>, task: F, max_concurrent: usize) -> Vec<(K, T)>
where
    K: Clone + Send + 'static,
    T: Send + 'static,
    F: Fn(K) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
{
    if keys.is_empty() {
        return Vec::new();
    }

    let max_concurrent = max_concurrent.max(1);
    debug!(
        "Running {} tasks with max {} concurrent",
        keys.len(),
        max_concurrent
    );

    let mut slots: Vec<Option<T>> = keys.iter().map(|_| None).collect();
    let mut futures: FuturesUnordered<TaskFuture<T>> = FuturesUnordered::new();
    let mut pending = keys.clone().into_iter().enumerate();

    let make_future = |index: usize, key: K, f: &F| -> TaskFuture<T> {
        let fut = f(key);
        Box::pin(async move { (index, fut.await) })
    };

    // Seed initial batch up to max_concurrent
    for (index, key) in pending.by_ref().take(max_concurrent) {
        futures.push(make_future(index, key, &task));
    }

    // Refill as tasks complete to keep the bound saturated
    while let Some((index, result)) = futures.next().await {
        debug!("Task {} finished", index);
        slots[index] = Some(result);

        if let Some((next, key)) = pending.next() {
            futures.push(make_future(next, key, &task));
        }
    }

    keys.into_iter()
        .zip(slots)
        .filter_map(|(key, slot)| slot.map(|result| (key, result)))
        .collect()
}
