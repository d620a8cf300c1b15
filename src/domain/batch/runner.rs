//! Order-preserving batch execution over a scoped worker pool.
//!
//! Tasks are tagged with their input index and pushed onto a shared
//! multi-consumer channel. Each worker pulls tasks until the channel drains
//! and sends `(index, result)` back to the calling thread, which is the only
//! writer of the output slots. Output order therefore always equals input
//! order, whatever order the workers finish in.

use std::collections::HashMap;
use std::hash::Hash;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};

use super::{BatchError, BatchOptions};
use crate::domain::foundation::CancellationToken;

/// Runs `f` over every task on the calling thread.
pub fn run_serial<T, R, F>(tasks: &[T], f: F) -> Vec<R>
where
    F: Fn(&T) -> R,
{
    tasks.iter().map(f).collect()
}

/// Runs `f` over every task, fanning out when the batch is large enough.
///
/// Below `options.serial_threshold` no threads are spawned. `workers == 0`
/// sizes the pool automatically (see [`BatchOptions::resolve_workers`]).
pub fn run_concurrent<T, R, F>(tasks: &[T], workers: usize, options: &BatchOptions, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    if options.runs_serially(tasks.len()) {
        return run_serial(tasks, f);
    }

    let workers = options.resolve_workers(tasks.len(), workers);
    tracing::debug!(task_count = tasks.len(), workers, "running batch concurrently");

    let never = CancellationToken::new();
    let slots = fan_out(tasks, workers, &never, &f);
    slots.into_iter().flatten().collect()
}

/// Cancellable variant of [`run_concurrent`].
///
/// Every task checks `token` before it starts. If any task was skipped
/// because of cancellation the whole call fails and the partial results are
/// dropped.
///
/// # Errors
///
/// Returns [`BatchError::Cancelled`] if the token was cancelled before every
/// task had started.
pub fn try_run_concurrent<T, R, F>(
    tasks: &[T],
    workers: usize,
    options: &BatchOptions,
    token: &CancellationToken,
    f: F,
) -> Result<Vec<R>, BatchError>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let slots = if options.runs_serially(tasks.len()) {
        tasks
            .iter()
            .map(|task| (!token.is_cancelled()).then(|| f(task)))
            .collect::<Vec<_>>()
    } else {
        let workers = options.resolve_workers(tasks.len(), workers);
        fan_out(tasks, workers, token, &f)
    };

    let total = slots.len();
    let results: Vec<R> = slots.into_iter().flatten().collect();
    if results.len() != total {
        tracing::debug!(
            completed = results.len(),
            task_count = total,
            "batch cancelled"
        );
        return Err(BatchError::Cancelled {
            completed: results.len(),
            total,
        });
    }
    Ok(results)
}

/// Folds an ordered result list into a map keyed by `key`.
///
/// Later entries win when two results share a key.
pub fn index_by<R, K, F>(results: Vec<R>, key: F) -> HashMap<K, R>
where
    K: Eq + Hash,
    F: Fn(&R) -> K,
{
    results.into_iter().map(|r| (key(&r), r)).collect()
}

fn fan_out<T, R, F>(
    tasks: &[T],
    workers: usize,
    token: &CancellationToken,
    f: &F,
) -> Vec<Option<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let (task_tx, task_rx) = bounded::<(usize, &T)>(tasks.len());
    for (index, task) in tasks.iter().enumerate() {
        // Capacity equals the task count and the receiver is alive.
        let _ = task_tx.send((index, task));
    }
    drop(task_tx);

    let (result_tx, result_rx) = bounded::<(usize, R)>(tasks.len());
    let mut slots: Vec<Option<R>> = Vec::with_capacity(tasks.len());
    slots.resize_with(tasks.len(), || None);

    thread::scope(|scope| {
        for _ in 0..workers {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || work(task_rx, result_tx, token, f));
        }
        drop(result_tx);

        for (index, result) in result_rx.iter() {
            slots[index] = Some(result);
        }
    });

    slots
}

fn work<T, R, F>(
    tasks: Receiver<(usize, &T)>,
    results: Sender<(usize, R)>,
    token: &CancellationToken,
    f: &F,
) where
    F: Fn(&T) -> R,
{
    for (index, task) in tasks.iter() {
        if token.is_cancelled() {
            return;
        }
        if results.send((index, f(task))).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread::ThreadId;
    use std::time::Duration;

    fn square(x: &u64) -> u64 {
        x * x
    }

    #[test]
    fn serial_preserves_order() {
        let tasks: Vec<u64> = (0..5).collect();
        assert_eq!(run_serial(&tasks, square), vec![0, 1, 4, 9, 16]);
    }

    #[test]
    fn concurrent_preserves_order_when_late_tasks_finish_first() {
        let tasks: Vec<u64> = (0..40).collect();
        let results = run_concurrent(&tasks, 8, &BatchOptions::default(), |x| {
            // Early tasks sleep longest.
            std::thread::sleep(Duration::from_millis(40 - *x));
            *x
        });
        assert_eq!(results, tasks);
    }

    #[test]
    fn small_batches_stay_on_calling_thread() {
        let caller = std::thread::current().id();
        let tasks: Vec<u64> = (0..9).collect();
        let threads: Vec<ThreadId> =
            run_concurrent(&tasks, 4, &BatchOptions::default(), |_| std::thread::current().id());
        assert!(threads.iter().all(|id| *id == caller));
    }

    #[test]
    fn large_batches_use_worker_threads() {
        let caller = std::thread::current().id();
        let tasks: Vec<u64> = (0..20).collect();
        let threads: Vec<ThreadId> =
            run_concurrent(&tasks, 2, &BatchOptions::default(), |_| std::thread::current().id());
        assert!(threads.iter().all(|id| *id != caller));
    }

    #[test]
    fn empty_batch_returns_empty() {
        let tasks: Vec<u64> = Vec::new();
        assert!(run_concurrent(&tasks, 0, &BatchOptions::default(), square).is_empty());
    }

    #[test]
    fn try_run_completes_without_cancellation() {
        let tasks: Vec<u64> = (0..30).collect();
        let token = CancellationToken::new();
        let results =
            try_run_concurrent(&tasks, 3, &BatchOptions::default(), &token, square).unwrap();
        assert_eq!(results[29], 841);
    }

    #[test]
    fn pre_cancelled_token_fails_serial_batch() {
        let tasks: Vec<u64> = (0..3).collect();
        let token = CancellationToken::new();
        token.cancel();
        let err = try_run_concurrent(&tasks, 0, &BatchOptions::default(), &token, square)
            .unwrap_err();
        assert_eq!(err, BatchError::Cancelled { completed: 0, total: 3 });
    }

    #[test]
    fn cancelling_mid_batch_discards_partial_results() {
        let tasks: Vec<u64> = (0..200).collect();
        let token = CancellationToken::new();
        let seen = AtomicUsize::new(0);

        let result = try_run_concurrent(&tasks, 2, &BatchOptions::default(), &token, |x| {
            if seen.fetch_add(1, Ordering::SeqCst) == 5 {
                token.cancel();
            }
            *x
        });

        assert!(matches!(result, Err(BatchError::Cancelled { total: 200, .. })));
    }

    #[test]
    fn index_by_keys_results() {
        let results = vec![("a", 1), ("b", 2)];
        let map = index_by(results, |(id, _)| id.to_string());
        assert_eq!(map["b"], ("b", 2));
    }

    proptest! {
        #[test]
        fn concurrent_matches_serial(tasks in proptest::collection::vec(0u64..1_000, 0..120), workers in 0usize..16) {
            let serial = run_serial(&tasks, square);
            let concurrent = run_concurrent(&tasks, workers, &BatchOptions::default(), square);
            prop_assert_eq!(serial, concurrent);
        }
    }
}
