// crates/corpus-gate-core/src/runtime/pool.rs
// ============================================================================
// Module: Worker Pool
// Description: Bounded parallel map over independent async tasks.
// Purpose: Fan work out to a fixed number of workers and fan results back in.
// Dependencies: thiserror, tokio
// ============================================================================

//! ## Overview
//! [`WorkerPool::run`] spawns one task per item on a [`JoinSet`] and gates
//! each task body behind a [`Semaphore`] permit, so at most `workers` bodies
//! are in flight. The call returns once every task has finished.
//!
//! ## Invariants
//! - Results come back in input order, one per item.
//! - A panicking task yields [`PoolError`] in its own slot and never affects
//!   its siblings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default number of concurrent workers.
pub const DEFAULT_WORKERS: usize = 10;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure of a single pooled task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The task panicked or was cancelled before producing a value.
    #[error("task {index} did not complete")]
    TaskFailed {
        /// Input position of the failed task.
        index: usize,
    },
}

// ============================================================================
// SECTION: Pool
// ============================================================================

/// Fixed-size pool of parallel workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    /// Maximum number of task bodies running at once.
    workers: usize,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

impl WorkerPool {
    /// Creates a pool. A worker count of zero is raised to one.
    #[must_use]
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Returns the worker count.
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Runs `task` once per item and waits for all of them.
    pub async fn run<I, F, Fut, R>(&self, items: Vec<I>, task: F) -> Vec<Result<R, PoolError>>
    where
        I: Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: Send + 'static,
    {
        let permits = Arc::new(Semaphore::new(self.workers));
        let task = Arc::new(task);
        let mut slots: Vec<Option<R>> = Vec::with_capacity(items.len());
        let mut joins = JoinSet::new();
        for (index, item) in items.into_iter().enumerate() {
            slots.push(None);
            let permits = Arc::clone(&permits);
            let task = Arc::clone(&task);
            joins.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                let value = (*task)(item).await;
                (index, value)
            });
        }
        while let Some(joined) = joins.join_next().await {
            if let Ok((index, value)) = joined
                && let Some(slot) = slots.get_mut(index)
            {
                *slot = Some(value);
            }
        }
        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or(PoolError::TaskFailed {
                    index,
                })
            })
            .collect()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::panic, reason = "Tests exercise panic isolation.")]

    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn results_keep_input_order() {
        let pool = WorkerPool::new(4);
        let results = pool
            .run((0 .. 20_u64).collect(), |n| async move {
                tokio::time::sleep(Duration::from_millis(20 - n)).await;
                n * 2
            })
            .await;
        let values: Vec<u64> = results.into_iter().map(Result::unwrap_or_default).collect();
        assert_eq!(values, (0 .. 20).map(|n| n * 2).collect::<Vec<_>>());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn in_flight_is_bounded_by_workers() {
        let pool = WorkerPool::new(3);
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (active_task, peak_task) = (Arc::clone(&active), Arc::clone(&peak));
        let _ = pool
            .run((0 .. 12).collect::<Vec<u32>>(), move |_| {
                let active = Arc::clone(&active_task);
                let peak = Arc::clone(&peak_task);
                async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                }
            })
            .await;
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(active.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn panic_is_isolated_to_its_slot() {
        let pool = WorkerPool::new(2);
        let results = pool
            .run(vec![1_u32, 2, 3], |n| async move {
                if n == 2 {
                    panic!("boom");
                }
                n
            })
            .await;
        assert_eq!(results[0], Ok(1));
        assert_eq!(
            results[1],
            Err(PoolError::TaskFailed {
                index: 1
            })
        );
        assert_eq!(results[2], Ok(3));
    }

    #[test]
    fn zero_workers_is_raised_to_one() {
        assert_eq!(WorkerPool::new(0).workers(), 1);
    }
}
