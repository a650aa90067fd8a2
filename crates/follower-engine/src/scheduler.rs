//! Batch scheduler for coordinating term workers.
//!
//! This module provides the `BatchScheduler` which admits names through
//! the deduplication registry, partitions the resulting search terms into
//! batches, and runs each batch on a bounded worker pool behind a full
//! barrier before moving on to the next.

use crate::normalize::normalize;
use crate::registry::{DeduplicationRegistry, SearchTerm};
use crate::summary::RunSummary;
use crate::throttle::{FixedDelay, Throttle};
use crate::worker::{TermResult, TermStatus, TermWorker};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Mutable state of a single run, owned by the orchestrating task.
#[derive(Debug, Default)]
pub struct RunContext {
    /// Names already turned into tasks
    pub registry: DeduplicationRegistry,
    /// Run-level counters
    pub summary: RunSummary,
}

impl RunContext {
    /// Fresh context for a new run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and deduplicate `raw_names`, in order.
    ///
    /// Updates the read, invalid and duplicate counters and returns the
    /// admitted search terms.
    pub fn admit_names<I, S>(&mut self, raw_names: I) -> Vec<SearchTerm>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms = Vec::new();
        for raw in raw_names {
            let raw = raw.as_ref();
            self.summary.names_read += 1;

            let cleaned = normalize(raw);
            if cleaned.is_empty() {
                tracing::debug!("Skipping empty name after cleaning original '{}'", raw);
                self.summary.invalid_skipped += 1;
                continue;
            }

            let shown = cleaned.to_string();
            match self.registry.try_admit(cleaned) {
                Some(term) => terms.push(term),
                None => {
                    tracing::info!(
                        "Skipping duplicate cleaned name '{}' (original: '{}')",
                        shown,
                        raw
                    );
                    self.summary.duplicates_skipped += 1;
                }
            }
        }
        terms
    }
}

/// Split `terms` into consecutive batches of at most `batch_size`.
///
/// A `batch_size` of zero is treated as one.
#[must_use]
pub fn partition(terms: Vec<SearchTerm>, batch_size: usize) -> Vec<Vec<SearchTerm>> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::with_capacity(terms.len().div_ceil(batch_size));
    let mut iter = terms.into_iter().peekable();
    while iter.peek().is_some() {
        batches.push(iter.by_ref().take(batch_size).collect());
    }
    batches
}

/// Final state of a run.
#[derive(Debug)]
pub struct RunReport {
    /// Counters at the point the run ended
    pub summary: RunSummary,
    /// True if cancellation cut the run short
    pub interrupted: bool,
}

enum BatchEnd {
    Completed,
    Interrupted,
}

/// Orchestrates term workers across sequential batches.
pub struct BatchScheduler {
    worker: TermWorker,
    batch_size: usize,
    max_workers: usize,
    submit_throttle: Arc<dyn Throttle>,
}

impl BatchScheduler {
    /// Create a scheduler with one worker slot and no submission delay.
    #[must_use]
    pub fn new(worker: TermWorker, batch_size: usize) -> Self {
        Self {
            worker,
            batch_size: batch_size.max(1),
            max_workers: 1,
            submit_throttle: Arc::new(FixedDelay::none()),
        }
    }

    /// Set the worker-pool capacity used for each batch.
    #[must_use]
    pub fn with_max_workers(mut self, max: usize) -> Self {
        self.max_workers = max.max(1);
        self
    }

    /// Set the throttle awaited between task submissions within a batch.
    #[must_use]
    pub fn with_submit_throttle(mut self, throttle: Arc<dyn Throttle>) -> Self {
        self.submit_throttle = throttle;
        self
    }

    /// Run the whole name list.
    ///
    /// Cancelling `cancel` stops further submissions, abandons in-flight
    /// work and returns the partial summary with `interrupted` set.
    pub async fn run<I, S>(&self, raw_names: I, cancel: &CancellationToken) -> RunReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let run_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("run", %run_id);
        let mut ctx = RunContext::new();
        let interrupted = self
            .run_with_context(raw_names, &mut ctx, cancel)
            .instrument(span)
            .await;

        RunReport {
            summary: ctx.summary,
            interrupted,
        }
    }

    /// Run the name list against an existing context. Returns true if interrupted.
    pub async fn run_with_context<I, S>(
        &self,
        raw_names: I,
        ctx: &mut RunContext,
        cancel: &CancellationToken,
    ) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = ctx.admit_names(raw_names);
        let batches = partition(terms, self.batch_size);
        let total = batches.len();
        tracing::info!(
            "Processing {} names as {} unique terms in {} batches of up to {}",
            ctx.summary.names_read,
            ctx.registry.len(),
            total,
            self.batch_size
        );

        for (index, batch) in batches.into_iter().enumerate() {
            if cancel.is_cancelled() {
                return true;
            }

            let span = tracing::info_span!("batch", index = index + 1, total);
            let end = self
                .run_batch(batch, (index + 1, total), &mut ctx.summary, cancel)
                .instrument(span)
                .await;
            if matches!(end, BatchEnd::Interrupted) {
                return true;
            }
        }

        tracing::info!("All batches have been processed");
        false
    }

    /// Submit one batch and wait for every task in it.
    async fn run_batch(
        &self,
        batch: Vec<SearchTerm>,
        (number, total): (usize, usize),
        summary: &mut RunSummary,
        cancel: &CancellationToken,
    ) -> BatchEnd {
        if batch.is_empty() {
            tracing::warn!("No valid, unique tasks in batch, skipping wait");
            return BatchEnd::Completed;
        }

        let size = batch.len();
        tracing::info!("--- Starting batch {}/{} ({} terms) ---", number, total, size);

        let pool = Arc::new(Semaphore::new(self.max_workers));
        let mut tasks = JoinSet::new();

        for (i, term) in batch.into_iter().enumerate() {
            if cancel.is_cancelled() {
                return abandon(&mut tasks);
            }

            tracing::info!(term = %term, "Submitting task");
            tasks.spawn(run_guarded(self.worker.clone(), pool.clone(), term));
            summary.terms_submitted += 1;

            if i + 1 < size {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return abandon(&mut tasks),
                    () = self.submit_throttle.pause() => {}
                }
            }
        }

        tracing::info!("Submitted {} tasks, waiting for completion", size);

        let mut completed = 0;
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return abandon(&mut tasks),
                joined = tasks.join_next() => match joined {
                    Some(Ok(result)) => {
                        completed += 1;
                        tracing::debug!(
                            term = %result.term,
                            successes = result.successes,
                            found = result.identifiers.len(),
                            "Task completed"
                        );
                        summary.merge(&result);
                    }
                    Some(Err(e)) => {
                        completed += 1;
                        tracing::error!("A task could not be joined: {}", e);
                        summary.workers_failed += 1;
                    }
                    None => break,
                },
            }
        }

        summary.batches_completed += 1;
        tracing::info!(
            "--- Finished batch {}/{}. Processed {} tasks ---",
            number,
            total,
            completed
        );
        BatchEnd::Completed
    }
}

fn abandon(tasks: &mut JoinSet<TermResult>) -> BatchEnd {
    tracing::warn!("Run interrupted, abandoning {} in-flight tasks", tasks.len());
    tasks.abort_all();
    BatchEnd::Interrupted
}

/// Run a worker inside a pool slot, converting a panic into a failed result.
async fn run_guarded(worker: TermWorker, pool: Arc<Semaphore>, term: SearchTerm) -> TermResult {
    let Ok(_permit) = pool.acquire_owned().await else {
        tracing::error!(term = %term, "Worker pool closed before the task could start");
        return TermResult::empty(term, TermStatus::WorkerFailed);
    };

    match AssertUnwindSafe(worker.run(term.clone())).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            tracing::error!(term = %term, "Task generated an exception: {}", panic_message(&*panic));
            TermResult::empty(term, TermStatus::WorkerFailed)
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(names: &[&str]) -> Vec<SearchTerm> {
        RunContext::new().admit_names(names)
    }

    #[test]
    fn test_admit_counts() {
        let mut ctx = RunContext::new();
        let admitted = ctx.admit_names(["Alice123", "alice", "", "Bob!!", "Bob", "42"]);
        let admitted: Vec<_> = admitted.iter().map(SearchTerm::as_str).collect();
        assert_eq!(admitted, vec!["Alice", "alice", "Bob"]);
        assert_eq!(ctx.summary.names_read, 6);
        assert_eq!(ctx.summary.invalid_skipped, 2);
        assert_eq!(ctx.summary.duplicates_skipped, 1);
    }

    #[test]
    fn test_partition_sizes() {
        let batches = partition(terms(&["a", "b", "c", "d", "e"]), 2);
        let sizes: Vec<_> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(batches[2][0].as_str(), "e");
    }

    #[test]
    fn test_partition_empty_and_exact() {
        assert!(partition(Vec::new(), 3).is_empty());
        let batches = partition(terms(&["a", "b", "c"]), 3);
        assert_eq!(batches.len(), 1);
        assert_eq!(partition(terms(&["a", "b"]), 0).len(), 2);
    }

    #[test]
    fn test_partition_preserves_order_without_overlap() {
        let input = terms(&["p", "q", "r", "s", "t", "u", "v"]);
        let flat: Vec<_> = partition(input.clone(), 3).into_iter().flatten().collect();
        assert_eq!(flat, input);
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*boxed), "boom");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(&*boxed), "bang");
        let boxed: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(&*boxed), "unknown panic");
    }
}
