//! Result aggregation into run-level counters.

use crate::worker::{TermResult, TermStatus};
use chrono::{DateTime, Utc};
use follower_core::FollowOutcome;
use std::fmt;

/// Per-outcome follow counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeTally {
    counts: [usize; FollowOutcome::ALL.len()],
}

impl OutcomeTally {
    /// Count one outcome.
    pub fn record(&mut self, outcome: FollowOutcome) {
        self.counts[slot(outcome)] += 1;
    }

    /// Count recorded for `outcome`.
    #[must_use]
    pub fn get(&self, outcome: FollowOutcome) -> usize {
        self.counts[slot(outcome)]
    }

    /// Total follows attempted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Follows that failed for transient reasons and may succeed on a later run.
    #[must_use]
    pub fn transient(&self) -> usize {
        FollowOutcome::ALL
            .into_iter()
            .filter(|outcome| outcome.is_transient())
            .map(|outcome| self.get(outcome))
            .sum()
    }

    /// Add another tally into this one.
    pub fn merge(&mut self, other: &OutcomeTally) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts) {
            *mine += theirs;
        }
    }
}

fn slot(outcome: FollowOutcome) -> usize {
    match outcome {
        FollowOutcome::Success => 0,
        FollowOutcome::AlreadyFollowing => 1,
        FollowOutcome::InvalidIdentifier => 2,
        FollowOutcome::RateLimited => 3,
        FollowOutcome::ApiError => 4,
        FollowOutcome::NetworkFailure => 5,
        FollowOutcome::MalformedResponse => 6,
    }
}

/// Aggregate counters for one run.
///
/// Written only by the orchestrating task: the admission counters while
/// names are planned, the rest through [`RunSummary::merge`].
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Raw names handed to the scheduler
    pub names_read: usize,
    /// Unique search terms submitted to workers
    pub terms_submitted: usize,
    /// Names skipped because their cleaned form was already admitted
    pub duplicates_skipped: usize,
    /// Names skipped because nothing survived normalization
    pub invalid_skipped: usize,
    /// Term workers that returned a result
    pub terms_completed: usize,
    /// Searches that failed (as opposed to finding nothing)
    pub searches_failed: usize,
    /// Term workers that panicked or could not be joined
    pub workers_failed: usize,
    /// Profile identifiers found across all searches
    pub profiles_found: usize,
    /// Follows that succeeded or were already in place
    pub successful_follows: usize,
    /// Batches whose barrier was reached
    pub batches_completed: usize,
    /// Follow outcomes by kind
    pub outcomes: OutcomeTally,
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSummary {
    /// Create zeroed counters stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            names_read: 0,
            terms_submitted: 0,
            duplicates_skipped: 0,
            invalid_skipped: 0,
            terms_completed: 0,
            searches_failed: 0,
            workers_failed: 0,
            profiles_found: 0,
            successful_follows: 0,
            batches_completed: 0,
            outcomes: OutcomeTally::default(),
        }
    }

    /// Fold one worker's result into the run counters.
    pub fn merge(&mut self, result: &TermResult) {
        match result.status {
            TermStatus::Completed => {}
            TermStatus::SearchFailed => self.searches_failed += 1,
            TermStatus::WorkerFailed => {
                self.workers_failed += 1;
                return;
            }
        }
        self.terms_completed += 1;
        self.profiles_found += result.identifiers.len();
        self.successful_follows += result.successes;
        self.outcomes.merge(&result.outcomes);
    }

    /// Emit the end-of-run summary at info level.
    pub fn log(&self) {
        let elapsed = Utc::now() - self.started_at;
        tracing::info!("Run started at {}", self.started_at.to_rfc3339());
        tracing::info!("Elapsed: {}s", elapsed.num_seconds());
        tracing::info!("Total names read: {}", self.names_read);
        tracing::info!("Unique cleaned names submitted: {}", self.terms_submitted);
        tracing::info!("Skipped duplicate cleaned names: {}", self.duplicates_skipped);
        tracing::info!("Skipped invalid/empty names: {}", self.invalid_skipped);
        tracing::info!("Batches completed: {}", self.batches_completed);
        tracing::info!(
            "Terms completed: {} (failed searches: {}, failed workers: {})",
            self.terms_completed,
            self.searches_failed,
            self.workers_failed
        );
        tracing::info!("Total profiles found across searches: {}", self.profiles_found);
        tracing::info!(
            "Total successful follows (or already following): {}",
            self.successful_follows
        );
        let transient = self.outcomes.transient();
        if transient > 0 {
            tracing::warn!(
                "Transient follow failures (rate limit or network), worth a later run: {}",
                transient
            );
        }
        for outcome in FollowOutcome::ALL {
            let count = self.outcomes.get(outcome);
            if count > 0 {
                tracing::info!(outcome = %outcome, count, "Follow outcome");
            }
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "names={} submitted={} duplicates={} invalid={} found={} followed={}",
            self.names_read,
            self.terms_submitted,
            self.duplicates_skipped,
            self.invalid_skipped,
            self.profiles_found,
            self.successful_follows
        )
    }
}
