//! Per-term unit of work: one search, then sequential follows.

use crate::registry::SearchTerm;
use crate::summary::OutcomeTally;
use crate::throttle::Throttle;
use follower_client::{FollowAction, ProfileSearch};
use follower_core::ProfileIdentifier;
use std::sync::Arc;

/// How a term worker ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermStatus {
    /// Search ran (possibly finding nothing) and every follow was attempted
    Completed,
    /// The search request failed; no follows were attempted
    SearchFailed,
    /// The worker panicked or was lost before returning
    WorkerFailed,
}

/// Outcome of one term worker invocation.
#[derive(Debug, Clone)]
pub struct TermResult {
    /// Term that was searched
    pub term: SearchTerm,
    /// Identifiers found, in the order returned by the search
    pub identifiers: Vec<ProfileIdentifier>,
    /// Follows that succeeded or were already in place
    pub successes: usize,
    /// Follow outcomes by kind
    pub outcomes: OutcomeTally,
    /// How the worker ended
    pub status: TermStatus,
}

impl TermResult {
    /// A result with no identifiers and no follows.
    #[must_use]
    pub fn empty(term: SearchTerm, status: TermStatus) -> Self {
        Self {
            term,
            identifiers: Vec::new(),
            successes: 0,
            outcomes: OutcomeTally::default(),
            status,
        }
    }
}

/// Runs the search-then-follow sequence for a single term.
#[derive(Clone)]
pub struct TermWorker {
    search: Arc<dyn ProfileSearch>,
    follow: Arc<dyn FollowAction>,
    follow_throttle: Arc<dyn Throttle>,
}

impl TermWorker {
    /// Create a worker over the given clients and inter-follow throttle.
    #[must_use]
    pub fn new(
        search: Arc<dyn ProfileSearch>,
        follow: Arc<dyn FollowAction>,
        follow_throttle: Arc<dyn Throttle>,
    ) -> Self {
        Self {
            search,
            follow,
            follow_throttle,
        }
    }

    /// Search for `term`, then follow each identifier in order.
    ///
    /// The throttle is awaited between follows, never after the last one.
    pub async fn run(&self, term: SearchTerm) -> TermResult {
        let found = self.search.search(term.as_str()).await;
        let status = if found.is_failed() {
            TermStatus::SearchFailed
        } else {
            TermStatus::Completed
        };
        let identifiers = found.into_identifiers();
        if identifiers.is_empty() {
            return TermResult::empty(term, status);
        }

        let total = identifiers.len();
        tracing::info!(term = %term, total, "Starting follow process");

        let mut outcomes = OutcomeTally::default();
        let mut successes = 0;
        for (i, id) in identifiers.iter().enumerate() {
            tracing::info!(
                term = %term,
                identifier = %id,
                "Attempting follow {}/{}",
                i + 1,
                total
            );
            let outcome = self.follow.follow(id).await;
            outcomes.record(outcome);
            if outcome.is_success() {
                successes += 1;
            }

            if i + 1 < total {
                self.follow_throttle.pause().await;
            }
        }

        tracing::info!(
            term = %term,
            "Finished following. Success/already following: {}/{}",
            successes,
            total
        );

        TermResult {
            term,
            identifiers,
            successes,
            outcomes,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::registry::DeduplicationRegistry;
    use async_trait::async_trait;
    use follower_client::SearchOutcome;
    use follower_core::FollowOutcome;
    use std::sync::Mutex;

    struct StaticSearch(SearchOutcome);

    #[async_trait]
    impl ProfileSearch for StaticSearch {
        async fn search(&self, _term: &str) -> SearchOutcome {
            self.0.clone()
        }
    }

    /// Replies with scripted outcomes and records the calls.
    #[derive(Default)]
    struct ScriptedFollow {
        outcomes: Mutex<Vec<FollowOutcome>>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FollowAction for ScriptedFollow {
        async fn follow(&self, id: &ProfileIdentifier) -> FollowOutcome {
            self.calls.lock().unwrap().push(id.to_string());
            let mut outcomes = self.outcomes.lock().unwrap();
            if outcomes.is_empty() {
                FollowOutcome::Success
            } else {
                outcomes.remove(0)
            }
        }
    }

    #[derive(Default)]
    struct CountingThrottle(Mutex<usize>);

    #[async_trait]
    impl Throttle for CountingThrottle {
        async fn pause(&self) {
            *self.0.lock().unwrap() += 1;
        }
    }

    fn term(name: &str) -> SearchTerm {
        DeduplicationRegistry::new()
            .try_admit(normalize(name))
            .expect("admit term")
    }

    fn ids(raw: &[&str]) -> Vec<ProfileIdentifier> {
        raw.iter().map(|s| ProfileIdentifier::new(*s)).collect()
    }

    #[tokio::test]
    async fn test_no_matches_skips_follow() {
        let follow = Arc::new(ScriptedFollow::default());
        let throttle = Arc::new(CountingThrottle::default());
        let worker = TermWorker::new(
            Arc::new(StaticSearch(SearchOutcome::Found(vec![]))),
            follow.clone(),
            throttle.clone(),
        );

        let result = worker.run(term("Alice")).await;
        assert_eq!(result.status, TermStatus::Completed);
        assert!(result.identifiers.is_empty());
        assert_eq!(result.successes, 0);
        assert!(follow.calls.lock().unwrap().is_empty());
        assert_eq!(*throttle.0.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_search_is_recorded() {
        let follow = Arc::new(ScriptedFollow::default());
        let worker = TermWorker::new(
            Arc::new(StaticSearch(SearchOutcome::Failed)),
            follow.clone(),
            Arc::new(CountingThrottle::default()),
        );

        let result = worker.run(term("Alice")).await;
        assert_eq!(result.status, TermStatus::SearchFailed);
        assert_eq!(result.successes, 0);
        assert!(follow.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_follows_in_order_and_counts_successes() {
        let follow = Arc::new(ScriptedFollow {
            outcomes: Mutex::new(vec![
                FollowOutcome::Success,
                FollowOutcome::AlreadyFollowing,
                FollowOutcome::RateLimited,
                FollowOutcome::MalformedResponse,
            ]),
            calls: Mutex::default(),
        });
        let throttle = Arc::new(CountingThrottle::default());
        let worker = TermWorker::new(
            Arc::new(StaticSearch(SearchOutcome::Found(ids(&["a", "b", "c", "d"])))),
            follow.clone(),
            throttle.clone(),
        );

        let result = worker.run(term("Alice")).await;
        assert_eq!(result.successes, 2);
        assert_eq!(result.identifiers.len(), 4);
        assert_eq!(result.outcomes.get(FollowOutcome::RateLimited), 1);
        assert_eq!(result.outcomes.total(), 4);
        assert_eq!(*follow.calls.lock().unwrap(), vec!["a", "b", "c", "d"]);
        // Paused between follows only
        assert_eq!(*throttle.0.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_single_identifier_never_pauses() {
        let throttle = Arc::new(CountingThrottle::default());
        let worker = TermWorker::new(
            Arc::new(StaticSearch(SearchOutcome::Found(ids(&["only"])))),
            Arc::new(ScriptedFollow::default()),
            throttle.clone(),
        );

        let result = worker.run(term("Bob")).await;
        assert_eq!(result.successes, 1);
        assert_eq!(*throttle.0.lock().unwrap(), 0);
    }
}
