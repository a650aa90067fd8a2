//! Traits at the seam between the orchestration engine and the network.
//!
//! The engine only sees these traits, so tests can drive it with
//! in-memory fakes and the real clients stay swappable.

use async_trait::async_trait;
use follower_core::{FollowOutcome, ProfileIdentifier};

/// Result of one profile search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Search succeeded; the list may be empty
    Found(Vec<ProfileIdentifier>),
    /// Search failed (transport, status or decode); already logged
    Failed,
}

impl SearchOutcome {
    /// Identifiers found, empty on failure.
    #[must_use]
    pub fn into_identifiers(self) -> Vec<ProfileIdentifier> {
        match self {
            Self::Found(ids) => ids,
            Self::Failed => Vec::new(),
        }
    }

    /// Check if the search itself failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Searches the profile directory for a term.
#[async_trait]
pub trait ProfileSearch: Send + Sync {
    /// Search for profiles matching `term`. Never fails; see [`SearchOutcome`].
    async fn search(&self, term: &str) -> SearchOutcome;
}

/// Issues a follow for one profile.
#[async_trait]
pub trait FollowAction: Send + Sync {
    /// Follow `id` and classify the reply. Every path resolves to an outcome.
    async fn follow(&self, id: &ProfileIdentifier) -> FollowOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_search_yields_no_identifiers() {
        let outcome = SearchOutcome::Failed;
        assert!(outcome.is_failed());
        assert!(outcome.into_identifiers().is_empty());
    }

    #[test]
    fn test_found_keeps_order() {
        let outcome = SearchOutcome::Found(vec!["b".into(), "a".into()]);
        assert!(!outcome.is_failed());
        let ids = outcome.into_identifiers();
        assert_eq!(ids[0].as_str(), "b");
        assert_eq!(ids[1].as_str(), "a");
    }
}
