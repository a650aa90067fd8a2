//! Run-wide deduplication of cleaned names.

use crate::normalize::CleanedName;
use std::collections::HashSet;
use std::fmt;

/// A cleaned name accepted by the registry; the unit handed to a term worker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Set of cleaned names already turned into a task during this run.
///
/// Grows monotonically. Owned by the orchestrating task; workers never
/// touch it.
#[derive(Debug, Default)]
pub struct DeduplicationRegistry {
    seen: HashSet<CleanedName>,
}

impl DeduplicationRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name`; true on its first occurrence, false afterwards.
    pub fn admit(&mut self, name: &CleanedName) -> bool {
        if self.seen.contains(name) {
            return false;
        }
        self.seen.insert(name.clone())
    }

    /// Admit `name` and promote it to a [`SearchTerm`] on first occurrence.
    ///
    /// Empty names are never admitted.
    pub fn try_admit(&mut self, name: CleanedName) -> Option<SearchTerm> {
        if name.is_empty() || !self.admit(&name) {
            return None;
        }
        Some(SearchTerm(name.into_inner()))
    }

    /// Number of distinct names admitted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Check if nothing has been admitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
