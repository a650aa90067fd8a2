//! Name normalization.

use std::fmt;

/// A name reduced to basic-Latin letters. May be empty, which marks it unusable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CleanedName(String);

impl CleanedName {
    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if nothing survived normalization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CleanedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keep only `A-Z` and `a-z`; case is preserved.
#[must_use]
pub fn normalize(raw: &str) -> CleanedName {
    let cleaned: String = raw.chars().filter(char::is_ascii_alphabetic).collect();
    tracing::debug!("Cleaned '{}' -> '{}'", raw, cleaned);
    CleanedName(cleaned)
}
