//! Shared types used across the follower crates.
//!
//! This module defines the newtypes and enums that flow between the
//! HTTP client layer and the orchestration engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FollowerError;

/// Opaque key identifying a remote profile.
///
/// Either a stable profile id or a display handle, depending on the
/// configured [`IdentifierField`]. It has no further structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileIdentifier(String);

impl ProfileIdentifier {
    /// Wrap a raw identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProfileIdentifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Which field of a search hit is used as the [`ProfileIdentifier`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierField {
    /// Stable profile id (`profileId`)
    #[default]
    #[serde(rename = "profileId")]
    ProfileId,
    /// Display handle (`handle`)
    #[serde(rename = "handle")]
    Handle,
}

impl IdentifierField {
    /// JSON key of this field in a search hit.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProfileId => "profileId",
            Self::Handle => "handle",
        }
    }
}

impl fmt::Display for IdentifierField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentifierField {
    type Err = FollowerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profileId" | "profile_id" => Ok(Self::ProfileId),
            "handle" => Ok(Self::Handle),
            other => Err(FollowerError::Validation(format!(
                "unknown identifier field '{other}', expected 'profileId' or 'handle'"
            ))),
        }
    }
}

/// Classified result of attempting to follow one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FollowOutcome {
    /// The platform accepted the follow
    Success,
    /// The profile was already followed; counts as a success
    AlreadyFollowing,
    /// The platform rejected the identifier permanently
    InvalidIdentifier,
    /// The platform reported a rate limit
    RateLimited,
    /// Any other error reported by the platform
    ApiError,
    /// Transport failure, non-2xx status or undecodable body
    NetworkFailure,
    /// Well-formed reply with an unexpected shape
    MalformedResponse,
}

impl FollowOutcome {
    /// All variants, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Success,
        Self::AlreadyFollowing,
        Self::InvalidIdentifier,
        Self::RateLimited,
        Self::ApiError,
        Self::NetworkFailure,
        Self::MalformedResponse,
    ];

    /// Check if the outcome counts towards successful follows.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success | Self::AlreadyFollowing)
    }

    /// Check if the outcome is a transient failure worth retrying in a later run.
    #[must_use]
    pub fn is_transient(self) -> bool {
        matches!(self, Self::RateLimited | Self::NetworkFailure)
    }

    /// Short lowercase label used in log fields.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::AlreadyFollowing => "already_following",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::RateLimited => "rate_limited",
            Self::ApiError => "api_error",
            Self::NetworkFailure => "network_failure",
            Self::MalformedResponse => "malformed_response",
        }
    }
}

impl fmt::Display for FollowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
