//! Decoding of follow-mutation replies.
//!
//! All guessing about the reply shape lives in [`decode_follow_reply`],
//! which turns an arbitrary JSON value into a [`FollowReply`]. The
//! outcome is then a pure function of that variant.

use follower_core::FollowOutcome;
use serde::Deserialize;
use serde_json::Value;

/// Status reported by the platform once the follow relationship exists.
pub const FOLLOWING_STATUS: &str = "FOLLOWING";

/// Type tags the platform returns for a successful follow.
pub const SUCCESS_TYPENAMES: [&str; 2] = ["GraphQLAccountProfile", "IGraphQLFollowResult"];

const INVALID_IDENTIFIER: &str = "Invalid user identifier";
const ALREADY_FOLLOWING: &str = "already following";
const RATE_LIMIT_EXCEEDED: &str = "Rate limit exceeded";
const UNKNOWN_API_ERROR: &str = "Unknown API error";

/// Decoded follow reply.
#[derive(Debug, Clone, PartialEq)]
pub enum FollowReply {
    /// The reply carried an error list; only the first message is kept
    Rejected {
        /// Message of the first error entry
        message: String,
    },
    /// `data.follow` was present with a recognized status or type tag
    Followed {
        /// `vcFollowingStatus`, if present
        status: Option<String>,
        /// `__typename`, if present
        typename: Option<String>,
    },
    /// `data.follow` was present but neither status nor type tag is recognized
    Unrecognized {
        /// `vcFollowingStatus`, if present
        status: Option<String>,
        /// `__typename`, if present
        typename: Option<String>,
        /// The raw follow object, for diagnostics
        detail: Value,
    },
    /// Neither a usable error list nor a usable `data.follow` object
    Malformed {
        /// What was wrong with the reply
        reason: &'static str,
    },
}

impl FollowReply {
    /// Classify the decoded reply.
    #[must_use]
    pub fn outcome(&self) -> FollowOutcome {
        match self {
            Self::Rejected { message } => classify_error_message(message),
            Self::Followed { .. } => FollowOutcome::Success,
            Self::Unrecognized { .. } | Self::Malformed { .. } => FollowOutcome::MalformedResponse,
        }
    }
}

/// Map a platform error message to an outcome.
///
/// The invalid-identifier and rate-limit checks are case-sensitive, the
/// already-following check is not.
#[must_use]
pub fn classify_error_message(message: &str) -> FollowOutcome {
    if message.contains(INVALID_IDENTIFIER) {
        FollowOutcome::InvalidIdentifier
    } else if message.to_lowercase().contains(ALREADY_FOLLOWING) {
        FollowOutcome::AlreadyFollowing
    } else if message.contains(RATE_LIMIT_EXCEEDED) {
        FollowOutcome::RateLimited
    } else {
        FollowOutcome::ApiError
    }
}

#[derive(Debug, Deserialize)]
struct RawReply {
    #[serde(default)]
    errors: Option<Vec<Value>>,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawFollow {
    #[serde(rename = "vcFollowingStatus", default)]
    status: Option<String>,
    #[serde(rename = "__typename", default)]
    typename: Option<String>,
}

/// Decode a follow reply body.
///
/// A non-empty error list short-circuits any interpretation of `data`.
#[must_use]
pub fn decode_follow_reply(body: &Value) -> FollowReply {
    let Ok(reply) = RawReply::deserialize(body) else {
        return FollowReply::Malformed {
            reason: "reply is not an object with an error list and data field",
        };
    };

    // Later entries are never inspected, whatever their shape
    if let Some(first) = reply.errors.as_deref().and_then(<[Value]>::first) {
        let message = first
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_API_ERROR);
        return FollowReply::Rejected {
            message: message.to_string(),
        };
    }

    let Some(data) = reply.data.filter(Value::is_object) else {
        return FollowReply::Malformed {
            reason: "reply lacks a data field and has no errors",
        };
    };

    let Some(follow) = data.get("follow").filter(|f| f.is_object()) else {
        return FollowReply::Malformed {
            reason: "follow data missing or not an object",
        };
    };

    let Ok(RawFollow { status, typename }) = RawFollow::deserialize(follow) else {
        return FollowReply::Malformed {
            reason: "follow status or type has an unexpected type",
        };
    };

    let recognized = status.as_deref() == Some(FOLLOWING_STATUS)
        || typename
            .as_deref()
            .is_some_and(|t| SUCCESS_TYPENAMES.contains(&t));

    if recognized {
        FollowReply::Followed { status, typename }
    } else {
        FollowReply::Unrecognized {
            status,
            typename,
            detail: follow.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outcome_of(body: &Value) -> FollowOutcome {
        decode_follow_reply(body).outcome()
    }

    #[test]
    fn test_already_following_is_success() {
        let body = json!({ "errors": [{ "message": "already following" }] });
        let outcome = outcome_of(&body);
        assert_eq!(outcome, FollowOutcome::AlreadyFollowing);
        assert!(outcome.is_success());

        let body = json!({ "errors": [{ "message": "User is Already Following this profile" }] });
        assert_eq!(outcome_of(&body), FollowOutcome::AlreadyFollowing);
    }

    #[test]
    fn test_invalid_identifier() {
        let body = json!({ "errors": [{ "message": "Invalid user identifier" }] });
        let outcome = outcome_of(&body);
        assert_eq!(outcome, FollowOutcome::InvalidIdentifier);
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_invalid_identifier_is_case_sensitive() {
        let body = json!({ "errors": [{ "message": "invalid user identifier" }] });
        assert_eq!(outcome_of(&body), FollowOutcome::ApiError);
    }

    #[test]
    fn test_rate_limited() {
        let body = json!({ "errors": [{ "message": "Rate limit exceeded" }] });
        let outcome = outcome_of(&body);
        assert_eq!(outcome, FollowOutcome::RateLimited);
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_other_error_and_missing_message() {
        let body = json!({ "errors": [{ "message": "Internal server error" }] });
        assert_eq!(outcome_of(&body), FollowOutcome::ApiError);

        let body = json!({ "errors": [{ "code": 500 }] });
        assert_eq!(
            decode_follow_reply(&body),
            FollowReply::Rejected {
                message: "Unknown API error".to_string()
            }
        );
    }

    #[test]
    fn test_errors_short_circuit_data() {
        let body = json!({
            "errors": [{ "message": "Rate limit exceeded" }],
            "data": { "follow": { "vcFollowingStatus": "FOLLOWING" } }
        });
        assert_eq!(outcome_of(&body), FollowOutcome::RateLimited);
    }

    #[test]
    fn test_only_first_error_inspected() {
        let body = json!({
            "errors": [{ "message": "boom" }, { "message": "already following" }]
        });
        assert_eq!(outcome_of(&body), FollowOutcome::ApiError);
    }

    #[test]
    fn test_later_error_entries_are_ignored() {
        let body = json!({ "errors": [{ "message": "already following" }, "extra"] });
        assert_eq!(outcome_of(&body), FollowOutcome::AlreadyFollowing);

        let body = json!({ "errors": [{ "message": "Rate limit exceeded" }, null] });
        assert_eq!(outcome_of(&body), FollowOutcome::RateLimited);
    }

    #[test]
    fn test_non_string_message_is_unknown_error() {
        let body = json!({ "errors": [{ "message": 7 }] });
        assert_eq!(
            decode_follow_reply(&body),
            FollowReply::Rejected {
                message: "Unknown API error".to_string()
            }
        );
        assert_eq!(outcome_of(&body), FollowOutcome::ApiError);

        let body = json!({ "errors": ["just a string"] });
        assert_eq!(outcome_of(&body), FollowOutcome::ApiError);
    }

    #[test]
    fn test_following_status_is_success() {
        let body = json!({ "data": { "follow": { "vcFollowingStatus": "FOLLOWING" } } });
        assert_eq!(outcome_of(&body), FollowOutcome::Success);
    }

    #[test]
    fn test_success_typenames() {
        for typename in SUCCESS_TYPENAMES {
            let body = json!({ "data": { "follow": { "__typename": typename, "id": "1" } } });
            assert_eq!(outcome_of(&body), FollowOutcome::Success, "{typename}");
        }
    }

    #[test]
    fn test_unrecognized_status_is_malformed() {
        let body = json!({ "data": { "follow": { "status": "WEIRD" } } });
        let reply = decode_follow_reply(&body);
        assert!(matches!(reply, FollowReply::Unrecognized { .. }));
        assert_eq!(reply.outcome(), FollowOutcome::MalformedResponse);
        assert!(!reply.outcome().is_success());
    }

    #[test]
    fn test_empty_reply_is_malformed() {
        assert_eq!(outcome_of(&json!({})), FollowOutcome::MalformedResponse);
        assert_eq!(
            outcome_of(&json!({ "data": null })),
            FollowOutcome::MalformedResponse
        );
        assert_eq!(
            outcome_of(&json!({ "errors": [], "data": null })),
            FollowOutcome::MalformedResponse
        );
    }

    #[test]
    fn test_structural_anomalies_are_malformed() {
        for body in [
            json!([]),
            json!("ok"),
            json!({ "data": "yes" }),
            json!({ "data": {} }),
            json!({ "data": { "follow": null } }),
            json!({ "data": { "follow": [1] } }),
            json!({ "data": { "follow": { "vcFollowingStatus": 1 } } }),
            json!({ "errors": "nope" }),
        ] {
            assert_eq!(
                outcome_of(&body),
                FollowOutcome::MalformedResponse,
                "body: {body}"
            );
        }
    }
}
