//! Follow mutation client.

use crate::api::FollowAction;
use crate::decode::{decode_follow_reply, FollowReply};
use crate::http::HttpSession;
use async_trait::async_trait;
use follower_core::{ApiConfig, FollowOutcome, ProfileIdentifier};
use serde::Serialize;
use std::sync::Arc;

/// GraphQL mutation creating the follow relationship.
pub const FOLLOW_MUTATION: &str = r"
mutation useFollowsMutation_followMutation(
  $profileId: String!
) {
  follow(followeeId: $profileId) {
    __typename
    ...FollowButton_profile
    id
  }
}

fragment FollowButton_profile on IGraphQLProfile {
  __isIGraphQLProfile: __typename
  vcFollowingStatus
}
";

#[derive(Debug, Serialize)]
struct FollowRequest<'a> {
    query: &'static str,
    variables: FollowVariables<'a>,
}

#[derive(Debug, Serialize)]
struct FollowVariables<'a> {
    #[serde(rename = "profileId")]
    profile_id: &'a str,
}

/// Sends follow mutations and classifies the replies.
pub struct FollowClient {
    session: Arc<HttpSession>,
    url: String,
}

impl FollowClient {
    /// Create a follow client sharing `session`.
    #[must_use]
    pub fn new(session: Arc<HttpSession>, api: &ApiConfig) -> Self {
        Self {
            session,
            url: api.follow_url.clone(),
        }
    }
}

#[async_trait]
impl FollowAction for FollowClient {
    async fn follow(&self, id: &ProfileIdentifier) -> FollowOutcome {
        let payload = FollowRequest {
            query: FOLLOW_MUTATION,
            variables: FollowVariables {
                profile_id: id.as_str(),
            },
        };
        let description = format!("follow '{id}'");

        match self.session.post_json(&self.url, &payload, &description).await {
            Ok(body) => {
                let reply = decode_follow_reply(&body);
                let outcome = reply.outcome();
                log_outcome(id, &reply, outcome);
                outcome
            }
            Err(e) => {
                if e.is_rate_limited() {
                    tracing::warn!(identifier = %id, error = %e, "Follow request rate limited (HTTP)");
                } else {
                    tracing::error!(identifier = %id, error = %e, "Follow request failed");
                }
                FollowOutcome::NetworkFailure
            }
        }
    }
}

/// Emit the single log line for a classified reply.
fn log_outcome(id: &ProfileIdentifier, reply: &FollowReply, outcome: FollowOutcome) {
    match (reply, outcome) {
        (FollowReply::Followed { status, typename }, _) => {
            tracing::info!(
                identifier = %id,
                status = status.as_deref().unwrap_or("-"),
                typename = typename.as_deref().unwrap_or("-"),
                "Successfully followed"
            );
        }
        (FollowReply::Rejected { .. }, FollowOutcome::AlreadyFollowing) => {
            tracing::info!(identifier = %id, "Already following, considered success");
        }
        (FollowReply::Rejected { .. }, FollowOutcome::InvalidIdentifier) => {
            tracing::warn!(identifier = %id, "Failed to follow: invalid user identifier");
        }
        (FollowReply::Rejected { message }, FollowOutcome::RateLimited) => {
            tracing::warn!(identifier = %id, message = %message, "Rate limit hit while following");
        }
        (FollowReply::Rejected { message }, _) => {
            tracing::error!(identifier = %id, message = %message, "Failed to follow: API error");
        }
        (
            FollowReply::Unrecognized {
                status,
                typename,
                detail,
            },
            _,
        ) => {
            tracing::warn!(
                identifier = %id,
                status = status.as_deref().unwrap_or("-"),
                typename = typename.as_deref().unwrap_or("-"),
                "Follow completed but status/type unexpected"
            );
            tracing::debug!(identifier = %id, "Unexpected follow response details: {}", detail);
        }
        (FollowReply::Malformed { reason }, _) => {
            tracing::warn!(identifier = %id, reason, "Malformed follow response");
        }
    }
}
