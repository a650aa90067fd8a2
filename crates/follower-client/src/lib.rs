//! Follower Client - HTTP access to the profile directory.
//!
//! This crate talks to the two remote endpoints: the profile search
//! endpoint and the GraphQL follow mutation. Every request failure is
//! recovered here and turned into a value; nothing in the public
//! `search`/`follow` contracts returns an error.
//!
//! # Example
//!
//! ```rust,ignore
//! use follower_client::{FollowAction, FollowClient, HttpSession, ProfileSearch, SearchClient};
//! use std::sync::Arc;
//!
//! let session = Arc::new(HttpSession::new(&config.api, token)?);
//! let search = SearchClient::new(session.clone(), &config.api);
//! let follow = FollowClient::new(session, &config.api);
//!
//! for id in search.search("alice").await.into_identifiers() {
//!     let outcome = follow.follow(&id).await;
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod api;
pub mod decode;
pub mod error;
pub mod follow;
pub mod http;
pub mod search;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use api::{FollowAction, ProfileSearch, SearchOutcome};
pub use decode::{decode_follow_reply, FollowReply};
pub use error::{ClientError, Result};
pub use follow::FollowClient;
pub use http::HttpSession;
pub use search::{build_search_url, extract_identifiers, SearchClient};
