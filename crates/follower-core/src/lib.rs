//! Follower Core - Foundation crate for the follower tool.
//!
//! This crate provides shared types, error handling and configuration
//! management that the client, engine and CLI crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Shared newtypes and enums (`ProfileIdentifier`, `IdentifierField`, `FollowOutcome`)
//!
//! # Example
//!
//! ```rust
//! use follower_core::{FollowOutcome, FollowerConfig};
//!
//! let config = FollowerConfig::default();
//! assert_eq!(config.run.batch_size, 30);
//! assert!(FollowOutcome::AlreadyFollowing.is_success());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{ApiConfig, AuthToken, FollowerConfig, RunConfig, AUTH_TOKEN_ENV};
pub use error::{ConfigError, ConfigResult, FollowerError, Result};
pub use types::{FollowOutcome, IdentifierField, ProfileIdentifier};
