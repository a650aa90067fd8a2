//! Configuration management for the follower tool.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. The bearer token is read from the
//! environment only and is never written to disk.

use crate::error::{ConfigError, ConfigResult, FollowerError};
use crate::types::IdentifierField;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the bearer token.
pub const AUTH_TOKEN_ENV: &str = "FOLLOWER_AUTH_TOKEN";

/// Placeholder value shipped in sample configs; treated as missing.
pub const AUTH_TOKEN_PLACEHOLDER: &str = "YOUR_FRESH_BEARER_TOKEN_HERE";

/// Main configuration.
///
/// This is loaded from `~/.config/follower/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerConfig {
    /// Remote endpoint settings
    pub api: ApiConfig,
    /// Batching and pacing settings
    pub run: RunConfig,
}

impl FollowerConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, using defaults if it is absent.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `FOLLOWER_NAMES_FILE`: Path of the newline-delimited names file
    /// - `FOLLOWER_BATCH_SIZE`: Names per batch
    /// - `FOLLOWER_MAX_WORKERS`: Worker-pool capacity per batch
    /// - `FOLLOWER_FOLLOW_DELAY_SECS`: Pause between follows for one term
    /// - `FOLLOWER_SUBMIT_DELAY_SECS`: Pause between task submissions
    /// - `FOLLOWER_IDENTIFIER_FIELD`: `profileId` or `handle`
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup. Values that fail to parse are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("FOLLOWER_NAMES_FILE") {
            if !val.trim().is_empty() {
                tracing::debug!("Override run.names_file from env: {}", val);
                self.run.names_file = PathBuf::from(val);
            }
        }

        if let Some(val) = lookup("FOLLOWER_BATCH_SIZE") {
            if let Ok(size) = val.parse() {
                self.run.batch_size = size;
                tracing::debug!("Override run.batch_size from env: {}", size);
            }
        }

        if let Some(val) = lookup("FOLLOWER_MAX_WORKERS") {
            if let Ok(workers) = val.parse() {
                self.run.max_workers = workers;
                tracing::debug!("Override run.max_workers from env: {}", workers);
            }
        }

        if let Some(val) = lookup("FOLLOWER_FOLLOW_DELAY_SECS") {
            if let Ok(secs) = val.parse() {
                self.run.follow_delay_secs = secs;
                tracing::debug!("Override run.follow_delay_secs from env: {}", secs);
            }
        }

        if let Some(val) = lookup("FOLLOWER_SUBMIT_DELAY_SECS") {
            if let Ok(secs) = val.parse() {
                self.run.submit_delay_secs = secs;
                tracing::debug!("Override run.submit_delay_secs from env: {}", secs);
            }
        }

        if let Some(val) = lookup("FOLLOWER_IDENTIFIER_FIELD") {
            match val.parse::<IdentifierField>() {
                Ok(field) => {
                    self.api.identifier_field = field;
                    tracing::debug!("Override api.identifier_field from env: {}", field);
                }
                Err(e) => tracing::debug!("Ignoring FOLLOWER_IDENTIFIER_FIELD: {}", e),
            }
        }
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.run.batch_size == 0 {
            return Err(invalid("run.batch_size", "must be at least 1"));
        }
        if self.run.max_workers == 0 {
            return Err(invalid("run.max_workers", "must be at least 1"));
        }
        for (field, secs) in [
            ("run.follow_delay_secs", self.run.follow_delay_secs),
            ("run.submit_delay_secs", self.run.submit_delay_secs),
        ] {
            if !secs.is_finite() || secs < 0.0 {
                return Err(invalid(field, "must be a non-negative number of seconds"));
            }
        }
        if self.api.timeout_secs == 0 {
            return Err(invalid("api.timeout_secs", "must be at least 1"));
        }
        if !self.api.search_url_template.contains(SEARCH_INPUT_PLACEHOLDER) {
            return Err(invalid(
                "api.search_url_template",
                "must contain the {input} placeholder",
            ));
        }
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/follower/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "follower", "follower").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Placeholder substituted with the URL-encoded search payload.
pub const SEARCH_INPUT_PLACEHOLDER: &str = "{input}";

/// Remote endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Profile search URL; `{input}` is replaced by the encoded query
    pub search_url_template: String,
    /// GraphQL endpoint receiving the follow mutation
    pub follow_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
    /// Search hit field used as the profile identifier
    pub identifier_field: IdentifierField,
}

impl ApiConfig {
    /// Per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            search_url_template:
                "https://zora.co/api/trpc/mobile.profiles.searchProfile?input={input}".to_string(),
            follow_url: "https://api.zora.co/universal/graphql".to_string(),
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            identifier_field: IdentifierField::ProfileId,
        }
    }
}

/// Batching and pacing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Newline-delimited names file
    pub names_file: PathBuf,
    /// Search terms per batch
    pub batch_size: usize,
    /// Concurrent term workers within a batch
    pub max_workers: usize,
    /// Pause between follows for the same search term, in seconds
    pub follow_delay_secs: f64,
    /// Pause between task submissions within a batch, in seconds
    pub submit_delay_secs: f64,
    /// Shuffle the names once before batching
    pub shuffle: bool,
}

impl RunConfig {
    /// Pause between follows for the same search term.
    ///
    /// Call [`FollowerConfig::validate`] first; invalid values collapse to zero.
    #[must_use]
    pub fn follow_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.follow_delay_secs).unwrap_or_default()
    }

    /// Pause between task submissions within a batch.
    #[must_use]
    pub fn submit_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.submit_delay_secs).unwrap_or_default()
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            names_file: PathBuf::from("names.txt"),
            batch_size: 30,
            max_workers: 1,
            follow_delay_secs: 3.0,
            submit_delay_secs: 0.1,
            shuffle: true,
        }
    }
}

/// Bearer token for both endpoints.
///
/// `Debug` and `Display` only reveal the first eight characters.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Validate and wrap a token.
    ///
    /// # Errors
    /// Returns [`FollowerError::MissingCredential`] for empty or placeholder values.
    pub fn new(token: impl Into<String>) -> Result<Self, FollowerError> {
        let token = token.into().trim().to_string();
        if token.is_empty() || token == AUTH_TOKEN_PLACEHOLDER {
            return Err(FollowerError::MissingCredential);
        }
        Ok(Self(token))
    }

    /// Read the token from `FOLLOWER_AUTH_TOKEN`.
    pub fn from_env() -> Result<Self, FollowerError> {
        std::env::var(AUTH_TOKEN_ENV)
            .map_err(|_| FollowerError::MissingCredential)
            .and_then(Self::new)
    }

    /// Full token, for the `Authorization` header only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First eight characters, safe to log.
    #[must_use]
    pub fn prefix(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map_or(self.0.len(), |(idx, _)| idx);
        &self.0[..end]
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken({}...)", self.prefix())
    }
}

impl fmt::Display for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}...", self.prefix())
    }
}
