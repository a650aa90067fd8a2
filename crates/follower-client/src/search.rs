//! Profile search client.

use crate::api::{ProfileSearch, SearchOutcome};
use crate::http::HttpSession;
use async_trait::async_trait;
use follower_core::config::SEARCH_INPUT_PLACEHOLDER;
use follower_core::{ApiConfig, IdentifierField, ProfileIdentifier};
use serde_json::{json, Value};
use std::sync::Arc;

/// Queries the profile directory and extracts identifiers from the hits.
pub struct SearchClient {
    session: Arc<HttpSession>,
    url_template: String,
    field: IdentifierField,
}

impl SearchClient {
    /// Create a search client sharing `session`.
    #[must_use]
    pub fn new(session: Arc<HttpSession>, api: &ApiConfig) -> Self {
        Self {
            session,
            url_template: api.search_url_template.clone(),
            field: api.identifier_field,
        }
    }
}

#[async_trait]
impl ProfileSearch for SearchClient {
    async fn search(&self, term: &str) -> SearchOutcome {
        tracing::info!(term, "Searching profiles");
        let url = build_search_url(&self.url_template, term);
        let description = format!("search for '{term}'");

        match self.session.get_json(&url, &description).await {
            Ok(body) => {
                let ids = extract_identifiers(&body, self.field);
                if ids.is_empty() {
                    tracing::info!(term, "No profiles found");
                } else {
                    tracing::info!(
                        term,
                        count = ids.len(),
                        field = %self.field,
                        "Found profile identifiers"
                    );
                    tracing::debug!(term, ?ids, "Identifiers found");
                }
                SearchOutcome::Found(ids)
            }
            Err(e) if e.is_rate_limited() => {
                tracing::warn!(term, error = %e, "Search rate limited");
                SearchOutcome::Failed
            }
            Err(e) => {
                tracing::error!(term, error = %e, "Search failed");
                SearchOutcome::Failed
            }
        }
    }
}

/// Fill the URL template with the URL-encoded `{"json":{"text":term}}` query.
#[must_use]
pub fn build_search_url(template: &str, term: &str) -> String {
    let input = json!({ "json": { "text": term } }).to_string();
    template.replace(SEARCH_INPUT_PLACEHOLDER, &urlencoding::encode(&input))
}

/// Pull identifiers out of `result.data.json.profiles[*].<field>`.
///
/// String values are kept as-is and non-zero numbers are stringified.
/// Hits without a usable value are skipped with a debug line. Any other
/// body shape yields an empty list.
#[must_use]
pub fn extract_identifiers(body: &Value, field: IdentifierField) -> Vec<ProfileIdentifier> {
    body.pointer("/result/data/json/profiles")
        .and_then(Value::as_array)
        .map(|profiles| {
            profiles
                .iter()
                .filter_map(|profile| identifier_of(profile, field))
                .collect()
        })
        .unwrap_or_default()
}

fn identifier_of(profile: &Value, field: IdentifierField) -> Option<ProfileIdentifier> {
    match profile.get(field.as_str()) {
        Some(Value::String(id)) if !id.is_empty() => Some(ProfileIdentifier::new(id.as_str())),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => {
            Some(ProfileIdentifier::new(n.to_string()))
        }
        other => {
            tracing::debug!(field = %field, value = ?other, "Skipping search hit without a usable identifier");
            None
        }
    }
}
