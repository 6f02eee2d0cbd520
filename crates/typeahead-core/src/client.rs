use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::ServiceConfig;
use crate::error::{Result, TypeaheadError};

pub const DEFAULT_USER_AGENT: &str = concat!("typeahead/", env!("CARGO_PKG_VERSION"));

/// Anything that can answer an autocomplete query.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Return at most `size` completions for `query`, in service order.
    async fn suggest(&self, query: &str, size: usize) -> Result<Vec<String>>;
}

/// Body returned by `GET /autocomplete`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AutocompleteResponse {
    #[serde(default)]
    pub suggestions: Option<Vec<String>>,
}

// ─── SuggestionClient ─────────────────────────────────────────────────────────

/// HTTP client for the remote suggestion service.
pub struct SuggestionClient {
    client: reqwest::Client,
    base_url: String,
}

impl SuggestionClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_params(base_url, DEFAULT_USER_AGENT, None)
    }

    pub fn with_params(base_url: &str, user_agent: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent).gzip(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::with_params(&config.base_url, &config.user_agent, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base>/autocomplete?query=<q>&size=<n>`, with the query percent-encoded.
    pub fn autocomplete_url(&self, query: &str, size: usize) -> String {
        format!(
            "{}/autocomplete?query={}&size={size}",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    async fn get(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(TypeaheadError::Api(
                url.to_string(),
                format!("HTTP {status}: {body}"),
            ));
        }
        resp.text().await.map_err(TypeaheadError::Http)
    }

    pub async fn fetch_suggestions(&self, query: &str, size: usize) -> Result<Vec<String>> {
        let url = self.autocomplete_url(query, size);
        tracing::debug!(%url, "requesting suggestions");
        let text = self.get(&url).await?;
        parse_suggestions(&text)
    }
}

#[async_trait]
impl SuggestionSource for SuggestionClient {
    async fn suggest(&self, query: &str, size: usize) -> Result<Vec<String>> {
        self.fetch_suggestions(query, size).await
    }
}

/// Extract the suggestion list from a response body.
///
/// Any JSON value that is not an object with a `suggestions` string array
/// yields an empty list. Only a body that is not JSON at all is an error.
pub fn parse_suggestions(body: &str) -> Result<Vec<String>> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| TypeaheadError::Parse(e.to_string()))?;

    match serde_json::from_value::<AutocompleteResponse>(value) {
        Ok(resp) => Ok(resp.suggestions.unwrap_or_default()),
        Err(e) => {
            tracing::debug!(error = %e, "unexpected response shape, treating as empty");
            Ok(Vec::new())
        }
    }
}
