//! Hosted content store client.
//!
//! Queries go to the HTTP query API, optionally through the API CDN; writes
//! go to the mutate API, never through the CDN, and require a write token.
//!
//! ```text
//! GET  https://{project}.apicdn.sanity.io/v{api_version}/data/query/{dataset}?query=…
//! POST https://{project}.api.sanity.io/v{api_version}/data/mutate/{dataset}?returnIds=true
//! ```

use super::{ContentStore, DocumentWriter, Query, SourceError};
use crate::config::ContentConfig;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::warn;

pub struct SanityStore {
    client: reqwest::Client,
    base_url: String,
    dataset: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

#[derive(Deserialize)]
struct MutateResponse {
    #[serde(default)]
    results: Vec<MutateResult>,
}

#[derive(Deserialize)]
struct MutateResult {
    id: String,
}

impl SanityStore {
    /// A read client. `token` is only needed for private datasets.
    pub fn new(config: &ContentConfig, token: Option<String>) -> Result<Self, SourceError> {
        Self::build(config, token, config.use_cdn)
    }

    /// A client for the mutate API.
    pub fn writer(config: &ContentConfig, token: String) -> Result<Self, SourceError> {
        Self::build(config, Some(token), false)
    }

    fn build(
        config: &ContentConfig,
        token: Option<String>,
        use_cdn: bool,
    ) -> Result<Self, SourceError> {
        if config.project_id.is_empty() {
            return Err(SourceError::Configuration("project_id is empty".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let host = if use_cdn { "apicdn" } else { "api" };
        Ok(Self {
            client,
            base_url: format!(
                "https://{}.{host}.sanity.io/v{}",
                config.project_id, config.api_version
            ),
            dataset: config.dataset.clone(),
            token,
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, SourceError> {
        let response = self.authorize(request).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout
            } else {
                SourceError::Http(e)
            }
        })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "content store request failed");
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Normalize the query envelope's `result` into a record list.
fn result_records(result: Value) -> Vec<Value> {
    match result {
        Value::Array(values) => values,
        Value::Null => Vec::new(),
        value => vec![value],
    }
}

#[async_trait]
impl ContentStore for SanityStore {
    async fn fetch(&self, query: &Query) -> Result<Vec<Value>, SourceError> {
        let url = format!("{}/data/query/{}", self.base_url, self.dataset);
        let request = self.client.get(url).query(&[("query", query.groq())]);
        let response = self.send(request).await?;
        let envelope: QueryResponse = response.json().await?;
        Ok(result_records(envelope.result))
    }
}

#[async_trait]
impl DocumentWriter for SanityStore {
    async fn create(&self, document: Value) -> Result<String, SourceError> {
        if self.token.is_none() {
            return Err(SourceError::Configuration("write token missing".into()));
        }
        let url = format!(
            "{}/data/mutate/{}?returnIds=true",
            self.base_url, self.dataset
        );
        let body = json!({ "mutations": [{ "create": document }] });
        let response = self.send(self.client.post(url).json(&body)).await?;
        let mutated: MutateResponse = response.json().await?;
        mutated
            .results
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| SourceError::Status {
                status: 200,
                body: "mutation returned no document id".into(),
            })
    }
}
