//! Azure Cognitive Search client (semantic query mode).

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::{
    SearchProvider,
    errors::rag_search_error::RagSearchError,
    structs::{
        passage::{Passage, SearchResponse, rank_passages},
        rag_search_config::SearchConfig,
    },
};

const SNIPPET_MAX: usize = 240;

/// Semantic search over one Azure Cognitive Search index.
#[derive(Debug)]
pub struct AzureSearchClient {
    client: reqwest::Client,
    cfg: SearchConfig,
    url: String,
}

impl AzureSearchClient {
    /// Builds the HTTP client with the `api-key` header preset.
    pub fn new(cfg: SearchConfig) -> Result<Self, RagSearchError> {
        cfg.validate()?;

        let mut headers = header::HeaderMap::new();
        let mut key = header::HeaderValue::from_str(&cfg.api_key)
            .map_err(|e| RagSearchError::InvalidConfig(format!("invalid SEARCH_KEY: {e}")))?;
        key.set_sensitive(true);
        headers.insert(header::HeaderName::from_static("api-key"), key);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .default_headers(headers)
            .build()?;

        let url = cfg.search_url();
        info!(
            target: "rag_search::client",
            index = %cfg.index_name,
            semantic_configuration = %cfg.semantic_configuration,
            top_k = cfg.top_k,
            "search client initialized"
        );

        Ok(Self { client, cfg, url })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.cfg
    }
}

#[async_trait]
impl SearchProvider for AzureSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<Passage>, RagSearchError> {
        let started = Instant::now();
        let body = SemanticQuery {
            search: query,
            query_type: "semantic",
            semantic_configuration: &self.cfg.semantic_configuration,
            top: self.cfg.top_k,
            captions: "extractive",
            answers: "extractive",
            query_language: "en-us",
            speller: "lexicon",
        };

        debug!(target: "rag_search::search", query_len = query.len(), "POST {}", self.url);
        let resp = self.client.post(&self.url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);
            error!(
                target: "rag_search::search",
                %status,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "search returned non-success status"
            );
            return Err(RagSearchError::HttpStatus {
                status,
                url: self.url.clone(),
                snippet,
            });
        }

        let parsed: SearchResponse = resp
            .json()
            .await
            .map_err(|e| RagSearchError::Decode(e.to_string()))?;

        let passages = rank_passages(
            parsed.value.into_iter().map(Passage::from).collect(),
            self.cfg.top_k,
        );

        info!(
            target: "rag_search::search",
            hits = passages.len(),
            latency_ms = started.elapsed().as_millis(),
            "search completed"
        );
        Ok(passages)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SemanticQuery<'a> {
    search: &'a str,
    query_type: &'a str,
    semantic_configuration: &'a str,
    top: usize,
    captions: &'a str,
    answers: &'a str,
    query_language: &'a str,
    speller: &'a str,
}

/// Whitespace-collapsed prefix of an error body.
fn make_snippet(body: &str) -> String {
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(SNIPPET_MAX).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_body_uses_wire_names() {
        let body = SemanticQuery {
            search: "what is it",
            query_type: "semantic",
            semantic_configuration: "pr1semantic",
            top: 5,
            captions: "extractive",
            answers: "extractive",
            query_language: "en-us",
            speller: "lexicon",
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["queryType"], "semantic");
        assert_eq!(v["semanticConfiguration"], "pr1semantic");
        assert_eq!(v["queryLanguage"], "en-us");
        assert_eq!(v["top"], 5);
    }

    #[test]
    fn snippet_is_bounded() {
        let long = "x ".repeat(1000);
        assert!(make_snippet(&long).chars().count() <= SNIPPET_MAX);
    }
}
