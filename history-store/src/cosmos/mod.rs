//! Azure Cosmos DB (SQL API) adapter over plain REST.
//!
//! Document operations used:
//! - create:  POST {endpoint}/dbs/{db}/colls/{coll}/docs
//! - read:    GET  {endpoint}/dbs/{db}/colls/{coll}/docs/{id}
//! - replace: PUT  {endpoint}/dbs/{db}/colls/{coll}/docs/{id}
//! - query:   POST {endpoint}/dbs/{db}/colls/{coll}/docs (application/query+json)
//!
//! The container is partitioned on `/session_id`.

mod auth;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, RequestBuilder, Response, StatusCode, header};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};

use crate::{
    HistoryStore, config::CosmosConfig, errors::HistoryStoreError, record::ChatTurn,
};
use auth::{MasterKey, http_date};

const API_VERSION: &str = "2018-12-31";
const SNIPPET_MAX: usize = 240;

/// History store backed by one Cosmos DB container.
pub struct CosmosHistoryStore {
    client: reqwest::Client,
    key: MasterKey,
    base: String,
    collection_link: String,
}

impl CosmosHistoryStore {
    /// Decodes the master key and builds the HTTP client.
    ///
    /// # Errors
    /// - [`HistoryStoreError::Auth`] if the key is not base64
    /// - [`HistoryStoreError::Transport`] if the client cannot be built
    pub fn new(cfg: CosmosConfig) -> Result<Self, HistoryStoreError> {
        let key = MasterKey::from_base64(&cfg.account_key)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        info!(
            endpoint = %cfg.endpoint,
            database = %cfg.database,
            container = %cfg.container,
            "CosmosHistoryStore initialized"
        );

        Ok(Self {
            client,
            key,
            base: cfg.endpoint.trim_end_matches('/').to_string(),
            collection_link: cfg.collection_link(),
        })
    }

    fn docs_url(&self) -> String {
        format!("{}/{}/docs", self.base, self.collection_link)
    }

    fn doc_link(&self, id: &str) -> String {
        format!("{}/docs/{}", self.collection_link, id)
    }

    /// Prepares a signed request against `resource_link` in the given partition.
    fn request(
        &self,
        method: Method,
        url: &str,
        resource_link: &str,
        session_id: &str,
    ) -> Result<RequestBuilder, HistoryStoreError> {
        let date = http_date(Utc::now());
        let token = self
            .key
            .token(method.as_str(), "docs", resource_link, &date)?;
        let mut auth = header::HeaderValue::from_str(&token)
            .map_err(|e| HistoryStoreError::Auth(e.to_string()))?;
        auth.set_sensitive(true);

        let partition = serde_json::to_string(&[session_id])?;

        Ok(self
            .client
            .request(method, url)
            .header(header::AUTHORIZATION, auth)
            .header("x-ms-date", date)
            .header("x-ms-version", API_VERSION)
            .header("x-ms-documentdb-partitionkey", partition))
    }

    async fn fail(resp: Response, url: &str, started: Instant) -> HistoryStoreError {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        let snippet = make_snippet(&text);
        error!(
            %status,
            %url,
            %snippet,
            latency_ms = started.elapsed().as_millis(),
            "cosmos request failed"
        );
        HistoryStoreError::HttpStatus {
            status,
            url: url.to_string(),
            snippet,
        }
    }
}

#[async_trait]
impl HistoryStore for CosmosHistoryStore {
    async fn append_turn(&self, turn: &ChatTurn) -> Result<(), HistoryStoreError> {
        let started = Instant::now();
        let url = self.docs_url();
        debug!(session_id = %turn.session_id, id = %turn.id, "POST {url}");

        let resp = self
            .request(Method::POST, &url, &self.collection_link, &turn.session_id)?
            .json(turn)
            .send()
            .await?;

        if resp.status() == StatusCode::CONFLICT {
            return Err(HistoryStoreError::Conflict {
                session_id: turn.session_id.clone(),
                id: turn.id.clone(),
            });
        }
        if !resp.status().is_success() {
            return Err(Self::fail(resp, &url, started).await);
        }
        debug!(latency_ms = started.elapsed().as_millis(), "turn created");
        Ok(())
    }

    async fn get_turn(
        &self,
        session_id: &str,
        id: &str,
    ) -> Result<Option<ChatTurn>, HistoryStoreError> {
        if !is_valid_id(id) {
            return Ok(None);
        }
        let started = Instant::now();
        let link = self.doc_link(id);
        let url = format!("{}/{}", self.base, link);
        debug!(%session_id, %id, "GET {url}");

        let resp = self
            .request(Method::GET, &url, &link, session_id)?
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => Ok(Some(resp.json::<ChatTurn>().await?)),
            _ => Err(Self::fail(resp, &url, started).await),
        }
    }

    async fn replace_turn(&self, turn: &ChatTurn) -> Result<bool, HistoryStoreError> {
        if !is_valid_id(&turn.id) {
            return Ok(false);
        }
        let started = Instant::now();
        let link = self.doc_link(&turn.id);
        let url = format!("{}/{}", self.base, link);
        debug!(session_id = %turn.session_id, id = %turn.id, "PUT {url}");

        let resp = self
            .request(Method::PUT, &url, &link, &turn.session_id)?
            .json(turn)
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(false),
            s if s.is_success() => Ok(true),
            _ => Err(Self::fail(resp, &url, started).await),
        }
    }

    async fn recent_turns(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatTurn>, HistoryStoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let started = Instant::now();
        let url = self.docs_url();
        let body = json!({
            "query": "SELECT * FROM c WHERE c.session_id = @session_id \
                      ORDER BY c.timestamp DESC OFFSET 0 LIMIT @limit",
            "parameters": [
                { "name": "@session_id", "value": session_id },
                { "name": "@limit", "value": limit }
            ]
        });
        debug!(%session_id, limit, "query {url}");

        let resp = self
            .request(Method::POST, &url, &self.collection_link, session_id)?
            .header(header::CONTENT_TYPE, "application/query+json")
            .header("x-ms-documentdb-isquery", "True")
            .body(serde_json::to_vec(&body)?)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::fail(resp, &url, started).await);
        }

        let page: QueryPage = resp.json().await?;
        let mut turns = page.documents;
        turns.reverse();
        Ok(turns)
    }
}

#[derive(Debug, Deserialize)]
struct QueryPage {
    #[serde(rename = "Documents", default)]
    documents: Vec<ChatTurn>,
}

/// Cosmos rejects ids containing path or query delimiters.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(['/', '\\', '?', '#'])
}

fn make_snippet(body: &str) -> String {
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(SNIPPET_MAX).collect()
}
