//! Backend selection and Cosmos DB connection settings.

use std::fmt;

use crate::errors::HistoryStoreError;

/// Which store backs the chat history.
#[derive(Clone, Debug)]
pub enum HistoryConfig {
    /// Process-local store; contents are lost on restart.
    Memory,
    Cosmos(CosmosConfig),
}

impl HistoryConfig {
    /// Reads the backend choice from the environment.
    ///
    /// - `HISTORY_BACKEND` = `cosmos` | `memory` (default: `cosmos` when
    ///   `COSMOS_CONNECTION_STRING` is set, `memory` otherwise)
    /// - `COSMOS_CONNECTION_STRING`, `COSMOS_DB_NAME` (default `chatdb`),
    ///   `COSMOS_CONTAINER_NAME` (default `chatcontainer`),
    ///   `COSMOS_TIMEOUT_SECS` (default 30)
    pub fn from_env() -> Result<Self, HistoryStoreError> {
        let conn = env_non_empty("COSMOS_CONNECTION_STRING");
        let backend = env_non_empty("HISTORY_BACKEND").map(|v| v.to_ascii_lowercase());

        match (backend.as_deref(), conn) {
            (Some("memory"), _) | (None, None) => Ok(HistoryConfig::Memory),
            (Some("cosmos") | None, Some(cs)) => {
                let database = env_non_empty("COSMOS_DB_NAME").unwrap_or_else(|| "chatdb".into());
                let container = env_non_empty("COSMOS_CONTAINER_NAME")
                    .unwrap_or_else(|| "chatcontainer".into());
                let mut cfg = CosmosConfig::from_connection_string(&cs, database, container)?;
                if let Some(raw) = env_non_empty("COSMOS_TIMEOUT_SECS") {
                    cfg.timeout_secs = raw.parse().map_err(|_| {
                        HistoryStoreError::Config(format!("COSMOS_TIMEOUT_SECS is not a number: {raw}"))
                    })?;
                }
                Ok(HistoryConfig::Cosmos(cfg))
            }
            (Some("cosmos"), None) => Err(HistoryStoreError::EnvMissing {
                key: "COSMOS_CONNECTION_STRING".into(),
            }),
            (Some(other), _) => Err(HistoryStoreError::Config(format!(
                "unsupported HISTORY_BACKEND: {other}"
            ))),
        }
    }
}

/// Cosmos DB account, database and container coordinates.
#[derive(Clone)]
pub struct CosmosConfig {
    /// Account endpoint, e.g. `https://acct.documents.azure.com:443/`.
    pub endpoint: String,
    /// Base64 master key.
    pub account_key: String,
    pub database: String,
    pub container: String,
    pub timeout_secs: u64,
}

impl CosmosConfig {
    /// Parses `AccountEndpoint=...;AccountKey=...;` into a config.
    ///
    /// Keys are matched case-insensitively; values may contain `=`.
    pub fn from_connection_string(
        conn: &str,
        database: impl Into<String>,
        container: impl Into<String>,
    ) -> Result<Self, HistoryStoreError> {
        let mut endpoint = None;
        let mut key = None;

        for part in conn.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((name, value)) = part.split_once('=') else {
                continue;
            };
            match name.trim().to_ascii_lowercase().as_str() {
                "accountendpoint" => endpoint = Some(value.trim().to_string()),
                "accountkey" => key = Some(value.trim().to_string()),
                _ => {}
            }
        }

        let endpoint = endpoint.ok_or_else(|| {
            HistoryStoreError::Config("connection string lacks AccountEndpoint".into())
        })?;
        let account_key = key
            .ok_or_else(|| HistoryStoreError::Config("connection string lacks AccountKey".into()))?;

        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(HistoryStoreError::Config(format!(
                "AccountEndpoint must be an http(s) URL: {endpoint}"
            )));
        }

        Ok(Self {
            endpoint,
            account_key,
            database: database.into(),
            container: container.into(),
            timeout_secs: 30,
        })
    }

    /// `dbs/{db}/colls/{coll}`, the resource link of the container.
    pub fn collection_link(&self) -> String {
        format!("dbs/{}/colls/{}", self.database, self.container)
    }
}

impl fmt::Debug for CosmosConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CosmosConfig")
            .field("endpoint", &self.endpoint)
            .field("account_key", &"<redacted>")
            .field("database", &self.database)
            .field("container", &self.container)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
