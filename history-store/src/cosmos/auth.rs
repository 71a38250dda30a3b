//! Master-key authorization tokens for the Cosmos DB REST API.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::HistoryStoreError;

type HmacSha256 = Hmac<Sha256>;

/// Signs requests with a decoded master key.
#[derive(Clone)]
pub(crate) struct MasterKey {
    key: Vec<u8>,
}

impl MasterKey {
    pub(crate) fn from_base64(encoded: &str) -> Result<Self, HistoryStoreError> {
        let key = STANDARD
            .decode(encoded.trim())
            .map_err(|e| HistoryStoreError::Auth(format!("AccountKey is not valid base64: {e}")))?;
        if key.is_empty() {
            return Err(HistoryStoreError::Auth("AccountKey is empty".into()));
        }
        Ok(Self { key })
    }

    /// Builds the url-encoded `Authorization` header value.
    ///
    /// `resource_link` is the parent collection link for feed operations
    /// (create, query) and the document link for item operations.
    pub(crate) fn token(
        &self,
        verb: &str,
        resource_type: &str,
        resource_link: &str,
        date: &str,
    ) -> Result<String, HistoryStoreError> {
        let payload = format!(
            "{}\n{}\n{}\n{}\n\n",
            verb.to_lowercase(),
            resource_type.to_lowercase(),
            resource_link,
            date.to_lowercase()
        );

        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| HistoryStoreError::Auth(e.to_string()))?;
        mac.update(payload.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        let raw = format!("type=master&ver=1.0&sig={signature}");
        Ok(url::form_urlencoded::byte_serialize(raw.as_bytes()).collect())
    }
}

/// RFC 1123 date as expected in `x-ms-date`.
pub(crate) fn http_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
