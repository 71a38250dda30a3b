use serde::{Deserialize, Serialize};

/// One retrieved document fragment with its relevance scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    /// Fragment text as stored in the index.
    pub content: String,
    /// Lexical relevance score (`@search.score`).
    pub search_score: f64,
    /// Semantic reranker score (`@search.rerankerScore`). `0.0` when absent.
    pub reranker_score: f64,
    /// Storage path of the source document when the index carries it.
    pub source: Option<String>,
}

/// Raw hit as returned by the search service.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchHit {
    #[serde(rename = "@search.score", default)]
    pub search_score: Option<f64>,
    #[serde(rename = "@search.rerankerScore", default)]
    pub reranker_score: Option<f64>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub metadata_storage_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub value: Vec<SearchHit>,
}

impl From<SearchHit> for Passage {
    fn from(hit: SearchHit) -> Self {
        Self {
            content: hit.content.or(hit.text).unwrap_or_default(),
            search_score: hit.search_score.unwrap_or(0.0),
            reranker_score: hit.reranker_score.unwrap_or(0.0),
            source: hit.metadata_storage_path,
        }
    }
}

/// Stable sort by reranker score (descending) and keep the first `top_k`.
///
/// Equal scores keep the service order.
pub fn rank_passages(mut passages: Vec<Passage>, top_k: usize) -> Vec<Passage> {
    passages.sort_by(|a, b| b.reranker_score.total_cmp(&a.reranker_score));
    passages.truncate(top_k);
    passages
}
