//! Context selection from ranked passages.

use history_store::ChunkScores;
use rag_search::{Passage, rank_passages};

/// Number of ranked passages whose scores are reported on every turn.
pub const SCORED_CHUNKS: usize = 2;

/// Keep the best `k` passages by reranker score.
///
/// Ordering is re-applied so a provider that returns unsorted hits still
/// yields the expected selection; ties keep the provider order.
pub fn top_passages(passages: Vec<Passage>, k: usize) -> Vec<Passage> {
    rank_passages(passages, k)
}

/// Rounded scores of the first and second ranked passages.
pub fn chunk_scores(ranked: &[Passage]) -> (Option<ChunkScores>, Option<ChunkScores>) {
    let score = |p: &Passage| ChunkScores::rounded(p.search_score, p.reranker_score);
    (ranked.first().map(score), ranked.get(1).map(score))
}

/// Storage paths of the selected passages, in prompt order.
pub fn sources(selected: &[Passage]) -> Vec<String> {
    selected.iter().filter_map(|p| p.source.clone()).collect()
}
