pub mod passage;
pub mod rag_search_config;
