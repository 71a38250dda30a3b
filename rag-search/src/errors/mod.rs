pub mod rag_search_error;
