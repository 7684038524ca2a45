//! Embedding, vector storage and nearest-neighbor retrieval

pub mod embedding;
pub mod semantic_search;
pub mod vector_store;

pub use embedding::{Embedder, EmbeddingClient};
pub use semantic_search::SemanticSearch;
pub use vector_store::{InMemoryStore, PgVectorStore, VectorStore, SEARCH_LIMIT};
