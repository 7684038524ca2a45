use std::sync::Arc;

use rag_demo_common::{Document, Result};
use tracing::{debug, info};

use crate::{Embedder, VectorStore};

/// Embeds text and runs it against a vector store.
#[derive(Clone)]
pub struct SemanticSearch {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl SemanticSearch {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    pub async fn search(&self, query: &str) -> Result<Vec<String>> {
        debug!("Searching for: {}", query);

        let embedding = self.embedder.embed(query).await?;
        let texts = self.store.similarity_search(&embedding).await?;

        info!("Found {} relevant documents", texts.len());
        Ok(texts)
    }

    /// Embeds `text` and stores it as a new row.
    pub async fn index(&self, text: &str) -> Result<Document> {
        let embedding = self.embedder.embed(text).await?;
        let document = Document::new(text, embedding);

        self.store.insert(&document).await?;

        info!("Stored document with {} dimensions", document.embedding.len());
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MockEmbedder;
    use crate::vector_store::MockVectorStore;
    use crate::InMemoryStore;
    use rag_demo_common::RagError;

    #[tokio::test]
    async fn test_search_embeds_then_queries_store() {
        let mut embedder = MockEmbedder::new();
        embedder
            .expect_embed()
            .times(1)
            .returning(|text| {
                assert_eq!(text, "presiden");
                Ok(vec![0.0, 0.0])
            });

        let store = InMemoryStore::with_documents(vec![
            Document::new("b", vec![2.0, 0.0]),
            Document::new("a", vec![1.0, 0.0]),
            Document::new("c", vec![3.0, 0.0]),
        ]);

        let search = SemanticSearch::new(Arc::new(embedder), Arc::new(store));
        let texts = search.search("presiden").await.unwrap();

        assert_eq!(texts, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_embedding_failure_skips_store() {
        let mut embedder = MockEmbedder::new();
        embedder
            .expect_embed()
            .returning(|_| Err(RagError::EmptyResponse("no data found in response".into())));

        let mut store = MockVectorStore::new();
        store.expect_similarity_search().never();

        let search = SemanticSearch::new(Arc::new(embedder), Arc::new(store));
        let result = search.search("anything").await;

        assert!(matches!(result, Err(RagError::EmptyResponse(_))));
    }

    #[tokio::test]
    async fn test_index_inserts_one_row() {
        let mut embedder = MockEmbedder::new();
        embedder.expect_embed().returning(|_| Ok(vec![0.5, 0.5]));

        let store = Arc::new(InMemoryStore::new());
        let search = SemanticSearch::new(Arc::new(embedder), store.clone());

        let document = search.index("Pelantikan presiden").await.unwrap();

        assert_eq!(document.text, "Pelantikan presiden");
        assert_eq!(store.len().await, 1);
    }
}
