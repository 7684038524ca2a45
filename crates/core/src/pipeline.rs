use std::sync::Arc;

use rag_demo_common::{Document, Result};
use rag_demo_knowledge::{Embedder, SemanticSearch, VectorStore};
use serde::Serialize;
use tracing::{info, instrument};

use crate::completion::ChatCompleter;

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    pub contexts: Vec<String>,
}

/// Retrieval followed by generation. Each step runs to completion before
/// the next starts and the first failure is returned as is.
pub struct RagPipeline {
    search: SemanticSearch,
    completer: Arc<dyn ChatCompleter>,
}

impl RagPipeline {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        completer: Arc<dyn ChatCompleter>,
    ) -> Self {
        Self {
            search: SemanticSearch::new(embedder, store),
            completer,
        }
    }

    pub fn search(&self) -> &SemanticSearch {
        &self.search
    }

    #[instrument(skip(self))]
    pub async fn answer(&self, query: &str) -> Result<Answer> {
        let contexts = self.search.search(query).await?;
        let text = self.completer.complete(query, &contexts).await?;

        info!("Answered query using {} contexts", contexts.len());
        Ok(Answer { text, contexts })
    }

    pub async fn ingest(&self, text: &str) -> Result<Document> {
        self.search.index(text).await
    }
}
