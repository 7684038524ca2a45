use async_trait::async_trait;
use rag_demo_common::{OpenAiHttp, RagConfig, RagError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Turns `text` into a vector. No chunking or truncation happens here;
    /// over-long input surfaces as the upstream error.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

pub struct EmbeddingClient {
    http: OpenAiHttp,
    model: String,
}

impl EmbeddingClient {
    pub fn new(http: OpenAiHttp, model: impl Into<String>) -> Self {
        Self {
            http,
            model: model.into(),
        }
    }

    pub fn from_config(config: &RagConfig) -> Self {
        Self::new(OpenAiHttp::from_config(config), config.embedding_model.clone())
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    #[instrument(skip(self, text), fields(model = %self.model, chars = text.len()))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            input: text,
            model: &self.model,
        };

        let response: EmbeddingResponse = self.http.post_json("embeddings", &request).await?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| RagError::EmptyResponse("no data found in response".to_string()))?
            .embedding;

        debug!("Received embedding with {} dimensions", embedding.len());
        Ok(embedding)
    }
}
