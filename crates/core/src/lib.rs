pub mod completion;
pub mod pipeline;

pub use completion::{build_system_prompt, ChatCompleter, CompletionClient};
pub use pipeline::{Answer, RagPipeline};

use std::sync::Arc;

use rag_demo_common::{RagConfig, Result};
use rag_demo_knowledge::{EmbeddingClient, VectorStore};

/// Wires the OpenAI-backed clients from `config` around `store`.
pub fn build_pipeline(config: &RagConfig, store: Arc<dyn VectorStore>) -> Result<RagPipeline> {
    config.validate()?;

    Ok(RagPipeline::new(
        Arc::new(EmbeddingClient::from_config(config)),
        store,
        Arc::new(CompletionClient::from_config(config)),
    ))
}
