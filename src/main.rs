use anyhow::{Context, Result};
use rag_demo_common::RagConfig;
use rag_demo_knowledge::PgVectorStore;
use std::sync::Arc;
use tracing::info;

mod telemetry;

const QUERY: &str = "Siapkah presiden indonesia 2024?";

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    telemetry::init();

    let config = RagConfig::from_env();
    config.validate().context("invalid configuration")?;

    let store = Arc::new(
        PgVectorStore::connect(&config.database_url, &config.table)
            .await
            .context("failed to connect to vector store")?,
    );

    let pipeline = rag_demo_core::build_pipeline(&config, store.clone())?;

    info!("Answering: {}", QUERY);
    let answer = pipeline
        .answer(QUERY)
        .await
        .context("failed to answer query")?;

    println!("{}", answer.text);

    store.close().await;
    Ok(())
}
