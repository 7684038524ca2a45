use anyhow::{Context, Result};
use rag_demo_common::RagConfig;
use rag_demo_knowledge::PgVectorStore;
use std::sync::Arc;
use tracing::info;

mod telemetry;

const INPUT: &str = "Pasangan Jenderal TNI (Purn) Prabowo Subianto dan Gibran Rakabuming Raka
secara resmi mengemban tugas sebagai Presiden dan Wakil Presiden Republik Indonesia
masa jabatan 2024-2029 pada Minggu, 20 Oktober 2024.
Keduanya dilantik dalam Sidang Paripurna Majelis Permusyawaratan Rakyat (MPR)
dalam rangka Pelantikan Presiden dan Wakil Presiden Masa Jabatan 2024-2029
yang diselenggarakan di Gedung Nusantara MPR/DPR/DPD RI, Jakarta.";

// Literal separator, not an escaped blank line
const SEPARATOR: &str = "/n/n";

#[tokio::main]
async fn main() -> Result<()> {
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

    for (index, chunk) in INPUT.split(SEPARATOR).enumerate() {
        let document = pipeline
            .ingest(chunk)
            .await
            .with_context(|| format!("failed to ingest chunk {}", index))?;
        info!(
            "Inserted chunk {} ({} dimensions)",
            index,
            document.embedding.len()
        );
    }

    store.close().await;
    Ok(())
}
