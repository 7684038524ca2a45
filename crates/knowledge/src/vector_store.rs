use async_trait::async_trait;
use pgvector::Vector;
use rag_demo_common::{config::is_plain_identifier, Document, RagError, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// Maximum number of texts returned by a similarity search.
pub const SEARCH_LIMIT: usize = 2;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Appends one row. No deduplication.
    async fn insert(&self, document: &Document) -> Result<()>;

    /// Returns at most [`SEARCH_LIMIT`] texts ordered nearest first by
    /// Euclidean distance to `embedding`.
    async fn similarity_search(&self, embedding: &[f32]) -> Result<Vec<String>>;
}

fn db_error(err: sqlx::Error) -> RagError {
    RagError::Database(err.to_string())
}

/// PostgreSQL table with a pgvector `embedding` column.
pub struct PgVectorStore {
    pool: PgPool,
    table: String,
}

impl PgVectorStore {
    /// Opens a single connection and pings it.
    #[instrument(skip(database_url))]
    pub async fn connect(database_url: &str, table: &str) -> Result<Self> {
        if !is_plain_identifier(table) {
            return Err(RagError::Configuration(format!(
                "invalid table name: {}",
                table
            )));
        }

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .map_err(db_error)?;

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(db_error)?;

        info!("Connected to vector store, table {}", table);

        Ok(Self {
            pool,
            table: table.to_string(),
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Releases the connection.
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("Vector store connection closed");
    }

    fn insert_sql(&self) -> String {
        format!("INSERT INTO {} (text, embedding) VALUES ($1, $2)", self.table)
    }

    fn search_sql(&self) -> String {
        format!(
            "SELECT text FROM {} ORDER BY embedding <-> $1 LIMIT {}",
            self.table, SEARCH_LIMIT
        )
    }
}

#[async_trait]
impl VectorStore for PgVectorStore {
    async fn insert(&self, document: &Document) -> Result<()> {
        sqlx::query(&self.insert_sql())
            .bind(&document.text)
            .bind(Vector::from(document.embedding.clone()))
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        debug!("Inserted document ({} chars)", document.text.len());
        Ok(())
    }

    async fn similarity_search(&self, embedding: &[f32]) -> Result<Vec<String>> {
        let texts = sqlx::query_scalar::<_, String>(&self.search_sql())
            .bind(Vector::from(embedding.to_vec()))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        debug!("Similarity search returned {} rows", texts.len());
        Ok(texts)
    }
}

/// Vector store held in memory, ordered the same way as pgvector's `<->`.
#[derive(Default)]
pub struct InMemoryStore {
    documents: RwLock<Vec<Document>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents: RwLock::new(documents),
        }
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

pub fn euclidean_distance(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(RagError::Database(format!(
            "different vector dimensions {} and {}",
            a.len(),
            b.len()
        )));
    }

    Ok(a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt())
}

#[async_trait]
impl VectorStore for InMemoryStore {
    async fn insert(&self, document: &Document) -> Result<()> {
        self.documents.write().await.push(document.clone());
        Ok(())
    }

    async fn similarity_search(&self, embedding: &[f32]) -> Result<Vec<String>> {
        let documents = self.documents.read().await;

        let mut scored = documents
            .iter()
            .map(|doc| euclidean_distance(&doc.embedding, embedding).map(|d| (d, doc)))
            .collect::<Result<Vec<_>>>()?;

        // Stable sort keeps insertion order for equal distances
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(scored
            .into_iter()
            .take(SEARCH_LIMIT)
            .map(|(_, doc)| doc.text.clone())
            .collect())
    }
}
