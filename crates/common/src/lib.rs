pub mod config;
pub mod http;

pub use config::RagConfig;
pub use http::OpenAiHttp;

use serde::{Deserialize, Serialize};

// Document record stored in the vector table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub embedding: Vec<f32>,
}

impl Document {
    pub fn new(text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            text: text.into(),
            embedding,
        }
    }
}

// Error types
#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("http request not returned ok ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Empty response: {0}")]
    EmptyResponse(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for RagError {
    fn from(err: reqwest::Error) -> Self {
        RagError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for RagError {
    fn from(err: serde_json::Error) -> Self {
        RagError::Http(format!("malformed response body: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, RagError>;
