use async_trait::async_trait;
use rag_demo_common::{OpenAiHttp, RagConfig, RagError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Answers `user_prompt` grounded on `contexts`.
    async fn complete(&self, user_prompt: &str, contexts: &[String]) -> Result<String>;
}

/// Indonesian system prompt with the retrieved contexts appended, one per line.
pub fn build_system_prompt(contexts: &[String]) -> String {
    format!(
        "\n\tKamu adalah asisten yang membantu.\n\
         \tGunakan konteks berikut ini untuk menjawab pertanyaan.\n\
         \tJika Kamu tidak tahu jawabannya, katakan bahwa Kamu tidak tahu.\n\
         \n\
         \t{}",
        contexts.join("\n")
    )
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

pub struct CompletionClient {
    http: OpenAiHttp,
    model: String,
    temperature: f32,
}

impl CompletionClient {
    pub fn new(http: OpenAiHttp, model: impl Into<String>) -> Self {
        Self {
            http,
            model: model.into(),
            temperature: rag_demo_common::config::DEFAULT_TEMPERATURE,
        }
    }

    pub fn from_config(config: &RagConfig) -> Self {
        Self::new(OpenAiHttp::from_config(config), config.chat_model.clone())
            .with_temperature(config.temperature)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatCompleter for CompletionClient {
    #[instrument(skip_all, fields(model = %self.model, contexts = contexts.len()))]
    async fn complete(&self, user_prompt: &str, contexts: &[String]) -> Result<String> {
        let system_prompt = build_system_prompt(contexts);

        let request = ChatCompletionRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };

        debug!("Requesting chat completion");
        let response: ChatCompletionResponse =
            self.http.post_json("chat/completions", &request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| RagError::EmptyResponse("no choices found in response".to_string()))?
            .message
            .content
            .unwrap_or_default();

        info!("Generated response ({} chars)", content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_upstream(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: String) -> CompletionClient {
        CompletionClient::new(OpenAiHttp::new(base_url, "sk-test"), "gpt-4o-mini")
    }

    #[test]
    fn test_system_prompt_template() {
        let contexts = vec![
            "Prabowo dilantik sebagai presiden.".to_string(),
            "Gibran dilantik sebagai wakil presiden.".to_string(),
        ];

        let prompt = build_system_prompt(&contexts);

        assert_eq!(
            prompt,
            "\n\tKamu adalah asisten yang membantu.\n\
             \tGunakan konteks berikut ini untuk menjawab pertanyaan.\n\
             \tJika Kamu tidak tahu jawabannya, katakan bahwa Kamu tidak tahu.\n\
             \n\
             \tPrabowo dilantik sebagai presiden.\n\
             Gibran dilantik sebagai wakil presiden."
        );
    }

    #[test]
    fn test_system_prompt_without_contexts() {
        let prompt = build_system_prompt(&[]);
        assert!(prompt.starts_with("\n\tKamu adalah asisten yang membantu."));
        assert!(prompt.ends_with("Kamu tidak tahu.\n\n\t"));
    }

    #[tokio::test]
    async fn test_request_shape_and_first_choice() {
        let app = Router::new().route(
            "/chat/completions",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["model"], "gpt-4o-mini");
                assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);

                let messages = body["messages"].as_array().unwrap();
                assert_eq!(messages.len(), 2);
                assert_eq!(messages[0]["role"], "system");
                assert!(messages[0]["content"].as_str().unwrap().contains("konteks A"));
                assert_eq!(messages[1]["role"], "user");
                assert_eq!(messages[1]["content"], "Siapa presiden?");

                Json(json!({
                    "choices": [
                        { "message": { "role": "assistant", "content": "Prabowo Subianto." } },
                        { "message": { "role": "assistant", "content": "ignored" } }
                    ]
                }))
            }),
        );
        let base_url = spawn_upstream(app).await;

        let answer = client(base_url)
            .complete("Siapa presiden?", &["konteks A".to_string()])
            .await
            .unwrap();

        assert_eq!(answer, "Prabowo Subianto.");
    }

    #[tokio::test]
    async fn test_empty_choices_is_error() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { Json(json!({ "choices": [] })) }),
        );
        let base_url = spawn_upstream(app).await;

        let result = client(base_url).complete("halo", &[]).await;

        assert!(matches!(result, Err(RagError::EmptyResponse(_))));
    }

    #[tokio::test]
    async fn test_error_status_is_propagated() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
        );
        let base_url = spawn_upstream(app).await;

        let result = client(base_url).complete("halo", &[]).await;

        match result {
            Err(RagError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }
}
