use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{PromptTemplate, TextGenerator};
use crate::error::GenerationError;

/// Longest slice of an error body kept in [`GenerationError::Api`].
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Connection settings for an OpenAI-compatible completion API.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Base URL up to and including the version segment, e.g.
    /// `"https://api.openai.com/v1"`.
    pub base_url: String,
    /// Sent as a bearer token when present.
    pub api_key: Option<String>,
    pub model: String,
    /// Whole-request timeout applied by the HTTP client.
    pub timeout: Duration,
}

/// [`TextGenerator`] backed by `POST {base_url}/chat/completions`.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(config: OpenAiConfig) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key,
            model: config.model,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &PromptTemplate) -> Result<String, GenerationError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: prompt.system },
                ChatMessage { role: "user", content: prompt.user },
            ],
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        debug!(model = %self.model, choices = completion.choices.len(), "completion received");
        first_choice_content(completion)
    }
}

// ── wire types (OpenAI chat completions subset) ──────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    /// `null` when the model refused or returned only tool calls.
    content: Option<String>,
}

/// A null content maps to `""`; the quote cache substitutes its fallback.
fn first_choice_content(completion: ChatCompletionResponse) -> Result<String, GenerationError> {
    completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or(GenerationError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::DAILY_QUOTE_PROMPT;

    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    #[derive(Clone, Default)]
    struct Captured {
        body: Arc<Mutex<Option<Value>>>,
        auth: Arc<Mutex<Option<String>>>,
    }

    /// Serve `reply` from a local `/v1/chat/completions` and return the base URL.
    async fn mock_api(status: StatusCode, reply: Value, captured: Captured) -> String {
        async fn handler(
            State((status, reply, captured)): State<(StatusCode, Value, Captured)>,
            headers: HeaderMap,
            Json(body): Json<Value>,
        ) -> (StatusCode, Json<Value>) {
            *captured.body.lock().unwrap() = Some(body);
            *captured.auth.lock().unwrap() = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            (status, Json(reply))
        }

        let app = Router::new()
            .route("/v1/chat/completions", post(handler))
            .with_state((status, reply, captured));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1/")
    }

    fn generator(base_url: String, api_key: Option<&str>) -> OpenAiGenerator {
        OpenAiGenerator::new(OpenAiConfig {
            base_url,
            api_key: api_key.map(str::to_owned),
            model: "gpt-test".into(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let g = generator("https://api.example.com/v1/".into(), None);
        assert_eq!(g.endpoint(), "https://api.example.com/v1/chat/completions");
    }

    #[test]
    fn null_content_becomes_empty_string() {
        let completion: ChatCompletionResponse =
            serde_json::from_value(json!({ "choices": [{ "message": { "content": null } }] }))
                .unwrap();
        assert_eq!(first_choice_content(completion).unwrap(), "");
    }

    #[test]
    fn missing_choices_is_empty_response() {
        let completion: ChatCompletionResponse =
            serde_json::from_value(json!({ "id": "cmpl-1" })).unwrap();
        assert!(matches!(
            first_choice_content(completion),
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn sends_prompt_and_returns_first_choice() {
        let captured = Captured::default();
        let base = mock_api(
            StatusCode::OK,
            json!({
                "id": "cmpl-1",
                "object": "chat.completion",
                "choices": [
                    { "index": 0, "message": { "role": "assistant", "content": "You light up every room." }, "finish_reason": "stop" },
                    { "index": 1, "message": { "role": "assistant", "content": "ignored" }, "finish_reason": "stop" }
                ]
            }),
            captured.clone(),
        )
        .await;

        let text = generator(base, Some("sk-test"))
            .generate(&DAILY_QUOTE_PROMPT)
            .await
            .unwrap();
        assert_eq!(text, "You light up every room.");

        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(body["model"], "gpt-test");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], DAILY_QUOTE_PROMPT.system);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], DAILY_QUOTE_PROMPT.user);
        assert_eq!(captured.auth.lock().unwrap().as_deref(), Some("Bearer sk-test"));
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let base = mock_api(
            StatusCode::TOO_MANY_REQUESTS,
            json!({ "error": { "message": "slow down" } }),
            Captured::default(),
        )
        .await;

        let err = generator(base, None).generate(&DAILY_QUOTE_PROMPT).await.unwrap_err();
        match err {
            GenerationError::Api { status, body } => {
                assert_eq!(status, 429);
                assert!(body.contains("slow down"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_api_is_http_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = generator(format!("http://{addr}/v1"), None)
            .generate(&DAILY_QUOTE_PROMPT)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Http(_)), "got {err:?}");
    }
}
