//! Text-generation backends.
//!
//! The pipeline treats the backend as an opaque, synchronous
//! `generate(prompt) -> text` call. This module provides a deterministic
//! mock for development and an OpenRouter chat-completions client.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::runtime::RuntimeFlavor;

use crate::config::{BackendConfig, BackendKind};
use crate::error::{BackendError, GuardrailError, GuardrailResult};

/// Trait for text-generation backends.
pub trait Backend: Send + Sync {
    /// Produce the model response for a prompt.
    fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}

impl<F> Backend for F
where
    F: Fn(&str) -> Result<String, BackendError> + Send + Sync,
{
    fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        self(prompt)
    }
}

/// Build the backend described by the configuration.
pub fn from_config(config: &BackendConfig) -> GuardrailResult<Box<dyn Backend>> {
    match config.kind {
        BackendKind::Mock => Ok(Box::new(MockBackend)),
        BackendKind::Openrouter => {
            if config.api_key.is_empty() {
                return Err(GuardrailError::Config(
                    "backend.api_key is required for the openrouter backend".to_string(),
                ));
            }
            Ok(Box::new(OpenRouterBackend::new(config.clone())?))
        }
    }
}

/// Deterministic backend returning canned answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockBackend;

impl Backend for MockBackend {
    fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        if prompt.to_lowercase().contains("jobs") {
            Ok("According to a study from MIT University, 90% of humans will lose jobs.".to_string())
        } else {
            Ok("AI is a branch of computer science.".to_string())
        }
    }
}

/// Request to the chat completions API.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Response from the chat completions API.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Result<String, BackendError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(BackendError::EmptyResponse)
    }
}

/// Backend calling an OpenRouter-compatible chat completions endpoint.
pub struct OpenRouterBackend {
    config: BackendConfig,
    client: Client,
}

impl OpenRouterBackend {
    pub fn new(config: BackendConfig) -> GuardrailResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GuardrailError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn build_request(&self, prompt: &str) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.config.system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt.to_string(),
        });

        ChatRequest {
            model: self.config.model.clone(),
            messages,
        }
    }

    /// Send one chat completion request.
    pub async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("X-Title", "Guardrail Core")
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| self.classify(e))?;
        chat_response.into_text()
    }

    fn classify(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout(self.config.timeout_secs)
        } else {
            BackendError::Request(e.to_string())
        }
    }
}

impl Backend for OpenRouterBackend {
    fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending prompt to backend"
        );

        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| BackendError::Unavailable(format!("no async runtime: {}", e)))?;

        // block_in_place panics on a current-thread runtime
        if handle.runtime_flavor() == RuntimeFlavor::CurrentThread {
            return Err(BackendError::Unavailable(
                "a multi-threaded runtime is required".to_string(),
            ));
        }

        // Use tokio's current runtime to block on the async operation
        tokio::task::block_in_place(|| handle.block_on(self.complete(prompt)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_backend_responses() {
        let backend = MockBackend;
        assert_eq!(
            backend.generate("Explain what AI is").unwrap(),
            "AI is a branch of computer science."
        );
        assert!(backend
            .generate("Will AI replace JOBS?")
            .unwrap()
            .contains("MIT University"));
    }

    #[test]
    fn test_closure_backend() {
        let backend = |prompt: &str| -> Result<String, BackendError> { Ok(prompt.to_uppercase()) };
        assert_eq!(Backend::generate(&backend, "hi").unwrap(), "HI");
    }

    #[test]
    fn test_openrouter_requires_api_key() {
        let config = BackendConfig {
            kind: BackendKind::Openrouter,
            ..BackendConfig::default()
        };
        assert!(matches!(from_config(&config), Err(GuardrailError::Config(_))));
    }

    #[test]
    fn test_request_includes_system_prompt() {
        let backend = OpenRouterBackend::new(BackendConfig {
            kind: BackendKind::Openrouter,
            api_key: "sk-test".to_string(),
            system_prompt: Some("Be concise.".to_string()),
            ..BackendConfig::default()
        })
        .unwrap();

        let request = backend.build_request("Explain what AI is");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].content, "Explain what AI is");
    }

    #[test]
    fn test_parse_chat_response() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"AI is software."}}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "AI is software.");

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(empty.into_text(), Err(BackendError::EmptyResponse)));
    }

    #[test]
    fn test_generate_without_runtime_is_unavailable() {
        let backend = OpenRouterBackend::new(BackendConfig {
            kind: BackendKind::Openrouter,
            api_key: "sk-test".to_string(),
            ..BackendConfig::default()
        })
        .unwrap();

        assert!(matches!(
            backend.generate("hello"),
            Err(BackendError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_on_current_thread_runtime_is_unavailable() {
        let backend = OpenRouterBackend::new(BackendConfig {
            kind: BackendKind::Openrouter,
            api_key: "sk-test".to_string(),
            ..BackendConfig::default()
        })
        .unwrap();

        assert!(matches!(
            backend.generate("hello"),
            Err(BackendError::Unavailable(_))
        ));
    }

    /// Serve a stand-in chat completions API on a random local port.
    async fn spawn_upstream() -> String {
        use axum::{http::StatusCode, routing::post, Json, Router};

        let app = Router::new()
            .route(
                "/failing/chat/completions",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream down") }),
            )
            .route(
                "/empty/chat/completions",
                post(|| async { Json(serde_json::json!({ "choices": [] })) }),
            )
            .route(
                "/slow/chat/completions",
                post(|| async {
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    Json(serde_json::json!({
                        "choices": [{ "message": { "content": "too late" } }]
                    }))
                }),
            )
            .route(
                "/ok/chat/completions",
                post(|| async {
                    Json(serde_json::json!({
                        "choices": [{ "message": { "content": "AI is software." } }]
                    }))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn backend_at(base_url: String) -> OpenRouterBackend {
        OpenRouterBackend::new(BackendConfig {
            kind: BackendKind::Openrouter,
            api_key: "sk-test".to_string(),
            base_url,
            timeout_secs: 1,
            ..BackendConfig::default()
        })
        .unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_openrouter_upstream_failures() {
        let upstream = spawn_upstream().await;

        let ok = backend_at(format!("{}/ok", upstream));
        assert_eq!(ok.generate("Explain what AI is").unwrap(), "AI is software.");

        let failing = backend_at(format!("{}/failing", upstream));
        match failing.generate("Explain what AI is") {
            Err(BackendError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream down");
            }
            other => panic!("expected status error, got {:?}", other),
        }

        let empty = backend_at(format!("{}/empty", upstream));
        assert!(matches!(
            empty.generate("Explain what AI is"),
            Err(BackendError::EmptyResponse)
        ));

        let slow = backend_at(format!("{}/slow", upstream));
        assert!(matches!(
            slow.generate("Explain what AI is"),
            Err(BackendError::Timeout(1))
        ));
    }
}
