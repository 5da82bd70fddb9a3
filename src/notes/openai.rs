use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ChatCompletion, ChatMessage, GenerationError};
use crate::config::OpenAiConfig;

/// Chat-completion client for OpenAI-compatible APIs.
///
/// The HTTP client is shared; the API key is supplied per call and
/// never kept on the struct.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    timeout: Option<std::time::Duration>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(http: reqwest::Client, config: &OpenAiConfig) -> Self {
        Self {
            http,
            endpoint: format!("{}/chat/completions", config.base_url()),
            model: config.model.clone(),
            timeout: config.timeout(),
        }
    }
}

#[async_trait]
impl ChatCompletion for OpenAiClient {
    async fn complete(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
    ) -> Result<String, GenerationError> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&ChatRequest {
                model: &self.model,
                messages,
            });
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        debug!(model = %self.model, messages = messages.len(), "sending chat completion request");
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), body_bytes = body.len(), "received chat completion response");

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(GenerationError::NoChoices)?;
        choice
            .message
            .content
            .filter(|content| !content.is_empty())
            .ok_or(GenerationError::EmptyContent)
    }
}
