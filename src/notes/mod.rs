pub mod markdown;
pub mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

/// Instruction appended after the pull request text.
pub const RELEASE_NOTES_INSTRUCTION: &str = "Can you turn these pull requests into release notes.";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("Error code: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("malformed completion response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("completion response contained no choices")]
    NoChoices,

    #[error("completion response had no message content")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A chat-completion backend.
/// Returns the text of the first choice; exactly one call, no retries.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
    ) -> Result<String, GenerationError>;
}

/// User prompt: the pull request text verbatim, then the instruction.
pub fn build_prompt(pr_details: &str) -> String {
    format!("{pr_details}\n\n{RELEASE_NOTES_INSTRUCTION}")
}

/// Ask the model for release notes and render its markdown answer as HTML.
#[instrument(skip_all, fields(prompt_bytes = pr_details.len()))]
pub async fn generate_release_notes(
    client: &dyn ChatCompletion,
    system_prompt: &str,
    api_key: &str,
    pr_details: &str,
) -> Result<String, GenerationError> {
    let messages = [
        ChatMessage::new(Role::System, system_prompt),
        ChatMessage::new(Role::User, build_prompt(pr_details)),
    ];

    let notes = client.complete(api_key, &messages).await?;
    debug!(notes_bytes = notes.len(), "received release notes");

    Ok(markdown::to_html(&notes))
}
