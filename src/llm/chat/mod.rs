pub mod llama;
pub mod openai;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use super::{ LlmConfig, ProviderKind };
use self::llama::LlamaChatClient;
use self::openai::OpenAIChatClient;
use crate::error::ProviderError;
use crate::models::chat::ChatMessage;

#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub system_prompt: &'a str,
    pub history: &'a [ChatMessage],
    pub text: &'a str,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// One assistant utterance for `request`, or a classified failure.
    async fn complete(&self, request: ChatRequest<'_>) -> Result<String, ProviderError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, ProviderError> {
    let client: Arc<dyn ChatClient> = match config.provider {
        ProviderKind::OpenAI => {
            let specific_client = OpenAIChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
        ProviderKind::Llama => {
            let specific_client = LlamaChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
        ProviderKind::Offline => {
            return Err(ProviderError::Generic("offline provider has no hosted client".to_string()));
        }
    };
    Ok(client)
}

/// Pulls a human readable message out of an error body. Both
/// `{"error": {"message": ..}}` and `{"error": ".."}` shapes are common.
pub(crate) fn error_message_from_body(body: &str) -> String {
    let parsed: Option<JsonValue> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|v| {
        let error = v.get("error")?;
        error
            .get("message")
            .and_then(|m| m.as_str())
            .or_else(|| error.as_str())
            .map(|s| s.to_string())
    });
    match message {
        Some(m) => m,
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => body.trim().chars().take(200).collect(),
    }
}
