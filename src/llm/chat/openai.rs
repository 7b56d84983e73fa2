use async_trait::async_trait;
use log::{ debug, warn };
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ Deserialize, Serialize };
use std::time::Duration;

use super::{ error_message_from_body, ChatClient, ChatRequest };
use crate::error::ProviderError;
use crate::llm::{ LlmConfig, ProviderKind };

pub struct OpenAIChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
}

#[derive(Serialize, Deserialize, Debug)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct OpenAIChatRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

impl OpenAIChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        timeout: Duration
    ) -> Result<Self, ProviderError> {
        let chat_model = model.unwrap_or_else(|| ProviderKind::OpenAI.default_model().to_string());
        let api_url = base_url.unwrap_or_else(|| "https://api.openai.com".to_string());
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e|
                ProviderError::Generic(format!("Invalid API key format: {}", e))
            )?
        );

        let http = HttpClient::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Generic(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            model: chat_model,
            base_url: api_url,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, ProviderError> {
        let api_key = config.api_key
            .clone()
            .ok_or_else(|| ProviderError::Generic("OpenAI API key is required".to_string()))?;

        Self::new(
            api_key,
            config.completion_model.clone(),
            config.base_url.clone(),
            config.request_timeout
        )
    }

    fn build_messages(request: &ChatRequest<'_>) -> Vec<OpenAIMessage> {
        let mut messages = Vec::with_capacity(request.history.len() + 2);
        messages.push(OpenAIMessage {
            role: "system".to_string(),
            content: request.system_prompt.to_string(),
        });
        for msg in request.history {
            messages.push(OpenAIMessage {
                role: msg.role.as_str().to_string(),
                content: msg.content.clone(),
            });
        }
        messages.push(OpenAIMessage {
            role: "user".to_string(),
            content: request.text.to_string(),
        });
        messages
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<String, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));

        let req = OpenAIChatRequest {
            model: self.model.clone(),
            messages: Self::build_messages(&request),
            temperature: 0.7,
            max_tokens: 500,
        };

        debug!("OpenAI request to {} with {} messages", url, req.messages.len());
        let resp = self.http.post(&url).json(&req).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let message = error_message_from_body(&body);
            warn!("OpenAI returned HTTP {}: {}", status.as_u16(), message);
            return Err(ProviderError::from_status(status.as_u16(), message, false));
        }

        let parsed: OpenAIResponse = serde_json
            ::from_str(&body)
            .map_err(|e| ProviderError::Generic(format!("Malformed OpenAI response: {}", e)))?;

        let content = parsed.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ProviderError::Generic("No response from OpenAI API".to_string()))?;

        Ok(content.trim().to_string())
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
