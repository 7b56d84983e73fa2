use async_trait::async_trait;
use log::{ debug, warn };
use reqwest::{ Client as HttpClient, StatusCode, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ Deserialize, Serialize };
use std::time::Duration;

use super::{ error_message_from_body, ChatClient, ChatRequest };
use crate::error::ProviderError;
use crate::history::format_history_for_prompt;
use crate::llm::{ LlmConfig, ProviderKind };

/// Client for a Llama model served behind a HuggingFace-style inference proxy.
pub struct LlamaChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct LlamaParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
}

#[derive(Serialize)]
struct LlamaRequest {
    inputs: String,
    parameters: LlamaParameters,
}

#[derive(Deserialize, Debug)]
struct Generated {
    generated_text: String,
}

#[derive(Deserialize, Debug)]
struct LlamaFailure {
    error: String,
    #[serde(default)]
    estimated_time: Option<f64>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum LlamaResponse {
    Batch(Vec<Generated>),
    Single(Generated),
    Failure(LlamaFailure),
}

impl LlamaChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        timeout: Duration
    ) -> Result<Self, ProviderError> {
        let chat_model = model.unwrap_or_else(|| ProviderKind::Llama.default_model().to_string());
        let api_url = base_url.unwrap_or_else(||
            format!("https://api-inference.huggingface.co/models/{}", chat_model)
        );
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
            .ok_or_else(|| ProviderError::Generic("Llama proxy API key is required".to_string()))?;

        Self::new(
            api_key,
            config.completion_model.clone(),
            config.base_url.clone(),
            config.request_timeout
        )
    }

    fn flatten_prompt(request: &ChatRequest<'_>) -> String {
        format!(
            "System: {}\n{}User: {}\nAssistant:",
            request.system_prompt,
            format_history_for_prompt(request.history),
            request.text
        )
    }

    fn parse_body(body: &str) -> Result<String, ProviderError> {
        let parsed: LlamaResponse = serde_json
            ::from_str(body)
            .map_err(|e| ProviderError::Generic(format!("Malformed Llama response: {}", e)))?;

        let text = match parsed {
            LlamaResponse::Batch(items) =>
                items
                    .into_iter()
                    .next()
                    .map(|g| g.generated_text)
                    .ok_or_else(|| ProviderError::Generic("Empty Llama response".to_string()))?,
            LlamaResponse::Single(g) => g.generated_text,
            LlamaResponse::Failure(f) if f.error.to_lowercase().contains("loading") => {
                return Err(ProviderError::ModelLoading { estimated_time: f.estimated_time });
            }
            LlamaResponse::Failure(f) => {
                return Err(ProviderError::Generic(f.error));
            }
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ProviderError::Generic("Llama returned empty text".to_string()));
        }
        Ok(trimmed.to_string())
    }
}

#[async_trait]
impl ChatClient for LlamaChatClient {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<String, ProviderError> {
        let req = LlamaRequest {
            inputs: Self::flatten_prompt(&request),
            parameters: LlamaParameters {
                max_new_tokens: 500,
                temperature: 0.7,
                return_full_text: false,
            },
        };

        debug!("Llama request to {}", self.base_url);
        let resp = self.http.post(&self.base_url).json(&req).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if status == StatusCode::SERVICE_UNAVAILABLE {
            let estimated_time = serde_json
                ::from_str::<LlamaFailure>(&body)
                .ok()
                .and_then(|f| f.estimated_time);
            warn!("Llama model is warming up (estimated {:?}s)", estimated_time);
            return Err(ProviderError::ModelLoading { estimated_time });
        }
        if !status.is_success() {
            let message = error_message_from_body(&body);
            warn!("Llama proxy returned HTTP {}: {}", status.as_u16(), message);
            return Err(ProviderError::from_status(status.as_u16(), message, true));
        }

        Self::parse_body(&body)
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::ChatMessage;

    #[test]
    fn flattens_history_with_role_labels() {
        let history = vec![ChatMessage::user("hola"), ChatMessage::assistant("¡Hola!")];
        let request = ChatRequest {
            system_prompt: "Eres un asistente",
            history: &history,
            text: "tengo tos",
        };
        assert_eq!(
            LlamaChatClient::flatten_prompt(&request),
            "System: Eres un asistente\nUser: hola\nAssistant: ¡Hola!\nUser: tengo tos\nAssistant:"
        );
    }

    #[test]
    fn parses_batch_and_single_shapes() {
        assert_eq!(
            LlamaChatClient::parse_body(r#"[{"generated_text":" Drink water. "}]"#).unwrap(),
            "Drink water."
        );
        assert_eq!(
            LlamaChatClient::parse_body(r#"{"generated_text":"Rest well."}"#).unwrap(),
            "Rest well."
        );
    }

    #[test]
    fn error_payloads_are_rejected_at_parse_time() {
        let loading = LlamaChatClient::parse_body(
            r#"{"error":"Model meta-llama is currently loading","estimated_time":20.5}"#
        );
        assert_eq!(loading, Err(ProviderError::ModelLoading { estimated_time: Some(20.5) }));

        let other = LlamaChatClient::parse_body(r#"{"error":"Input too long"}"#);
        assert_eq!(other, Err(ProviderError::Generic("Input too long".to_string())));

        assert!(matches!(
            LlamaChatClient::parse_body(r#"{"unexpected":true}"#),
            Err(ProviderError::Generic(_))
        ));
        assert!(matches!(LlamaChatClient::parse_body("[]"), Err(ProviderError::Generic(_))));
    }
}
