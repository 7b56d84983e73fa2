pub mod chat;
use serde::{ Deserialize, Serialize };
use std::str::FromStr;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    Llama,
    Offline,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Llama => "llama",
            ProviderKind::Offline => "offline",
        }
    }

    /// Prefix a credential must carry before a hosted call is attempted.
    pub fn credential_marker(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAI => Some("sk-"),
            ProviderKind::Llama => Some("hf_"),
            ProviderKind::Offline => None,
        }
    }

    pub fn is_hosted(&self) -> bool {
        !matches!(self, ProviderKind::Offline)
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "gpt-3.5-turbo",
            ProviderKind::Llama => "meta-llama/Llama-2-7b-chat-hf",
            ProviderKind::Offline => "offline",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseProviderKindError {
    message: String,
}

impl fmt::Display for ParseProviderKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseProviderKindError {}
impl FromStr for ProviderKind {
    type Err = ParseProviderKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "hosted-openai" => Ok(ProviderKind::OpenAI),
            "llama" | "hosted-llama" | "huggingface" => Ok(ProviderKind::Llama),
            "offline" => Ok(ProviderKind::Offline),
            _ =>
                Err(ParseProviderKindError {
                    message: format!("Invalid provider: '{}'", s),
                }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    pub api_key: Option<String>,
    pub completion_model: Option<String>,
    pub base_url: Option<String>,
    pub request_timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Offline,
            api_key: None,
            completion_model: None,
            base_url: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}
