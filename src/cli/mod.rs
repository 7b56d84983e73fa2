use clap::Parser;
use std::time::Duration;
use crate::llm::ProviderKind;
use crate::models::chat::Language;
use crate::router::tracker::ModelLoadingPolicy;
use crate::router::RouterSettings;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address and port for the HTTP API to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    // --- Chat Provider Args ---
    /// Hosted provider to try first (openai, llama, offline)
    #[arg(long, env = "CHAT_PROVIDER", default_value = "openai")]
    pub chat_provider: ProviderKind,

    /// Model name passed to the hosted provider (e.g., gpt-3.5-turbo)
    #[arg(long, env = "CHAT_MODEL")] // No default, rely on client defaults if None
    pub chat_model: Option<String>,

    /// OpenAI API key. Must start with "sk-" to be used.
    #[arg(long, env = "OPENAI_API_KEY", default_value = "")]
    pub openai_api_key: String,

    /// Base URL for the OpenAI-compatible API (e.g., https://api.openai.com)
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub openai_base_url: Option<String>,

    /// HuggingFace token for the Llama proxy. Must start with "hf_" to be used.
    #[arg(long, env = "LLAMA_API_KEY", default_value = "")]
    pub llama_api_key: String,

    /// Full URL of the Llama inference proxy endpoint
    #[arg(long, env = "LLAMA_BASE_URL")]
    pub llama_base_url: Option<String>,

    /// Timeout in seconds for a single hosted call.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    /// How 503 "model loading" answers count toward forced offline mode (ignore, count)
    #[arg(long, env = "MODEL_LOADING_POLICY", default_value = "ignore")]
    pub model_loading_policy: ModelLoadingPolicy,

    // --- Language Args ---
    /// Default response language (en, es)
    #[arg(long, env = "RESPONSE_LANGUAGE", default_value = "en")]
    pub response_language: Language,

    /// Answer in the language detected from each message instead of RESPONSE_LANGUAGE.
    #[arg(long, env = "AUTO_DETECT_LANGUAGE", default_value = "false")]
    pub auto_detect_language: bool,

    /// Number of prior messages sent to the hosted model as context.
    #[arg(long, env = "CONTEXT_WINDOW", default_value = "10")]
    pub context_window: usize,

    /// Optional path to a JSON file overriding the built-in system prompts.
    #[arg(long, env = "PROMPTS_PATH")]
    pub prompts_path: Option<String>,

    // --- History Store Args ---
    /// History chat store type (memory, redis)
    #[arg(long, env = "HISTORY_TYPE", default_value = "memory")]
    pub history_type: String,

    /// History chat store host endpoint (e.g., redis://127.0.0.1:6379)
    #[arg(long, env = "HISTORY_HOST", default_value = "redis://127.0.0.1:6379")]
    pub history_host: String,

    /// Prefix for Redis history keys.
    #[arg(long, env = "HISTORY_REDIS_PREFIX", default_value = "history:")]
    pub history_redis_prefix: String,

    // --- Online Status Args ---
    /// Initial online status when no probe is configured.
    #[arg(long, env = "ONLINE", default_value = "true", action = clap::ArgAction::Set)]
    pub online: bool,

    /// URL probed with HEAD requests to refresh the online status.
    #[arg(long, env = "ONLINE_PROBE_URL")]
    pub online_probe_url: Option<String>,

    /// Seconds between online probes.
    #[arg(long, env = "ONLINE_PROBE_INTERVAL_SECS", default_value = "30")]
    pub online_probe_interval_secs: u64,
}

impl Args {
    pub fn router_settings(&self) -> RouterSettings {
        RouterSettings {
            provider: self.chat_provider,
            model: self.chat_model.clone().filter(|m| !m.trim().is_empty()),
            language: self.response_language,
            auto_detect_language: self.auto_detect_language,
            context_window: self.context_window,
            model_loading_policy: self.model_loading_policy,
            openai_base_url: self.openai_base_url.clone(),
            llama_base_url: self.llama_base_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        }
    }

    pub fn credentials(&self) -> Vec<(ProviderKind, String)> {
        vec![
            (ProviderKind::OpenAI, self.openai_api_key.clone()),
            (ProviderKind::Llama, self.llama_api_key.clone())
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_into_settings() {
        let args = Args::try_parse_from([
            "clinic-assistant",
            "--chat-provider",
            "llama",
            "--response-language",
            "es",
            "--model-loading-policy",
            "count",
            "--online",
            "false",
            "--context-window",
            "4",
        ]).unwrap();

        assert!(!args.online);
        let settings = args.router_settings();
        assert_eq!(settings.provider, ProviderKind::Llama);
        assert_eq!(settings.language, Language::Es);
        assert_eq!(settings.model_loading_policy, ModelLoadingPolicy::CountAsFailure);
        assert_eq!(settings.context_window, 4);
    }

    #[test]
    fn rejects_unknown_provider() {
        assert!(Args::try_parse_from(["clinic-assistant", "--chat-provider", "bard"]).is_err());
    }
}
