pub mod tracker;

use crate::config::prompt::PromptConfig;
use crate::credentials::{ has_valid_credential, is_valid_credential, CredentialStore };
use crate::error::{ ErrorKind, ProviderError, RouterError };
use crate::history::HistoryStore;
use crate::language::detect_language;
use crate::llm::chat::{ new_client as new_chat_client, ChatClient, ChatRequest };
use crate::llm::{ LlmConfig, ProviderKind };
use crate::models::chat::{ new_conversation_id, ChatMessage, Language };
use crate::offline::get_sample_response;
use crate::status::OnlineStatus;
use self::tracker::{ ModelLoadingPolicy, QuotaTracker, TrackerState };

use log::{ debug, error, info, warn };
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{ Mutex, RwLock };

pub const DEFAULT_CONTEXT_WINDOW: usize = 10;

#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub provider: ProviderKind,
    pub model: Option<String>,
    pub language: Language,
    pub auto_detect_language: bool,
    pub context_window: usize,
    pub model_loading_policy: ModelLoadingPolicy,
    pub openai_base_url: Option<String>,
    pub llama_base_url: Option<String>,
    pub request_timeout: Duration,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAI,
            model: None,
            language: Language::En,
            auto_detect_language: false,
            context_window: DEFAULT_CONTEXT_WINDOW,
            model_loading_policy: ModelLoadingPolicy::default(),
            openai_base_url: None,
            llama_base_url: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
struct RouterState {
    provider: ProviderKind,
    model: Option<String>,
    language: Language,
    auto_detect_language: bool,
    tracker: QuotaTracker,
    // bumped on every credential change; outcomes of calls started under an
    // older generation are not recorded
    credential_generation: u64,
}

/// The classified failure behind a degraded reply.
#[derive(Debug, Clone, Serialize)]
pub struct ReplyError {
    pub kind: ErrorKind,
    pub detail: String,
    pub notice: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistantReply {
    pub conversation_id: String,
    pub message: ChatMessage,
    pub language: Language,
    /// Backend that produced `message`; `offline` for canned answers.
    pub answered_by: ProviderKind,
    pub error: Option<ReplyError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouterStatus {
    pub provider: ProviderKind,
    pub effective_provider: ProviderKind,
    pub model: String,
    pub language: Language,
    pub auto_detect_language: bool,
    pub online: bool,
    pub has_valid_credential: bool,
    pub state: TrackerState,
    pub quota_exceeded: bool,
    pub consecutive_errors: u32,
    pub last_error: Option<ErrorKind>,
    pub model_loading_policy: ModelLoadingPolicy,
}

pub struct AssistantRouter {
    state: Mutex<RouterState>,
    history: Arc<dyn HistoryStore>,
    credentials: Arc<dyn CredentialStore>,
    online: OnlineStatus,
    prompts: Arc<PromptConfig>,
    clients: RwLock<HashMap<ProviderKind, Arc<dyn ChatClient>>>,
    conversation_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    base_urls: HashMap<ProviderKind, String>,
    request_timeout: Duration,
    context_window: usize,
}

impl AssistantRouter {
    pub fn new(
        settings: RouterSettings,
        history: Arc<dyn HistoryStore>,
        credentials: Arc<dyn CredentialStore>,
        online: OnlineStatus,
        prompts: Arc<PromptConfig>
    ) -> Self {
        let mut base_urls = HashMap::new();
        if let Some(url) = settings.openai_base_url {
            base_urls.insert(ProviderKind::OpenAI, url);
        }
        if let Some(url) = settings.llama_base_url {
            base_urls.insert(ProviderKind::Llama, url);
        }

        Self {
            state: Mutex::new(RouterState {
                provider: settings.provider,
                model: settings.model,
                language: settings.language,
                auto_detect_language: settings.auto_detect_language,
                tracker: QuotaTracker::new(settings.model_loading_policy),
                credential_generation: 0,
            }),
            history,
            credentials,
            online,
            prompts,
            clients: RwLock::new(HashMap::new()),
            conversation_locks: Mutex::new(HashMap::new()),
            base_urls,
            request_timeout: settings.request_timeout,
            context_window: settings.context_window,
        }
    }

    /// Answers `text` in the addressed conversation, creating it when no id is
    /// given. Hosted failures never escape: they are classified, recorded and
    /// replaced by an offline answer.
    ///
    /// The user message is stored before the hosted call. If the store then
    /// rejects the reply, the error is returned and the conversation ends on
    /// that unanswered user message.
    pub async fn send_message(
        &self,
        text: &str,
        conversation_id: Option<&str>,
        history: &[ChatMessage]
    ) -> Result<AssistantReply, RouterError> {
        let conversation_id = conversation_id
            .map(|id| id.to_string())
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(new_conversation_id);

        let lock = self.conversation_lock(&conversation_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.answer(text, conversation_id.clone(), history).await
        };
        self.release_conversation_lock(&conversation_id, lock).await;
        result
    }

    async fn answer(
        &self,
        text: &str,
        conversation_id: String,
        history: &[ChatMessage]
    ) -> Result<AssistantReply, RouterError> {
        let online = self.online.is_online();
        let (provider, language, forced_offline, generation) = {
            let state = self.state.lock().await;
            let language = if state.auto_detect_language {
                detect_language(text)
            } else {
                state.language
            };
            (state.provider, language, state.tracker.is_offline_forced(), state.credential_generation)
        };

        let context = self.context_for(&conversation_id, history).await?;
        self.history.append(&conversation_id, ChatMessage::user(text)).await?;

        let use_hosted =
            online &&
            provider.is_hosted() &&
            !forced_offline &&
            has_valid_credential(self.credentials.as_ref(), provider);
        debug!(
            "Routing message for {}: provider={}, online={}, forced_offline={}, hosted={}",
            conversation_id,
            provider,
            online,
            forced_offline,
            use_hosted
        );

        let (content, answered_by, error) = if use_hosted {
            match self.call_hosted(provider, language, &context, text).await {
                Ok(content) => {
                    let mut state = self.state.lock().await;
                    if state.credential_generation == generation {
                        state.tracker.record_success();
                    }
                    (content, provider, None)
                }
                Err(e) => {
                    let state_after = {
                        let mut state = self.state.lock().await;
                        if state.credential_generation == generation {
                            state.tracker.record_failure(&e)
                        } else {
                            debug!("Credential changed during the call, not recording {:?}", e.kind());
                            state.tracker.state()
                        }
                    };
                    warn!(
                        "Hosted {} call failed ({:?}): {}. Falling back to offline answer (tracker: {:?})",
                        provider,
                        e.kind(),
                        e,
                        state_after
                    );
                    let reply_error = ReplyError {
                        kind: e.kind(),
                        detail: e.to_string(),
                        notice: e.kind().user_message(language).to_string(),
                    };
                    (get_sample_response(text, language), ProviderKind::Offline, Some(reply_error))
                }
            }
        } else {
            (get_sample_response(text, language), ProviderKind::Offline, None)
        };

        let message = ChatMessage::assistant(content);
        if let Err(e) = self.history.append(&conversation_id, message.clone()).await {
            error!("Reply for {} was not stored, the user message stays unanswered: {}", conversation_id, e);
            return Err(e.into());
        }

        Ok(AssistantReply {
            conversation_id,
            message,
            language,
            answered_by,
            error,
        })
    }

    async fn call_hosted(
        &self,
        provider: ProviderKind,
        language: Language,
        context: &[ChatMessage],
        text: &str
    ) -> Result<String, ProviderError> {
        let client = self.client_for(provider).await?;
        let system_prompt = self.prompts
            .system_prompt(provider, language)
            .map_err(|e| ProviderError::Generic(e.to_string()))?;

        client.complete(ChatRequest {
            system_prompt,
            history: context,
            text,
        }).await
    }

    async fn context_for(
        &self,
        conversation_id: &str,
        supplied: &[ChatMessage]
    ) -> Result<Vec<ChatMessage>, RouterError> {
        let mut context = if supplied.is_empty() {
            self.history.get_history(conversation_id).await?
        } else {
            supplied.to_vec()
        };
        if context.len() > self.context_window {
            context.drain(..context.len() - self.context_window);
        }
        Ok(context)
    }

    async fn conversation_lock(&self, conversation_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.conversation_locks.lock().await;
        Arc::clone(locks.entry(conversation_id.to_string()).or_default())
    }

    // Drops the entry once nobody else holds or waits on it. Waiters clone the
    // Arc under the map lock, so the count cannot grow while it is checked.
    async fn release_conversation_lock(&self, conversation_id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.conversation_locks.lock().await;
        if Arc::strong_count(&lock) == 2 {
            locks.remove(conversation_id);
        }
    }

    // Credential and model are read under the cache write lock, the same lock
    // `set_credential` and `set_model` take, so a client built from stale
    // settings is never cached after they change.
    async fn client_for(&self, provider: ProviderKind) -> Result<Arc<dyn ChatClient>, ProviderError> {
        if let Some(client) = self.clients.read().await.get(&provider) {
            return Ok(Arc::clone(client));
        }

        let mut clients = self.clients.write().await;
        if let Some(client) = clients.get(&provider) {
            return Ok(Arc::clone(client));
        }

        let model = self.state.lock().await.model.clone();
        let config = LlmConfig {
            provider,
            api_key: self.credentials.get(provider),
            completion_model: model,
            base_url: self.base_urls.get(&provider).cloned(),
            request_timeout: self.request_timeout,
        };
        let client = new_chat_client(&config)?;
        info!(
            "Chat client configured: Provider={}, Model={}, BaseURL={:?}",
            provider,
            client.get_model(),
            client.get_base_url()
        );
        clients.insert(provider, Arc::clone(&client));
        Ok(client)
    }

    /// Installs a prebuilt client. It is discarded when the provider's
    /// credential or the model changes.
    pub async fn register_client(&self, provider: ProviderKind, client: Arc<dyn ChatClient>) {
        self.clients.write().await.insert(provider, client);
    }

    pub async fn history(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, RouterError> {
        Ok(self.history.get_history(conversation_id).await?)
    }

    pub async fn clear_history(&self, conversation_id: &str) -> Result<(), RouterError> {
        let lock = self.conversation_lock(conversation_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.history.clear(conversation_id).await
        };
        self.release_conversation_lock(conversation_id, lock).await;
        result?;
        info!("Cleared conversation {}", conversation_id);
        Ok(())
    }

    pub async fn reset_quota_status(&self) {
        self.state.lock().await.tracker.reset();
    }

    /// Stores `api_key` for `provider`. A key with the right prefix also
    /// resets the tracker, lifting a forced offline state.
    pub async fn set_credential(&self, provider: ProviderKind, api_key: &str) -> bool {
        let mut clients = self.clients.write().await;
        self.credentials.set(provider, api_key.to_string());
        clients.remove(&provider);

        let valid = is_valid_credential(provider, api_key);
        let mut state = self.state.lock().await;
        state.credential_generation += 1;
        if valid {
            state.tracker.reset();
            info!("New {} credential accepted", provider);
        } else {
            warn!("{} credential does not look valid, hosted calls stay disabled", provider);
        }
        valid
    }

    pub fn credential_status(&self, provider: ProviderKind) -> bool {
        has_valid_credential(self.credentials.as_ref(), provider)
    }

    pub async fn set_provider(&self, provider: ProviderKind) {
        let mut state = self.state.lock().await;
        if state.provider != provider {
            info!("Provider changed from {} to {}", state.provider, provider);
            state.provider = provider;
        }
    }

    pub async fn set_model(&self, model: Option<String>) {
        let mut clients = self.clients.write().await;
        self.state.lock().await.model = model.filter(|m| !m.trim().is_empty());
        clients.clear();
    }

    pub async fn set_language(&self, language: Language) {
        self.state.lock().await.language = language;
    }

    pub async fn set_auto_detect_language(&self, enabled: bool) {
        self.state.lock().await.auto_detect_language = enabled;
    }

    pub fn set_online(&self, online: bool) {
        self.online.set(online);
    }

    pub async fn status(&self) -> RouterStatus {
        let state = self.state.lock().await;
        let online = self.online.is_online();
        let has_credential = has_valid_credential(self.credentials.as_ref(), state.provider);
        let effective_provider = if
            online &&
            state.provider.is_hosted() &&
            has_credential &&
            !state.tracker.is_offline_forced()
        {
            state.provider
        } else {
            ProviderKind::Offline
        };

        RouterStatus {
            provider: state.provider,
            effective_provider,
            model: state.model.clone().unwrap_or_else(|| state.provider.default_model().to_string()),
            language: state.language,
            auto_detect_language: state.auto_detect_language,
            online,
            has_valid_credential: has_credential,
            state: state.tracker.state(),
            quota_exceeded: state.tracker.quota_exceeded(),
            consecutive_errors: state.tracker.consecutive_errors(),
            last_error: state.tracker.last_error(),
            model_loading_policy: state.tracker.policy(),
        }
    }
}
