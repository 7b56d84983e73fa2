use std::sync::Arc;
use std::sync::atomic::{ AtomicUsize, Ordering };
use async_trait::async_trait;
use serde_json::json;
use wiremock::{ MockServer, Mock, ResponseTemplate };
use wiremock::matchers::{ method, path, header };

use clinic_assistant::config::prompt::PromptConfig;
use clinic_assistant::credentials::{ CredentialStore, InMemoryCredentialStore };
use clinic_assistant::error::{ ErrorKind, ProviderError };
use clinic_assistant::history::InMemoryHistoryStore;
use clinic_assistant::llm::ProviderKind;
use clinic_assistant::llm::chat::{ ChatClient, ChatRequest };
use clinic_assistant::models::chat::{ Language, Role };
use clinic_assistant::offline::get_sample_response;
use clinic_assistant::offline::topics::{ TopicKind, TOPICS };
use clinic_assistant::router::tracker::{ ModelLoadingPolicy, TrackerState };
use clinic_assistant::router::{ AssistantRouter, RouterSettings };
use clinic_assistant::status::OnlineStatus;

struct FailingClient {
    calls: AtomicUsize,
}

#[async_trait]
impl ChatClient for FailingClient {
    async fn complete(&self, _request: ChatRequest<'_>) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::Network("simulated outage".to_string()))
    }

    fn get_model(&self) -> String {
        "failing".to_string()
    }

    fn get_base_url(&self) -> Option<String> {
        None
    }
}

/// Fails or succeeds according to a script of booleans (true = success).
struct ScriptedClient {
    script: std::sync::Mutex<Vec<bool>>,
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn complete(&self, _request: ChatRequest<'_>) -> Result<String, ProviderError> {
        let ok = {
            let mut script = self.script.lock().unwrap();
            if script.is_empty() { true } else { script.remove(0) }
        };
        if ok {
            Ok("hosted reply".to_string())
        } else {
            Err(ProviderError::Generic("HTTP 500: boom".to_string()))
        }
    }

    fn get_model(&self) -> String {
        "scripted".to_string()
    }

    fn get_base_url(&self) -> Option<String> {
        None
    }
}

fn build_router(settings: RouterSettings, keys: Vec<(ProviderKind, &str)>, online: bool) -> AssistantRouter {
    let credentials = InMemoryCredentialStore::with_keys(
        keys.into_iter().map(|(p, k)| (p, k.to_string()))
    );
    AssistantRouter::new(
        settings,
        Arc::new(InMemoryHistoryStore::new()),
        Arc::new(credentials),
        OnlineStatus::new(online),
        Arc::new(PromptConfig::default())
    )
}

fn headache_es() -> &'static str {
    TOPICS.iter().find(|t| t.kind == TopicKind::Headache).unwrap().response.es
}

#[tokio::test]
async fn test_spanish_headache_offline_end_to_end() {
    let settings = RouterSettings {
        language: Language::Es,
        ..RouterSettings::default()
    };
    let router = build_router(settings, vec![(ProviderKind::OpenAI, "sk-test")], false);

    let reply = router.send_message("I have a headache", Some("conv-7"), &[]).await.unwrap();
    assert_eq!(reply.message.content, headache_es());
    assert_eq!(reply.answered_by, ProviderKind::Offline);

    let history = router.history("conv-7").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].content, "I have a headache");
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(history[1].content, headache_es());
}

#[tokio::test]
async fn test_simulated_throw_still_resolves() {
    let router = build_router(RouterSettings::default(), vec![(ProviderKind::OpenAI, "sk-test")], true);
    let client = Arc::new(FailingClient { calls: AtomicUsize::new(0) });
    router.register_client(ProviderKind::OpenAI, client.clone()).await;

    for input in ["baby won't sleep", "", "random words", "¿Qué es la diabetes?"] {
        let reply = router.send_message(input, Some("c"), &[]).await.unwrap();
        assert_eq!(reply.message.role, Role::Assistant);
        assert!(!reply.message.content.is_empty());
    }
    // the third failure forces offline, so the fourth send never reaches the client
    assert_eq!(client.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_three_consecutive_failures_force_offline() {
    let router = build_router(RouterSettings::default(), vec![(ProviderKind::OpenAI, "sk-test")], true);
    let client = Arc::new(ScriptedClient { script: std::sync::Mutex::new(vec![false, false, false]) });
    router.register_client(ProviderKind::OpenAI, client).await;

    for _ in 0..2 {
        let reply = router.send_message("hi", Some("c"), &[]).await.unwrap();
        assert_eq!(reply.error.map(|e| e.kind), Some(ErrorKind::Generic));
    }
    assert_eq!(router.status().await.state, TrackerState::Degrading);

    router.send_message("hi", Some("c"), &[]).await.unwrap();
    let status = router.status().await;
    assert_eq!(status.state, TrackerState::OfflineForced);
    assert_eq!(status.consecutive_errors, 3);
    assert_eq!(status.effective_provider, ProviderKind::Offline);

    let reply = router.send_message("hi", Some("c"), &[]).await.unwrap();
    assert_eq!(reply.answered_by, ProviderKind::Offline);
    assert!(reply.error.is_none());

    router.reset_quota_status().await;
    let status = router.status().await;
    assert_eq!(status.state, TrackerState::Idle);
    let reply = router.send_message("hi", Some("c"), &[]).await.unwrap();
    assert_eq!(reply.answered_by, ProviderKind::OpenAI);
}

#[tokio::test]
async fn test_intervening_success_resets_counter() {
    let router = build_router(RouterSettings::default(), vec![(ProviderKind::OpenAI, "sk-test")], true);
    let client = Arc::new(ScriptedClient {
        script: std::sync::Mutex::new(vec![false, false, true, false]),
    });
    router.register_client(ProviderKind::OpenAI, client).await;

    router.send_message("one", Some("c"), &[]).await.unwrap();
    router.send_message("two", Some("c"), &[]).await.unwrap();
    let reply = router.send_message("three", Some("c"), &[]).await.unwrap();
    assert_eq!(reply.answered_by, ProviderKind::OpenAI);
    assert_eq!(router.status().await.consecutive_errors, 0);

    router.send_message("four", Some("c"), &[]).await.unwrap();
    let status = router.status().await;
    assert_eq!(status.consecutive_errors, 1);
    assert_eq!(status.state, TrackerState::Degrading);
    assert!(!status.quota_exceeded);
}

#[tokio::test]
async fn test_history_alternates_in_append_order() {
    let router = build_router(RouterSettings::default(), vec![], true);
    let n = 5;
    for i in 0..n {
        router.send_message(&format!("question {}", i), Some("ordered"), &[]).await.unwrap();
    }

    let history = router.history("ordered").await.unwrap();
    assert_eq!(history.len(), 2 * n);
    for (i, msg) in history.iter().enumerate() {
        let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
        assert_eq!(msg.role, expected);
    }
    for i in 0..n {
        assert_eq!(history[2 * i].content, format!("question {}", i));
    }
}

#[tokio::test]
async fn test_concurrent_sends_to_one_conversation_stay_paired() {
    let router = Arc::new(build_router(RouterSettings::default(), vec![], true));
    let mut handles = Vec::new();
    for i in 0..8 {
        let router = Arc::clone(&router);
        handles.push(
            tokio::spawn(async move {
                router.send_message(&format!("msg {}", i), Some("shared"), &[]).await.unwrap()
            })
        );
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let history = router.history("shared").await.unwrap();
    assert_eq!(history.len(), 16);
    for pair in history.chunks(2) {
        assert_eq!(pair[0].role, Role::User);
        assert_eq!(pair[1].role, Role::Assistant);
        assert_eq!(pair[1].content, get_sample_response(&pair[0].content, Language::En));
    }
}

#[tokio::test]
async fn test_clear_twice_leaves_history_empty() {
    let router = build_router(RouterSettings::default(), vec![], false);
    router.send_message("hello", Some("c"), &[]).await.unwrap();

    router.clear_history("c").await.unwrap();
    assert!(router.history("c").await.unwrap().is_empty());
    router.clear_history("c").await.unwrap();
    assert!(router.history("c").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_openai_success_via_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(
                json!({
                "choices": [{ "message": { "role": "assistant", "content": "Stay hydrated." } }]
            })
            )
        )
        .expect(1)
        .mount(&mock_server).await;

    let settings = RouterSettings {
        openai_base_url: Some(mock_server.uri()),
        ..RouterSettings::default()
    };
    let router = build_router(settings, vec![(ProviderKind::OpenAI, "sk-test")], true);

    let reply = router.send_message("Any advice for summer?", None, &[]).await.unwrap();
    assert_eq!(reply.message.content, "Stay hydrated.");
    assert_eq!(reply.answered_by, ProviderKind::OpenAI);
    assert!(reply.error.is_none());
}

#[tokio::test]
async fn test_openai_401_sets_quota_exceeded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(
                json!({
                "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
            })
            )
        )
        .mount(&mock_server).await;

    let settings = RouterSettings {
        openai_base_url: Some(mock_server.uri()),
        ..RouterSettings::default()
    };
    let router = build_router(settings, vec![(ProviderKind::OpenAI, "sk-revoked")], true);

    let reply = router.send_message("I have a headache", None, &[]).await.unwrap();
    let error = reply.error.expect("classified error");
    assert_eq!(error.kind, ErrorKind::AuthOrQuota);
    assert!(error.detail.contains("Incorrect API key"));
    assert_eq!(reply.message.content, get_sample_response("I have a headache", Language::En));

    let status = router.status().await;
    assert!(status.quota_exceeded);
    assert_eq!(status.state, TrackerState::OfflineForced);
}

#[tokio::test]
async fn test_malformed_openai_payload_is_generic_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&mock_server).await;

    let settings = RouterSettings {
        openai_base_url: Some(mock_server.uri()),
        ..RouterSettings::default()
    };
    let router = build_router(settings, vec![(ProviderKind::OpenAI, "sk-test")], true);

    let reply = router.send_message("hello", None, &[]).await.unwrap();
    assert_eq!(reply.error.map(|e| e.kind), Some(ErrorKind::Generic));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    let settings = RouterSettings {
        openai_base_url: Some("http://127.0.0.1:1".to_string()),
        ..RouterSettings::default()
    };
    let router = build_router(settings, vec![(ProviderKind::OpenAI, "sk-test")], true);

    let reply = router.send_message("hello", None, &[]).await.unwrap();
    assert_eq!(reply.error.map(|e| e.kind), Some(ErrorKind::Network));
    assert_eq!(reply.answered_by, ProviderKind::Offline);
}

#[tokio::test]
async fn test_llama_proxy_success_and_warmup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/llama"))
        .and(header("Authorization", "Bearer hf_test"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(
                json!({ "error": "Model is currently loading", "estimated_time": 20.0 })
            )
        )
        .up_to_n_times(1)
        .mount(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/models/llama"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "generated_text": " Rest and fluids. " }]))
        )
        .mount(&mock_server).await;

    let settings = RouterSettings {
        provider: ProviderKind::Llama,
        llama_base_url: Some(format!("{}/models/llama", mock_server.uri())),
        model_loading_policy: ModelLoadingPolicy::Ignore,
        ..RouterSettings::default()
    };
    let router = build_router(settings, vec![(ProviderKind::Llama, "hf_test")], true);

    let first = router.send_message("I have a cold", Some("c"), &[]).await.unwrap();
    assert_eq!(first.error.map(|e| e.kind), Some(ErrorKind::ModelLoading));
    assert_eq!(first.answered_by, ProviderKind::Offline);
    assert_eq!(router.status().await.consecutive_errors, 0);

    let second = router.send_message("I have a cold", Some("c"), &[]).await.unwrap();
    assert_eq!(second.message.content, "Rest and fluids.");
    assert_eq!(second.answered_by, ProviderKind::Llama);
    assert_eq!(router.history("c").await.unwrap().len(), 4);
}

/// Credential lookups block for a while, widening the window between
/// reading a key and caching a client built from it.
struct SlowCredentialStore {
    inner: InMemoryCredentialStore,
    delay: std::time::Duration,
}

impl CredentialStore for SlowCredentialStore {
    fn get(&self, provider: ProviderKind) -> Option<String> {
        std::thread::sleep(self.delay);
        self.inner.get(provider)
    }

    fn set(&self, provider: ProviderKind, api_key: String) {
        self.inner.set(provider, api_key)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_credential_replaced_mid_flight_takes_effect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-old"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": { "message": "revoked" } }))
        )
        .mount(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-new"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(
                json!({
                "choices": [{ "message": { "role": "assistant", "content": "Rest and hydrate." } }]
            })
            )
        )
        .mount(&mock_server).await;

    let credentials = SlowCredentialStore {
        inner: InMemoryCredentialStore::with_keys(vec![(ProviderKind::OpenAI, "sk-old".to_string())]),
        delay: std::time::Duration::from_millis(150),
    };
    let settings = RouterSettings {
        openai_base_url: Some(mock_server.uri()),
        ..RouterSettings::default()
    };
    let router = Arc::new(
        AssistantRouter::new(
            settings,
            Arc::new(InMemoryHistoryStore::new()),
            Arc::new(credentials),
            OnlineStatus::new(true),
            Arc::new(PromptConfig::default())
        )
    );

    let first = {
        let router = Arc::clone(&router);
        tokio::spawn(async move { router.send_message("hello", Some("c"), &[]).await })
    };
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert!(router.set_credential(ProviderKind::OpenAI, "sk-new").await);
    first.await.unwrap().unwrap();

    let status = router.status().await;
    assert!(!status.quota_exceeded);
    assert_ne!(status.state, TrackerState::OfflineForced);

    let second = router.send_message("hello again", Some("c"), &[]).await.unwrap();
    assert_eq!(second.answered_by, ProviderKind::OpenAI);
    assert_eq!(second.message.content, "Rest and hydrate.");
}
