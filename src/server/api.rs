use crate::llm::ProviderKind;
use crate::models::chat::{ ChatMessage, Conversation, Language, Role };
use crate::router::{ AssistantReply, AssistantRouter, RouterStatus };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::{ get, post, put },
    Router,
    Json,
    extract::{ Path, State },
    response::{ IntoResponse, Response },
    http::StatusCode,
};
use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, error };

#[derive(Deserialize)]
pub struct ChatBody {
    pub message: String,
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// A transcript line replayed by the client; `id` and `timestamp` are
/// generated when absent.
#[derive(Deserialize)]
pub struct HistoryEntry {
    pub id: Option<String>,
    pub role: Role,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl From<HistoryEntry> for ChatMessage {
    fn from(entry: HistoryEntry) -> Self {
        let mut message = ChatMessage::new(entry.role, entry.content);
        if let Some(id) = entry.id {
            message.id = id;
        }
        if let Some(timestamp) = entry.timestamp {
            message.timestamp = timestamp;
        }
        message
    }
}

#[derive(Deserialize, Default)]
pub struct SettingsBody {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub language: Option<String>,
    pub auto_detect_language: Option<bool>,
    pub online: Option<bool>,
}

#[derive(Deserialize)]
pub struct CredentialBody {
    pub api_key: String,
}

#[derive(Serialize)]
struct CredentialResponse {
    provider: ProviderKind,
    valid: bool,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into() }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: message.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

#[derive(Clone)]
struct AppState {
    router: Arc<AssistantRouter>,
}

pub fn build_router(router: Arc<AssistantRouter>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/conversations/{id}", get(get_conversation_handler).delete(clear_conversation_handler))
        .route("/api/status", get(status_handler))
        .route("/api/quota/reset", post(reset_quota_handler))
        .route("/api/settings", put(settings_handler))
        .route("/api/credentials/{provider}", put(credential_handler))
        .layer(cors)
        .with_state(AppState { router })
}

pub async fn start_http_server(
    addr: &str,
    router: Arc<AssistantRouter>
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = addr.parse::<SocketAddr>()?;
    let app = build_router(router);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
        e
    })?;
    info!("HTTP API listening on: http://{}", addr);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(body): Json<ChatBody>
) -> Result<Json<AssistantReply>, ApiError> {
    if body.message.trim().is_empty() {
        return Err(ApiError::bad_request("message must not be empty"));
    }

    let history: Vec<ChatMessage> = body.history.into_iter().map(ChatMessage::from).collect();
    let reply = state.router
        .send_message(&body.message, body.conversation_id.as_deref(), &history).await
        .map_err(|e| {
            error!("Chat request failed: {}", e);
            ApiError::internal(e.to_string())
        })?;
    Ok(Json(reply))
}

async fn get_conversation_handler(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<Json<Conversation>, ApiError> {
    let messages = state.router.history(&id).await.map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(Json(Conversation { id, messages }))
}

async fn clear_conversation_handler(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<StatusCode, ApiError> {
    state.router.clear_history(&id).await.map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn status_handler(State(state): State<AppState>) -> Json<RouterStatus> {
    Json(state.router.status().await)
}

async fn reset_quota_handler(State(state): State<AppState>) -> Json<RouterStatus> {
    state.router.reset_quota_status().await;
    Json(state.router.status().await)
}

async fn settings_handler(
    State(state): State<AppState>,
    Json(body): Json<SettingsBody>
) -> Result<Json<RouterStatus>, ApiError> {
    // Validate everything before applying anything.
    let provider = body.provider
        .as_deref()
        .map(|p| p.parse::<ProviderKind>())
        .transpose()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    let language = body.language
        .as_deref()
        .map(|l| l.parse::<Language>())
        .transpose()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let router = &state.router;
    if let Some(provider) = provider {
        router.set_provider(provider).await;
    }
    if let Some(model) = body.model {
        router.set_model(Some(model)).await;
    }
    if let Some(language) = language {
        router.set_language(language).await;
    }
    if let Some(enabled) = body.auto_detect_language {
        router.set_auto_detect_language(enabled).await;
    }
    if let Some(online) = body.online {
        router.set_online(online);
    }

    Ok(Json(router.status().await))
}

async fn credential_handler(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(body): Json<CredentialBody>
) -> Result<Json<CredentialResponse>, ApiError> {
    let provider = provider.parse::<ProviderKind>().map_err(|e| ApiError::bad_request(e.to_string()))?;
    if !provider.is_hosted() {
        return Err(ApiError::bad_request("offline provider takes no credential"));
    }
    let valid = state.router.set_credential(provider, &body.api_key).await;
    Ok(Json(CredentialResponse { provider, valid }))
}
