mod memory;
mod redis;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use crate::cli::Args;
use crate::error::HistoryError;
use crate::models::chat::{ ChatMessage, Role };

pub use self::memory::InMemoryHistoryStore;
pub use self::redis::RedisHistoryStore;

/// Ordered, append-only message log keyed by conversation id.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(
        &self,
        conversation_id: &str,
        message: ChatMessage
    ) -> Result<(), HistoryError>;

    /// Messages in append order. Unknown ids read as empty.
    async fn get_history(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, HistoryError>;

    /// Empties the conversation but keeps it registered.
    async fn clear(&self, conversation_id: &str) -> Result<(), HistoryError>;

    async fn exists(&self, conversation_id: &str) -> Result<bool, HistoryError>;
}

pub fn create_history_store(args: &Args) -> Result<Arc<dyn HistoryStore>, HistoryError> {
    match args.history_type.to_lowercase().as_str() {
        "redis" => {
            let store = RedisHistoryStore::new(&args.history_host, &args.history_redis_prefix)?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(InMemoryHistoryStore::new())),
        other => {
            log::warn!("Unsupported history store type '{}', using in-memory store", other);
            Ok(Arc::new(InMemoryHistoryStore::new()))
        }
    }
}

pub fn initialize_history_store(args: &Args) -> Result<Arc<dyn HistoryStore>, HistoryError> {
    info!("Chat history will be stored in: {} at {}", args.history_type, args.history_host);
    create_history_store(args)
}

pub fn format_history_for_prompt(messages: &[ChatMessage]) -> String {
    let mut result = String::new();
    for msg in messages {
        let role_display = match msg.role {
            Role::User => "User",
            Role::Assistant => "Assistant",
            Role::System => "System",
        };

        result.push_str(&format!("{}: {}\n", role_display, msg.content));
    }

    result
}
