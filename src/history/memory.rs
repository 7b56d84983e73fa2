use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use crate::error::HistoryError;
use crate::history::HistoryStore;
use crate::models::chat::ChatMessage;

/// Process-local store. No eviction; history grows for the life of the process.
#[derive(Default)]
pub struct InMemoryHistoryStore {
    conversations: RwLock<HashMap<String, Vec<ChatMessage>>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(
        &self,
        conversation_id: &str,
        message: ChatMessage
    ) -> Result<(), HistoryError> {
        let mut conversations = self.conversations.write().await;
        conversations.entry(conversation_id.to_string()).or_default().push(message);
        Ok(())
    }

    async fn get_history(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, HistoryError> {
        let conversations = self.conversations.read().await;
        Ok(conversations.get(conversation_id).cloned().unwrap_or_default())
    }

    async fn clear(&self, conversation_id: &str) -> Result<(), HistoryError> {
        let mut conversations = self.conversations.write().await;
        conversations.entry(conversation_id.to_string()).or_default().clear();
        Ok(())
    }

    async fn exists(&self, conversation_id: &str) -> Result<bool, HistoryError> {
        Ok(self.conversations.read().await.contains_key(conversation_id))
    }
}
