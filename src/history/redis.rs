use async_trait::async_trait;
use crate::error::HistoryError;
use crate::history::HistoryStore;
use crate::models::chat::ChatMessage;
use log::error;
use redis::{ Client, AsyncCommands };

/// Each conversation is a Redis list of JSON messages (RPUSH keeps append
/// order). Known ids live in a set so a cleared conversation still exists.
pub struct RedisHistoryStore {
    client: Client,
    key_prefix: String,
}

impl RedisHistoryStore {
    pub fn new(host: &str, key_prefix: &str) -> Result<Self, HistoryError> {
        Ok(Self {
            client: Client::open(host)?,
            key_prefix: key_prefix.to_string(),
        })
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }

    fn list_key(&self, conversation_id: &str) -> String {
        format!("{}{}", self.key_prefix, conversation_id)
    }

    fn index_key(&self) -> String {
        format!("{}_ids", self.key_prefix.trim_end_matches(':'))
    }
}

#[async_trait]
impl HistoryStore for RedisHistoryStore {
    async fn append(
        &self,
        conversation_id: &str,
        message: ChatMessage
    ) -> Result<(), HistoryError> {
        let mut conn = self.get_connection().await?;
        let json_msg = serde_json::to_string(&message)?;
        let _: i64 = conn.sadd(self.index_key(), conversation_id).await?;
        let _: i64 = conn.rpush(self.list_key(conversation_id), &json_msg).await?;
        Ok(())
    }

    async fn get_history(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, HistoryError> {
        let mut conn = self.get_connection().await?;
        let json_entries: Vec<String> = conn.lrange(self.list_key(conversation_id), 0, -1).await?;
        let mut messages = Vec::with_capacity(json_entries.len());

        for json_entry in &json_entries {
            match serde_json::from_str::<ChatMessage>(json_entry) {
                Ok(msg) => messages.push(msg),
                Err(e) => {
                    error!("Error parsing history entry: {}", e);
                }
            }
        }

        Ok(messages)
    }

    async fn clear(&self, conversation_id: &str) -> Result<(), HistoryError> {
        let mut conn = self.get_connection().await?;
        let _: i64 = conn.sadd(self.index_key(), conversation_id).await?;
        let _: i64 = conn.del(self.list_key(conversation_id)).await?;
        Ok(())
    }

    async fn exists(&self, conversation_id: &str) -> Result<bool, HistoryError> {
        let mut conn = self.get_connection().await?;
        let known: bool = conn.sismember(self.index_key(), conversation_id).await?;
        Ok(known)
    }
}
