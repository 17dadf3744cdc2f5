//! Chat session history and user settings.
//!
//! The whole session list lives under one store key, newest first. Every
//! read-modify-write goes through `lock` so concurrent requests cannot drop
//! each other's updates.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{ChatMessage, ChatSession, Settings};
use crate::store::{load, save, Store};

pub const HISTORY_KEY: &str = "minegpt-chat-history";
pub const SETTINGS_KEY: &str = "minegpt-settings";

const TITLE_WORDS: usize = 5;

/// First five space-separated words of the message, with `...` appended when
/// anything was cut.
pub fn chat_title(first_message: &str) -> String {
    let words = first_message
        .split(' ')
        .take(TITLE_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    if words.len() < first_message.len() {
        format!("{}...", words)
    } else {
        words
    }
}

pub fn upload_title(file_name: &str) -> String {
    format!("File: {}", file_name)
}

pub struct ChatHistory {
    store: Arc<dyn Store>,
    lock: Mutex<()>,
}

impl ChatHistory {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// All sessions, newest first.
    pub async fn list(&self) -> Result<Vec<ChatSession>, AppError> {
        Ok(load(self.store.as_ref(), HISTORY_KEY).await?.unwrap_or_default())
    }

    pub async fn get(&self, id: &str) -> Result<ChatSession, AppError> {
        self.list()
            .await?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))
    }

    /// Create a session holding `messages` and put it at the front.
    pub async fn create(&self, title: String, messages: Vec<ChatMessage>) -> Result<ChatSession, AppError> {
        let _guard = self.lock.lock().await;
        let mut sessions = self.list().await?;

        let session = ChatSession {
            id: Uuid::new_v4().to_string(),
            title,
            timestamp: Utc::now().timestamp_millis(),
            messages,
        };
        sessions.insert(0, session.clone());
        save(self.store.as_ref(), HISTORY_KEY, &sessions).await?;

        info!("Created chat session {} ({})", session.id, session.title);
        Ok(session)
    }

    /// Append messages to an existing session. List order is left unchanged.
    pub async fn append(&self, id: &str, messages: Vec<ChatMessage>) -> Result<ChatSession, AppError> {
        let _guard = self.lock.lock().await;
        let mut sessions = self.list().await?;

        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;
        session.messages.extend(messages);
        let updated = session.clone();

        save(self.store.as_ref(), HISTORY_KEY, &sessions).await?;
        Ok(updated)
    }

    /// Append to `session_id` when it exists, otherwise start a new session
    /// titled `title`.
    pub async fn record(
        &self,
        session_id: Option<&str>,
        title: String,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatSession, AppError> {
        if let Some(id) = session_id {
            match self.append(id, messages.clone()).await {
                Err(AppError::NotFound(_)) => {
                    warn!("Session {} no longer exists, starting a new one", id);
                }
                other => return other,
            }
        }
        self.create(title, messages).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        let mut sessions = self.list().await?;

        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        if sessions.len() == before {
            return Err(AppError::NotFound(format!("Session {} not found", id)));
        }

        save(self.store.as_ref(), HISTORY_KEY, &sessions).await?;
        info!("Deleted chat session {}", id);
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        self.store.remove(HISTORY_KEY).await?;
        info!("Chat history cleared");
        Ok(())
    }

    pub async fn settings(&self) -> Result<Settings, AppError> {
        Ok(load(self.store.as_ref(), SETTINGS_KEY).await?.unwrap_or_default())
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<(), AppError> {
        save(self.store.as_ref(), SETTINGS_KEY, settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_title() {
        assert_eq!(chat_title("What is the ash content"), "What is the ash content");
        assert_eq!(
            chat_title("How does longwall mining work underground"),
            "How does longwall mining work..."
        );
        assert_eq!(chat_title("hi"), "hi");
        assert_eq!(upload_title("data.csv"), "File: data.csv");
    }
}
