//! Outbound message channel
//!
//! The scheduler and the command handlers only ever see the
//! [`MessageChannel`] capability; the Telegram implementation lives here and
//! stays the single place that knows about the transport.

use async_trait::async_trait;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode};
use thiserror::Error;

use crate::core::chunk_message;

/// A best-effort delivery to one chat failed.
///
/// Logged and dropped by callers; never retried within the same run.
#[derive(Debug, Clone, Error)]
#[error("delivery to chat {chat_id} failed: {reason}")]
pub struct DeliveryError {
    pub chat_id: i64,
    pub reason: String,
}

/// Best-effort outbound delivery of one text message to one chat.
#[async_trait]
pub trait MessageChannel: Send + Sync {
    async fn send(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError>;
}

/// Telegram implementation: HTML parse mode, chunked to the message limit.
pub struct TelegramChannel {
    bot: Bot,
}

impl TelegramChannel {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MessageChannel for TelegramChannel {
    async fn send(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError> {
        for chunk in chunk_message(text) {
            self.bot
                .send_message(ChatId(chat_id), chunk)
                .parse_mode(ParseMode::Html)
                .await
                .map_err(|e| DeliveryError {
                    chat_id,
                    reason: e.to_string(),
                })?;
        }
        Ok(())
    }
}
