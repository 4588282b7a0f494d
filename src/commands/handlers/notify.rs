//! Notification opt-in command handlers
//!
//! Handles: notifyon, notifyoff
//!
//! The flag is the only thing that changes here; the daily scheduler picks
//! opted-in chats up on its next run.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::info;

use crate::commands::context::CommandContext;
use crate::commands::handler::CommandHandler;
use crate::commands::request::CommandRequest;
use crate::features::notifications::MessageChannel;

/// Handler for the notification toggle commands
pub struct NotifyHandler;

#[async_trait]
impl CommandHandler for NotifyHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["notifyon", "notifyoff"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        channel: &dyn MessageChannel,
        request: &CommandRequest,
    ) -> Result<()> {
        let enabled = request.command == "notifyon";
        ctx.database.set_notify(request.chat_id, enabled).await?;
        info!(
            "chat {} turned notifications {}",
            request.chat_id,
            if enabled { "on" } else { "off" }
        );

        let reply = if enabled {
            "🔔 Daily release notifications enabled! You'll get a message when a highlight \
             series or movie is about to be released."
        } else {
            "🔕 Daily release notifications disabled."
        };
        channel.send(request.chat_id, reply).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::handlers::support::{test_context, RecordingChannel};

    #[tokio::test]
    async fn notifyon_opts_the_chat_in() {
        let ctx = test_context().await;
        let channel = RecordingChannel::default();
        let request = CommandRequest::parse(7, None, "/notifyon").unwrap();
        NotifyHandler.handle(ctx.clone(), &channel, &request).await.unwrap();

        assert!(channel.last_text().contains("🔔"));
        let profiles = ctx.database.profiles_with_notify().await.unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].user_id, 7);
    }

    #[tokio::test]
    async fn notifyoff_opts_the_chat_out() {
        let ctx = test_context().await;
        let channel = RecordingChannel::default();
        let on = CommandRequest::parse(7, None, "/notifyon").unwrap();
        NotifyHandler.handle(ctx.clone(), &channel, &on).await.unwrap();

        let off = CommandRequest::parse(7, None, "/notifyoff").unwrap();
        NotifyHandler.handle(ctx.clone(), &channel, &off).await.unwrap();

        assert!(channel.last_text().contains("🔕"));
        assert!(ctx.database.profiles_with_notify().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn toggling_twice_is_idempotent() {
        let ctx = test_context().await;
        let channel = RecordingChannel::default();
        let on = CommandRequest::parse(7, None, "/notifyon").unwrap();
        NotifyHandler.handle(ctx.clone(), &channel, &on).await.unwrap();
        NotifyHandler.handle(ctx.clone(), &channel, &on).await.unwrap();
        assert_eq!(ctx.database.profiles_with_notify().await.unwrap().len(), 1);
    }
}
