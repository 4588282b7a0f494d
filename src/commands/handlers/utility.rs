//! Utility command handlers
//!
//! Handles: start, help, chatid
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::info;

use crate::commands::context::CommandContext;
use crate::commands::handler::CommandHandler;
use crate::commands::request::CommandRequest;
use crate::core::escape_html;
use crate::features::notifications::MessageChannel;

const HELP_TEXT: &str = "<b>Available Commands</b>\n\
====================\n\n\
<b>General</b>\n\
/start - Show the welcome message.\n\
/movies - Show upcoming movies in the next 30 days.\n\
/series - Show new and returning seasons for your highlight series in the next 120 days.\n\
/chatid - Show your chat ID.\n\
/help - Show this help message.\n\
/trendingseries - Show trending TV series.\n\
/trendingmovies - Show trending movies.\n\
/topseries - Show top-rated TV series.\n\
/topmovies - Show top-rated movies.\n\
/randomseries - Pick a random popular series.\n\
/randommovie - Pick a random popular movie.\n\n\
<b>Highlight lists</b>\n\
/addseries [title] - Add a series to your highlight list.\n\
/addmovie [title] - Add a movie to your highlight list.\n\
/removeseries [title] - Remove a series from your highlight list.\n\
/removemovie [title] - Remove a movie from your highlight list.\n\
/listseries - List all your highlight series.\n\
/listmovies - List all your highlight movies.\n\n\
<b>Favourites</b>\n\
/addfaveseries [series name] - Add a series to your favourites.\n\
/addfavemovie [movie name] - Add a movie to your favourites.\n\
/removefaveseries [series name] - Remove a series from your favourites.\n\
/removefavemovie [movie name] - Remove a movie from your favourites.\n\
/listfaveseries - List all your favourite series.\n\
/listfavemovies - List all your favourite movies.\n\n\
<b>Notifications</b>\n\
/notifyon - Enable daily release notifications.\n\
/notifyoff - Disable daily release notifications.";

/// Handler for utility commands: start, help, chatid
pub struct UtilityHandler;

#[async_trait]
impl CommandHandler for UtilityHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["start", "help", "chatid"]
    }

    async fn handle(
        &self,
        _ctx: Arc<CommandContext>,
        channel: &dyn MessageChannel,
        request: &CommandRequest,
    ) -> Result<()> {
        match request.command.as_str() {
            "start" => self.handle_start(channel, request).await,
            "help" => self.handle_help(channel, request).await,
            "chatid" => self.handle_chatid(channel, request).await,
            _ => Ok(()),
        }
    }
}

impl UtilityHandler {
    async fn handle_start(
        &self,
        channel: &dyn MessageChannel,
        request: &CommandRequest,
    ) -> Result<()> {
        let name = request.sender.as_deref().unwrap_or("there");
        let greeting = format!(
            "Hello {}! 🤖\n\
             Use /movies or /series to see upcoming releases.\n\
             Use /addseries [title] or /addmovie [title] to build your highlight lists.\n\
             To get daily release notifications, use /notifyon. To stop, use /notifyoff.\n\
             Use /help to see all commands.",
            escape_html(name)
        );
        channel.send(request.chat_id, &greeting).await?;
        info!("greeted chat {}", request.chat_id);
        Ok(())
    }

    async fn handle_help(
        &self,
        channel: &dyn MessageChannel,
        request: &CommandRequest,
    ) -> Result<()> {
        channel.send(request.chat_id, HELP_TEXT).await?;
        Ok(())
    }

    async fn handle_chatid(
        &self,
        channel: &dyn MessageChannel,
        request: &CommandRequest,
    ) -> Result<()> {
        channel
            .send(
                request.chat_id,
                &format!("Your chat ID is: {}", request.chat_id),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::handlers::support::{test_context, RecordingChannel};

    #[test]
    fn declares_expected_commands() {
        let names = UtilityHandler.command_names();
        assert_eq!(names, &["start", "help", "chatid"]);
    }

    #[tokio::test]
    async fn chatid_echoes_the_chat() {
        let ctx = test_context().await;
        let channel = RecordingChannel::default();
        let request = CommandRequest::parse(4242, None, "/chatid").unwrap();
        UtilityHandler.handle(ctx, &channel, &request).await.unwrap();
        assert!(channel.last_text().contains("4242"));
    }

    #[tokio::test]
    async fn start_greets_by_name_and_escapes_it() {
        let ctx = test_context().await;
        let channel = RecordingChannel::default();
        let request = CommandRequest::parse(1, Some("Ana & Co".into()), "/start").unwrap();
        UtilityHandler.handle(ctx, &channel, &request).await.unwrap();
        let text = channel.last_text();
        assert!(text.contains("Hello Ana &amp; Co!"));
        assert!(text.contains("/notifyon"));
    }

    #[tokio::test]
    async fn help_lists_every_command_family() {
        let ctx = test_context().await;
        let channel = RecordingChannel::default();
        let request = CommandRequest::parse(1, None, "/help").unwrap();
        UtilityHandler.handle(ctx, &channel, &request).await.unwrap();
        let text = channel.last_text();
        for needle in ["/addseries", "/addfavemovie", "/notifyoff", "/trendingmovies"] {
            assert!(text.contains(needle), "help text missing {needle}");
        }
    }
}
