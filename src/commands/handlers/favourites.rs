//! Favourites command handlers
//!
//! Handles: addfaveseries, addfavemovie, removefaveseries, removefavemovie,
//! listfaveseries, listfavemovies
//!
//! Favourites are a free-form quick-reference list: entries are stored as
//! typed (no provider lookup) and never feed notifications. Adds accept
//! several names at once, separated by `+`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::commands::context::CommandContext;
use crate::commands::handler::CommandHandler;
use crate::commands::request::CommandRequest;
use crate::core::{escape_html, ListKind, MediaKind};
use crate::features::notifications::MessageChannel;

/// Handler for the favourites commands
pub struct FavouritesHandler;

#[async_trait]
impl CommandHandler for FavouritesHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &[
            "addfaveseries",
            "addfavemovie",
            "removefaveseries",
            "removefavemovie",
            "listfaveseries",
            "listfavemovies",
        ]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        channel: &dyn MessageChannel,
        request: &CommandRequest,
    ) -> Result<()> {
        match request.command.as_str() {
            "addfaveseries" => self.handle_add(&ctx, channel, request, MediaKind::Series).await,
            "addfavemovie" => self.handle_add(&ctx, channel, request, MediaKind::Movie).await,
            "removefaveseries" => {
                self.handle_remove(&ctx, channel, request, MediaKind::Series)
                    .await
            }
            "removefavemovie" => {
                self.handle_remove(&ctx, channel, request, MediaKind::Movie)
                    .await
            }
            "listfaveseries" => self.handle_list(&ctx, channel, request, MediaKind::Series).await,
            "listfavemovies" => self.handle_list(&ctx, channel, request, MediaKind::Movie).await,
            _ => Ok(()),
        }
    }
}

impl FavouritesHandler {
    async fn handle_add(
        &self,
        ctx: &CommandContext,
        channel: &dyn MessageChannel,
        request: &CommandRequest,
        kind: MediaKind,
    ) -> Result<()> {
        if request.args.is_empty() {
            channel
                .send(
                    request.chat_id,
                    &format!("Usage: /{} [{} name]", request.command, kind.noun()),
                )
                .await?;
            return Ok(());
        }

        // "name one + name two" adds each part separately
        let names: Vec<&str> = request
            .args
            .split('+')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if names.is_empty() {
            channel
                .send(
                    request.chat_id,
                    &format!("No valid {} names provided.", kind.noun()),
                )
                .await?;
            return Ok(());
        }

        let mut added = Vec::new();
        let mut already = Vec::new();
        for name in names {
            if ctx
                .database
                .add_title(request.chat_id, kind, ListKind::Favourite, name)
                .await?
            {
                added.push(name);
            } else {
                already.push(name);
            }
        }

        let mut reply = String::new();
        if !added.is_empty() {
            reply.push_str(&format!("Added to your favourite {} list:\n", kind.plural()));
            for name in &added {
                reply.push_str(&format!("- {}\n", escape_html(name)));
            }
        }
        if !already.is_empty() {
            reply.push_str(&format!(
                "Already in your favourite {} list:\n",
                kind.plural()
            ));
            for name in &already {
                reply.push_str(&format!("- {}\n", escape_html(name)));
            }
        }
        channel
            .send(request.chat_id, reply.trim_end())
            .await?;
        Ok(())
    }

    async fn handle_remove(
        &self,
        ctx: &CommandContext,
        channel: &dyn MessageChannel,
        request: &CommandRequest,
        kind: MediaKind,
    ) -> Result<()> {
        if request.args.is_empty() {
            channel
                .send(
                    request.chat_id,
                    &format!("Usage: /{} [{} name]", request.command, kind.noun()),
                )
                .await?;
            return Ok(());
        }

        let removed = ctx
            .database
            .remove_title(request.chat_id, kind, ListKind::Favourite, &request.args)
            .await?;
        let reply = if removed {
            format!(
                "Removed '{}' from your favourite {} list.",
                escape_html(&request.args),
                kind.plural()
            )
        } else {
            format!(
                "'{}' is not in your favourite {} list.",
                escape_html(&request.args),
                kind.plural()
            )
        };
        channel.send(request.chat_id, &reply).await?;
        Ok(())
    }

    async fn handle_list(
        &self,
        ctx: &CommandContext,
        channel: &dyn MessageChannel,
        request: &CommandRequest,
        kind: MediaKind,
    ) -> Result<()> {
        let titles = ctx
            .database
            .list_titles(request.chat_id, kind, ListKind::Favourite)
            .await?;
        if titles.is_empty() {
            channel
                .send(
                    request.chat_id,
                    &format!("Your favourite {} list is empty.", kind.plural()),
                )
                .await?;
            return Ok(());
        }
        let heading = match kind {
            MediaKind::Movie => "<b>Your Favourite Movies List:</b>",
            MediaKind::Series => "<b>Your Favourite Series List:</b>",
        };
        let lines: Vec<String> = titles
            .iter()
            .map(|t| format!("- <b>{}</b>", escape_html(t)))
            .collect();
        channel
            .send(request.chat_id, &format!("{heading}\n{}", lines.join("\n")))
            .await?;
        Ok(())
    }
}
