//! Highlight list command handlers
//!
//! Handles: addseries, addmovie, removeseries, removemovie, listseries,
//! listmovies
//!
//! Adds go through the metadata provider first: the bare title is validated
//! and enriched to "Title (Year)" before it lands in the list. Adding is
//! idempotent and removal of an absent title is a no-op; both report which
//! case happened.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::{error, info};

use crate::commands::context::CommandContext;
use crate::commands::handler::CommandHandler;
use crate::commands::request::CommandRequest;
use crate::core::{escape_html, ListKind, MediaKind};
use crate::features::notifications::MessageChannel;

/// Handler for the highlight list commands
pub struct HighlightHandler;

#[async_trait]
impl CommandHandler for HighlightHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &[
            "addseries",
            "addmovie",
            "removeseries",
            "removemovie",
            "listseries",
            "listmovies",
        ]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        channel: &dyn MessageChannel,
        request: &CommandRequest,
    ) -> Result<()> {
        match request.command.as_str() {
            "addseries" => self.handle_add(&ctx, channel, request, MediaKind::Series).await,
            "addmovie" => self.handle_add(&ctx, channel, request, MediaKind::Movie).await,
            "removeseries" => {
                self.handle_remove(&ctx, channel, request, MediaKind::Series)
                    .await
            }
            "removemovie" => {
                self.handle_remove(&ctx, channel, request, MediaKind::Movie)
                    .await
            }
            "listseries" => self.handle_list(&ctx, channel, request, MediaKind::Series).await,
            "listmovies" => self.handle_list(&ctx, channel, request, MediaKind::Movie).await,
            _ => Ok(()),
        }
    }
}

impl HighlightHandler {
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

        let lookup = match ctx.provider.lookup_by_title(&request.args, kind).await {
            Ok(lookup) => lookup,
            Err(err) => {
                error!("/{} lookup for {:?} failed: {err}", request.command, request.args);
                channel
                    .send(
                        request.chat_id,
                        &format!(
                            "Sorry, an error occurred while searching for that {}. Please try again later.",
                            kind.noun()
                        ),
                    )
                    .await?;
                return Ok(());
            }
        };
        let Some(entry) = lookup else {
            channel
                .send(request.chat_id, &format!("No matching {} found.", kind.noun()))
                .await?;
            return Ok(());
        };

        let label = entry.label_with_year();
        let added = ctx
            .database
            .add_title(request.chat_id, kind, ListKind::Highlight, &label)
            .await?;
        let reply = if added {
            info!("chat {} highlighted {} {:?}", request.chat_id, kind.noun(), label);
            format!(
                "Added '{}' to your highlight {} list.",
                escape_html(&label),
                kind.plural()
            )
        } else {
            format!(
                "'{}' is already in your highlight {} list.",
                escape_html(&label),
                kind.plural()
            )
        };
        channel.send(request.chat_id, &reply).await?;
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
                .send(request.chat_id, &format!("Usage: /{} [title]", request.command))
                .await?;
            return Ok(());
        }

        let removed = ctx
            .database
            .remove_title(request.chat_id, kind, ListKind::Highlight, &request.args)
            .await?;
        let reply = if removed {
            format!(
                "Removed '{}' from your highlight {} list.",
                escape_html(&request.args),
                kind.plural()
            )
        } else {
            format!(
                "'{}' is not in your highlight {} list.",
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
            .list_titles(request.chat_id, kind, ListKind::Highlight)
            .await?;
        if titles.is_empty() {
            channel
                .send(
                    request.chat_id,
                    &format!("Your highlight {} list is empty.", kind.plural()),
                )
                .await?;
            return Ok(());
        }
        let heading = match kind {
            MediaKind::Movie => "<b>Your Highlight Movies List:</b>",
            MediaKind::Series => "<b>Your Highlight Series List:</b>",
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
