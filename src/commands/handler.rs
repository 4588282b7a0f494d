//! Command handler trait
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation for modular command handling

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::features::notifications::MessageChannel;

use super::context::CommandContext;
use super::request::CommandRequest;

/// Trait for bot command handlers
///
/// Each handler processes one or more commands and is registered with a
/// [`super::registry::CommandRegistry`] for dispatch by command name.
/// Replies go out through the supplied [`MessageChannel`]; a returned error
/// means the command failed and the router sends the generic failure reply.
///
/// # Example
///
/// ```ignore
/// pub struct PingHandler;
///
/// #[async_trait]
/// impl CommandHandler for PingHandler {
///     fn command_names(&self) -> &'static [&'static str] {
///         &["ping"]
///     }
///
///     async fn handle(
///         &self,
///         _ctx: Arc<CommandContext>,
///         channel: &dyn MessageChannel,
///         request: &CommandRequest,
///     ) -> Result<()> {
///         channel.send(request.chat_id, "Pong!").await?;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Command name(s) this handler processes.
    fn command_names(&self) -> &'static [&'static str];

    /// Handle one inbound command.
    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        channel: &dyn MessageChannel,
        request: &CommandRequest,
    ) -> Result<()>;
}
