//! # Command Routing
//!
//! Inbound command surface: request parsing, the handler trait and registry,
//! and the router that ties them together with rate limiting, usage logging
//! and error-reply fallback. One logical task per inbound command; the store
//! serializes whatever they do concurrently.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

pub mod context;
pub mod handler;
pub mod handlers;
pub mod registry;
pub mod request;

use std::sync::Arc;

use log::{debug, error, warn};
use uuid::Uuid;

use crate::features::notifications::MessageChannel;
use crate::features::rate_limiting::RateLimiter;

pub use context::CommandContext;
pub use handler::CommandHandler;
pub use registry::CommandRegistry;
pub use request::CommandRequest;

/// Dispatches parsed requests to their handlers.
///
/// Never returns an error to the transport: handler failures are logged and
/// answered with a generic failure reply so one bad command can't take the
/// poll loop down.
pub struct CommandRouter {
    registry: CommandRegistry,
    ctx: Arc<CommandContext>,
    rate_limiter: RateLimiter,
}

impl CommandRouter {
    /// Build a router over the full handler set.
    pub fn new(ctx: Arc<CommandContext>, rate_limiter: RateLimiter) -> Self {
        let mut registry = CommandRegistry::new();
        for handler in handlers::create_all_handlers() {
            registry.register(handler);
        }
        Self {
            registry,
            ctx,
            rate_limiter,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Route one request to its handler.
    pub async fn dispatch(&self, channel: &dyn MessageChannel, request: CommandRequest) {
        let request_id = Uuid::new_v4();
        debug!(
            "[{request_id}] /{} from chat {} (args: {:?})",
            request.command, request.chat_id, request.args
        );

        let Some(handler) = self.registry.get(&request.command) else {
            // Unknown commands are silently ignored, like the platform does
            debug!("[{request_id}] no handler for /{}", request.command);
            return;
        };

        if !self.rate_limiter.check(request.chat_id) {
            warn!(
                "[{request_id}] chat {} exceeded the command rate limit",
                request.chat_id
            );
            self.reply(
                channel,
                request.chat_id,
                "⏳ You're sending commands too quickly. Give me a moment.",
            )
            .await;
            return;
        }

        if let Err(e) = self
            .ctx
            .database
            .log_usage(request.chat_id, &request.command)
            .await
        {
            debug!("[{request_id}] usage log write failed: {e}");
        }

        if let Err(e) = handler
            .handle(Arc::clone(&self.ctx), channel, &request)
            .await
        {
            error!("[{request_id}] /{} failed: {e:#}", request.command);
            self.reply(
                channel,
                request.chat_id,
                "Sorry, something went wrong while handling that command.",
            )
            .await;
        }
    }

    async fn reply(&self, channel: &dyn MessageChannel, chat_id: i64, text: &str) {
        if let Err(e) = channel.send(chat_id, text).await {
            debug!("reply to chat {chat_id} failed: {e}");
        }
    }
}
