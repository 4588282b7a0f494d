use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use log::info;
use teloxide::prelude::*;

use marquee::commands::{CommandContext, CommandRequest, CommandRouter};
use marquee::core::Config;
use marquee::database::Database;
use marquee::features::metadata::TmdbClient;
use marquee::features::notifications::{MessageChannel, ReleaseScheduler, TelegramChannel};
use marquee::features::rate_limiting::RateLimiter;

/// Daily scheduling interval; also bounds the release-window cache age.
const SCHEDULE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Per-chat command budget: 10 commands per minute.
const RATE_LIMIT_MAX_COMMANDS: usize = 10;
const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Marquee release tracker bot...");

    let database = Database::new(&config.database_path).await?;
    let tmdb = Arc::new(
        TmdbClient::new(
            &config.tmdb_api_key,
            Duration::from_secs(config.request_timeout_secs),
            SCHEDULE_INTERVAL,
        )
        .map_err(|e| anyhow::anyhow!("failed to build TMDB client: {e}"))?,
    );

    let bot = Bot::new(config.telegram_token.clone());
    let channel: Arc<dyn MessageChannel> = Arc::new(TelegramChannel::new(bot.clone()));

    // Start the daily notification scheduler
    let scheduler = ReleaseScheduler::new(
        database.clone(),
        tmdb.clone(),
        Arc::clone(&channel),
        config.notify_hour_utc,
        config.notify_lookahead_days,
    );
    tokio::spawn(async move { scheduler.run().await });

    let ctx = Arc::new(CommandContext::new(database, tmdb));
    let router = Arc::new(CommandRouter::new(
        ctx,
        RateLimiter::new(RATE_LIMIT_MAX_COMMANDS, RATE_LIMIT_WINDOW),
    ));
    info!(
        "{} commands registered; polling Telegram for updates",
        router.registry().len()
    );

    teloxide::repl(bot, move |_bot: Bot, msg: Message| {
        let router = Arc::clone(&router);
        let channel = Arc::clone(&channel);
        async move {
            let sender = msg.chat.first_name().map(str::to_string);
            let request = msg
                .text()
                .and_then(|text| CommandRequest::parse(msg.chat.id.0, sender, text));
            if let Some(request) = request {
                // One logical task per inbound command; the router never
                // lets a handler failure reach the poll loop
                tokio::spawn(async move {
                    router.dispatch(channel.as_ref(), request).await;
                });
            }
            respond(())
        }
    })
    .await;

    Ok(())
}
