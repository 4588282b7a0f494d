//! Browse command handlers
//!
//! Handles: movies, series, trendingseries, trendingmovies, topseries,
//! topmovies, randomseries, randommovie
//!
//! Read-only queries against the metadata provider. Provider outages are
//! answered with an apology reply and never bubble past the handler.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use log::error;

use crate::commands::context::CommandContext;
use crate::commands::handler::CommandHandler;
use crate::commands::request::CommandRequest;
use crate::core::{escape_html, normalize_title, MediaKind};
use crate::features::metadata::{ProviderError, ReleaseEntry, ReleaseWindow};
use crate::features::notifications::MessageChannel;

/// How far ahead /movies looks.
const MOVIE_WINDOW_DAYS: u32 = 30;
/// How far ahead /series looks for highlight-series premieres.
const SERIES_WINDOW_DAYS: u32 = 120;
/// Cap on /movies output.
const MOVIE_LIST_LIMIT: usize = 50;
/// Cap on trending/top lists.
const SHORT_LIST_LIMIT: usize = 10;

/// Handler for the read-only browse commands
pub struct BrowseHandler;

#[async_trait]
impl CommandHandler for BrowseHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &[
            "movies",
            "series",
            "trendingseries",
            "trendingmovies",
            "topseries",
            "topmovies",
            "randomseries",
            "randommovie",
        ]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        channel: &dyn MessageChannel,
        request: &CommandRequest,
    ) -> Result<()> {
        match request.command.as_str() {
            "movies" => self.handle_movies(&ctx, channel, request).await,
            "series" => self.handle_series(&ctx, channel, request).await,
            "trendingseries" => {
                self.handle_listing(&ctx, channel, request, Listing::Trending, MediaKind::Series)
                    .await
            }
            "trendingmovies" => {
                self.handle_listing(&ctx, channel, request, Listing::Trending, MediaKind::Movie)
                    .await
            }
            "topseries" => {
                self.handle_listing(&ctx, channel, request, Listing::TopRated, MediaKind::Series)
                    .await
            }
            "topmovies" => {
                self.handle_listing(&ctx, channel, request, Listing::TopRated, MediaKind::Movie)
                    .await
            }
            "randomseries" => self.handle_random(&ctx, channel, request, MediaKind::Series).await,
            "randommovie" => self.handle_random(&ctx, channel, request, MediaKind::Movie).await,
            _ => Ok(()),
        }
    }
}

enum Listing {
    Trending,
    TopRated,
}

impl BrowseHandler {
    /// Handle /movies - all upcoming movies in the next month
    async fn handle_movies(
        &self,
        ctx: &CommandContext,
        channel: &dyn MessageChannel,
        request: &CommandRequest,
    ) -> Result<()> {
        let window = ReleaseWindow::days_from(Utc::now().date_naive(), MOVIE_WINDOW_DAYS);
        let releases = match ctx.provider.upcoming_releases(window).await {
            Ok(releases) => releases,
            Err(err) => {
                return self
                    .apologize(channel, request, "movie data", err)
                    .await
            }
        };

        let mut movies: Vec<ReleaseEntry> = releases
            .into_iter()
            .filter(|e| e.kind == MediaKind::Movie)
            .collect();
        if movies.is_empty() {
            channel
                .send(request.chat_id, "No upcoming movies found.")
                .await?;
            return Ok(());
        }
        movies.sort_by(|a, b| {
            (a.release_date, a.normalized_title()).cmp(&(b.release_date, b.normalized_title()))
        });
        movies.truncate(MOVIE_LIST_LIMIT);

        let blocks: Vec<String> = movies
            .iter()
            .map(|movie| {
                format!(
                    "🎬 <b>{}</b>\n📅 Release Date: <b>{}</b>\n⭐ Rating: <b>{}</b>\n🔥 Popularity: <b>{}</b>",
                    escape_html(&movie.title),
                    format_date(movie),
                    format_rating(movie.rating),
                    format_popularity(movie.popularity),
                )
            })
            .collect();
        let reply = format!("<b>Upcoming Movies:</b>\n\n{}", blocks.join("\n\n"));
        channel.send(request.chat_id, &reply).await?;
        Ok(())
    }

    /// Handle /series - upcoming premieres restricted to the chat's
    /// highlight series
    async fn handle_series(
        &self,
        ctx: &CommandContext,
        channel: &dyn MessageChannel,
        request: &CommandRequest,
    ) -> Result<()> {
        let profile = ctx.database.get_profile(request.chat_id).await?;
        if profile.highlight_series.is_empty() {
            channel
                .send(
                    request.chat_id,
                    "Your highlight series list is empty. Add one with /addseries [title].",
                )
                .await?;
            return Ok(());
        }

        let window = ReleaseWindow::days_from(Utc::now().date_naive(), SERIES_WINDOW_DAYS);
        let releases = match ctx.provider.upcoming_releases(window).await {
            Ok(releases) => releases,
            Err(err) => {
                return self
                    .apologize(channel, request, "TV series data", err)
                    .await
            }
        };

        let highlighted: Vec<String> = profile
            .highlight_series
            .iter()
            .map(|t| normalize_title(t))
            .collect();
        let mut matches: Vec<ReleaseEntry> = releases
            .into_iter()
            .filter(|e| e.kind == MediaKind::Series)
            .filter(|e| highlighted.contains(&e.normalized_title()))
            .collect();
        if matches.is_empty() {
            channel
                .send(
                    request.chat_id,
                    &format!(
                        "No new or returning seasons found for your highlight series in the next {SERIES_WINDOW_DAYS} days."
                    ),
                )
                .await?;
            return Ok(());
        }

        // Most popular first, ties broken by air date
        matches.sort_by(|a, b| {
            let pop_a = a.popularity.unwrap_or(0.0);
            let pop_b = b.popularity.unwrap_or(0.0);
            pop_b
                .partial_cmp(&pop_a)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.release_date.cmp(&b.release_date))
        });

        let blocks: Vec<String> = matches
            .iter()
            .map(|show| {
                format!(
                    "✨📺 <b>{}</b>\n📅 Premiere: <b>{}</b>\n⭐ Rating: <b>{}</b>\n🔥 Popularity: <b>{}</b>",
                    escape_html(&show.title),
                    format_date(show),
                    format_rating(show.rating),
                    format_popularity(show.popularity),
                )
            })
            .collect();
        let reply = format!(
            "<b>New &amp; Returning Seasons (Next {SERIES_WINDOW_DAYS} Days):</b>\n\n{}",
            blocks.join("\n\n")
        );
        channel.send(request.chat_id, &reply).await?;
        Ok(())
    }

    /// Handle the trending/top-rated list commands
    async fn handle_listing(
        &self,
        ctx: &CommandContext,
        channel: &dyn MessageChannel,
        request: &CommandRequest,
        listing: Listing,
        kind: MediaKind,
    ) -> Result<()> {
        let (result, noun) = match listing {
            Listing::Trending => (
                ctx.provider.trending(kind, SHORT_LIST_LIMIT).await,
                "Trending",
            ),
            Listing::TopRated => (
                ctx.provider.top_rated(kind, SHORT_LIST_LIMIT).await,
                "Top-Rated",
            ),
        };
        let kind_label = match kind {
            MediaKind::Movie => "Movies",
            MediaKind::Series => "TV Series",
        };
        let entries = match result {
            Ok(entries) => entries,
            Err(err) => {
                let what = format!("{} {}", noun.to_lowercase(), kind_label.to_lowercase());
                return self.apologize(channel, request, &what, err).await;
            }
        };
        if entries.is_empty() {
            channel
                .send(
                    request.chat_id,
                    &format!("No {} {} found.", noun.to_lowercase(), kind_label.to_lowercase()),
                )
                .await?;
            return Ok(());
        }
        let lines: Vec<String> = entries
            .iter()
            .map(|e| format!("<b>{}</b> ({})", escape_html(&e.title), format_date(e)))
            .collect();
        let reply = format!("<b>{noun} {kind_label}:</b>\n{}", lines.join("\n"));
        channel.send(request.chat_id, &reply).await?;
        Ok(())
    }

    /// Handle /randomseries and /randommovie
    async fn handle_random(
        &self,
        ctx: &CommandContext,
        channel: &dyn MessageChannel,
        request: &CommandRequest,
        kind: MediaKind,
    ) -> Result<()> {
        let pick = match ctx.provider.random_pick(kind).await {
            Ok(pick) => pick,
            Err(err) => {
                let what = format!("a random {}", kind.noun());
                return self.apologize(channel, request, &what, err).await;
            }
        };
        let reply = match pick {
            Some(entry) => format!("<b>{}</b> ({})", escape_html(&entry.title), format_date(&entry)),
            None => format!("No {} found.", kind.noun()),
        };
        channel.send(request.chat_id, &reply).await?;
        Ok(())
    }

    /// Provider outage reply: log it, apologize, swallow the error.
    async fn apologize(
        &self,
        channel: &dyn MessageChannel,
        request: &CommandRequest,
        what: &str,
        err: ProviderError,
    ) -> Result<()> {
        error!("/{} failed fetching {what}: {err}", request.command);
        channel
            .send(
                request.chat_id,
                &format!("Sorry, an error occurred while fetching {what}. Please try again later."),
            )
            .await?;
        Ok(())
    }
}

fn format_date(entry: &ReleaseEntry) -> String {
    entry
        .release_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "TBA".to_string())
}

fn format_rating(rating: Option<f32>) -> String {
    rating
        .map(|r| format!("{r:.1}"))
        .unwrap_or_else(|| "N/A".to_string())
}

fn format_popularity(popularity: Option<f32>) -> String {
    popularity
        .map(|p| format!("{}", p as i64))
        .unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::handlers::support::{
        entry, test_context_with, RecordingChannel, StubProvider,
    };
    use crate::core::ListKind;
    use chrono::Duration;

    fn in_days(days: i64) -> String {
        (Utc::now().date_naive() + Duration::days(days)).to_string()
    }

    #[tokio::test]
    async fn movies_lists_upcoming_releases() {
        let soon = in_days(5);
        let ctx = test_context_with(StubProvider {
            releases: vec![
                entry("Dune Messiah", MediaKind::Movie, Some(&soon)),
                entry("Severance", MediaKind::Series, Some(&soon)),
            ],
            ..StubProvider::default()
        })
        .await;
        let channel = RecordingChannel::default();
        let request = CommandRequest::parse(1, None, "/movies").unwrap();
        BrowseHandler.handle(ctx, &channel, &request).await.unwrap();
        let text = channel.last_text();
        assert!(text.contains("Upcoming Movies"));
        assert!(text.contains("Dune Messiah"));
        assert!(!text.contains("Severance"), "series must not leak into /movies");
    }

    #[tokio::test]
    async fn movies_with_nothing_upcoming_says_so() {
        let ctx = test_context_with(StubProvider::default()).await;
        let channel = RecordingChannel::default();
        let request = CommandRequest::parse(1, None, "/movies").unwrap();
        BrowseHandler.handle(ctx, &channel, &request).await.unwrap();
        assert_eq!(channel.last_text(), "No upcoming movies found.");
    }

    #[tokio::test]
    async fn provider_outage_gets_an_apology_not_an_error() {
        let ctx = test_context_with(StubProvider {
            fail: true,
            ..StubProvider::default()
        })
        .await;
        let channel = RecordingChannel::default();
        let request = CommandRequest::parse(1, None, "/movies").unwrap();
        let result = BrowseHandler.handle(ctx, &channel, &request).await;
        assert!(result.is_ok());
        assert!(channel.last_text().contains("Sorry"));
    }

    #[tokio::test]
    async fn series_shows_only_highlighted_titles() {
        let soon = in_days(10);
        let ctx = test_context_with(StubProvider {
            releases: vec![
                entry("Severance", MediaKind::Series, Some(&soon)),
                entry("Some Other Show", MediaKind::Series, Some(&soon)),
            ],
            ..StubProvider::default()
        })
        .await;
        ctx.database
            .add_title(1, MediaKind::Series, ListKind::Highlight, "severance")
            .await
            .unwrap();
        let channel = RecordingChannel::default();
        let request = CommandRequest::parse(1, None, "/series").unwrap();
        BrowseHandler.handle(ctx, &channel, &request).await.unwrap();
        let text = channel.last_text();
        assert!(text.contains("Severance"));
        assert!(!text.contains("Some Other Show"));
    }

    #[tokio::test]
    async fn series_with_empty_highlight_list_points_at_addseries() {
        let ctx = test_context_with(StubProvider::default()).await;
        let channel = RecordingChannel::default();
        let request = CommandRequest::parse(1, None, "/series").unwrap();
        BrowseHandler.handle(ctx, &channel, &request).await.unwrap();
        assert!(channel.last_text().contains("/addseries"));
    }

    #[tokio::test]
    async fn trending_and_top_render_short_lists() {
        let ctx = test_context_with(StubProvider {
            catalog: vec![
                entry("Arcane", MediaKind::Series, None),
                entry("Dune", MediaKind::Movie, Some("2026-08-05")),
            ],
            ..StubProvider::default()
        })
        .await;
        let channel = RecordingChannel::default();

        let request = CommandRequest::parse(1, None, "/trendingseries").unwrap();
        BrowseHandler
            .handle(ctx.clone(), &channel, &request)
            .await
            .unwrap();
        assert!(channel.last_text().contains("Trending TV Series"));
        assert!(channel.last_text().contains("Arcane"));
        assert!(channel.last_text().contains("TBA"));

        let request = CommandRequest::parse(1, None, "/topmovies").unwrap();
        BrowseHandler
            .handle(ctx, &channel, &request)
            .await
            .unwrap();
        assert!(channel.last_text().contains("Top-Rated Movies"));
        assert!(channel.last_text().contains("Dune"));
    }

    #[tokio::test]
    async fn random_pick_replies_with_a_title_or_a_shrug() {
        let ctx = test_context_with(StubProvider {
            catalog: vec![entry("Arcane", MediaKind::Series, None)],
            ..StubProvider::default()
        })
        .await;
        let channel = RecordingChannel::default();

        let request = CommandRequest::parse(1, None, "/randomseries").unwrap();
        BrowseHandler
            .handle(ctx.clone(), &channel, &request)
            .await
            .unwrap();
        assert!(channel.last_text().contains("Arcane"));

        let request = CommandRequest::parse(1, None, "/randommovie").unwrap();
        BrowseHandler.handle(ctx, &channel, &request).await.unwrap();
        assert_eq!(channel.last_text(), "No movie found.");
    }
}
