//! TMDB client
//!
//! Implements [`MetadataProvider`] against the TMDB v3 API:
//! `/movie/upcoming` (paged) and `/discover/tv` for release windows,
//! `/search/*` for title lookup, plus the trending/top-rated/popular list
//! endpoints for the browse commands.
//!
//! Every request carries the client-level timeout and a bounded
//! retry-with-exponential-backoff cycle. A 429 maps to
//! [`ProviderError::RateLimited`] (honoring `Retry-After`); transport
//! failures and unexpected statuses map to [`ProviderError::Unavailable`].
//! Neither ever escalates past the calling operation.

use std::time::Duration;

use log::{debug, warn};
use rand::seq::IndexedRandom;
use rand::Rng;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::core::{normalize_title, MediaKind};

use super::cache::WindowCache;
use super::provider::{MetadataProvider, ProviderError, ReleaseWindow};
use super::types::{ReleaseEntry, TmdbMovie, TmdbPage, TmdbShow};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Page cap for window scans; keeps one tick from hammering the API.
const MAX_WINDOW_PAGES: u32 = 5;

/// Popular-list pages sampled by the random-pick commands.
const RANDOM_PICK_PAGES: u32 = 20;

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

pub struct TmdbClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    window_cache: WindowCache,
}

impl TmdbClient {
    /// Build a client with the given per-request timeout and release-window
    /// cache bound (normally the scheduling interval).
    pub fn new(
        api_key: &str,
        timeout: Duration,
        cache_max_age: Duration,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            window_cache: WindowCache::new(cache_max_age),
        })
    }

    /// Fetch one endpoint page, retrying recoverable failures with
    /// exponential backoff. The cycle is bounded to this call; nothing is
    /// carried over to later operations.
    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        let mut backoff = INITIAL_BACKOFF;
        let mut attempt = 1;
        loop {
            match self.request(&url, params).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < MAX_ATTEMPTS => {
                    let delay = retry_delay(&err, backoff);
                    debug!(
                        "TMDB request {path} failed (attempt {attempt}/{MAX_ATTEMPTS}), \
                         retrying in {delay:?}: {err}"
                    );
                    tokio::time::sleep(delay).await;
                    backoff *= 2;
                    attempt += 1;
                }
                Err(err) => {
                    warn!("TMDB request {path} failed after {attempt} attempts: {err}");
                    return Err(err);
                }
            }
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let mut query: Vec<(&str, String)> = vec![
            ("api_key", self.api_key.clone()),
            ("language", "en-US".to_string()),
        ];
        query.extend(params.iter().cloned());

        let response = self
            .http
            .get(url)
            .query(&query)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(ProviderError::RateLimited { retry_after });
        }
        if !status.is_success() {
            return Err(ProviderError::Unavailable(format!(
                "unexpected status {status}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("invalid response body: {e}")))
    }

    async fn upcoming_movies(
        &self,
        window: ReleaseWindow,
    ) -> Result<Vec<ReleaseEntry>, ProviderError> {
        let mut releases = Vec::new();
        for page in 1..=MAX_WINDOW_PAGES {
            let data: TmdbPage<TmdbMovie> = self
                .fetch("/movie/upcoming", &[("page", page.to_string())])
                .await?;
            if data.results.is_empty() {
                break;
            }
            releases.extend(
                data.results
                    .into_iter()
                    .map(TmdbMovie::into_release)
                    .filter(|e| e.release_date.is_some_and(|d| window.contains(d))),
            );
            if data.total_pages != 0 && page >= data.total_pages {
                break;
            }
        }
        Ok(releases)
    }

    async fn upcoming_series(
        &self,
        window: ReleaseWindow,
    ) -> Result<Vec<ReleaseEntry>, ProviderError> {
        let mut releases = Vec::new();
        for page in 1..=MAX_WINDOW_PAGES {
            let data: TmdbPage<TmdbShow> = self
                .fetch(
                    "/discover/tv",
                    &[
                        ("sort_by", "first_air_date.asc".to_string()),
                        ("first_air_date.gte", window.start.to_string()),
                        ("first_air_date.lte", window.end.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;
            if data.results.is_empty() {
                break;
            }
            releases.extend(
                data.results
                    .into_iter()
                    .map(TmdbShow::into_release)
                    .filter(|e| e.release_date.is_some_and(|d| window.contains(d))),
            );
            if data.total_pages != 0 && page >= data.total_pages {
                break;
            }
        }
        Ok(releases)
    }

    async fn list_endpoint(
        &self,
        kind: MediaKind,
        path: &str,
        params: &[(&str, String)],
        limit: usize,
    ) -> Result<Vec<ReleaseEntry>, ProviderError> {
        let entries = match kind {
            MediaKind::Movie => {
                let data: TmdbPage<TmdbMovie> = self.fetch(path, params).await?;
                data.results
                    .into_iter()
                    .map(TmdbMovie::into_release)
                    .collect::<Vec<_>>()
            }
            MediaKind::Series => {
                let data: TmdbPage<TmdbShow> = self.fetch(path, params).await?;
                data.results
                    .into_iter()
                    .map(TmdbShow::into_release)
                    .collect::<Vec<_>>()
            }
        };
        Ok(entries.into_iter().take(limit).collect())
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbClient {
    async fn upcoming_releases(
        &self,
        window: ReleaseWindow,
    ) -> Result<Vec<ReleaseEntry>, ProviderError> {
        if let Some(cached) = self.window_cache.get(&window) {
            debug!("release window {window:?} served from cache");
            return Ok((*cached).clone());
        }
        let mut releases = self.upcoming_movies(window).await?;
        releases.extend(self.upcoming_series(window).await?);
        debug!(
            "fetched {} releases for window {} to {}",
            releases.len(),
            window.start,
            window.end
        );
        self.window_cache.insert(window, releases.clone());
        Ok(releases)
    }

    async fn lookup_by_title(
        &self,
        title: &str,
        kind: MediaKind,
    ) -> Result<Option<ReleaseEntry>, ProviderError> {
        let path = match kind {
            MediaKind::Movie => "/search/movie",
            MediaKind::Series => "/search/tv",
        };
        let results = self
            .list_endpoint(kind, path, &[("query", title.to_string())], usize::MAX)
            .await?;
        Ok(best_match(results, title))
    }

    async fn trending(
        &self,
        kind: MediaKind,
        limit: usize,
    ) -> Result<Vec<ReleaseEntry>, ProviderError> {
        let path = match kind {
            MediaKind::Movie => "/trending/movie/week",
            MediaKind::Series => "/trending/tv/week",
        };
        self.list_endpoint(kind, path, &[], limit).await
    }

    async fn top_rated(
        &self,
        kind: MediaKind,
        limit: usize,
    ) -> Result<Vec<ReleaseEntry>, ProviderError> {
        let path = match kind {
            MediaKind::Movie => "/movie/top_rated",
            MediaKind::Series => "/tv/top_rated",
        };
        self.list_endpoint(kind, path, &[], limit).await
    }

    async fn random_pick(&self, kind: MediaKind) -> Result<Option<ReleaseEntry>, ProviderError> {
        let path = match kind {
            MediaKind::Movie => "/movie/popular",
            MediaKind::Series => "/tv/popular",
        };
        let page = rand::rng().random_range(1..=RANDOM_PICK_PAGES);
        let results = self
            .list_endpoint(kind, path, &[("page", page.to_string())], usize::MAX)
            .await?;
        Ok(results.choose(&mut rand::rng()).cloned())
    }
}

/// A rate-limit hint from the upstream overrides our own backoff step.
fn retry_delay(err: &ProviderError, backoff: Duration) -> Duration {
    match err {
        ProviderError::RateLimited {
            retry_after: Some(hint),
        } => *hint,
        _ => backoff,
    }
}

fn classify_transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Unavailable(format!("request timed out: {err}"))
    } else {
        ProviderError::Unavailable(err.to_string())
    }
}

/// Prefer the exact (normalized) title match; otherwise the provider's top
/// result stands in as the best guess.
fn best_match(results: Vec<ReleaseEntry>, title: &str) -> Option<ReleaseEntry> {
    let wanted = normalize_title(title);
    results
        .iter()
        .find(|e| e.normalized_title() == wanted)
        .cloned()
        .or_else(|| results.into_iter().next())
}
