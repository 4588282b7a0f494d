//! Metadata provider trait and error taxonomy
//!
//! The scheduler and command handlers depend on this trait only; the TMDB
//! client is the one production implementation. Both error variants are
//! recoverable: callers retry with backoff inside the current operation and
//! degrade gracefully, never taking the process down.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::core::MediaKind;

use super::types::ReleaseEntry;

/// Errors a metadata provider can surface.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Network failure, timeout, or an unusable upstream response.
    #[error("metadata provider unavailable: {0}")]
    Unavailable(String),

    /// The upstream throttled us; retry after the hinted delay if present.
    #[error("metadata provider rate limited")]
    RateLimited { retry_after: Option<Duration> },
}

/// Inclusive date range queried for a scheduler tick or browse command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReleaseWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReleaseWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Window spanning `days` days forward from `start`, inclusive.
    pub fn days_from(start: NaiveDate, days: u32) -> Self {
        Self {
            start,
            end: start + chrono::Duration::days(i64::from(days)),
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Read-only view of the external release metadata source.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// All known movie and series releases inside the inclusive window.
    async fn upcoming_releases(
        &self,
        window: ReleaseWindow,
    ) -> Result<Vec<ReleaseEntry>, ProviderError>;

    /// Validate and enrich a bare title string. `None` means no match.
    async fn lookup_by_title(
        &self,
        title: &str,
        kind: MediaKind,
    ) -> Result<Option<ReleaseEntry>, ProviderError>;

    /// This week's trending titles of one kind.
    async fn trending(
        &self,
        kind: MediaKind,
        limit: usize,
    ) -> Result<Vec<ReleaseEntry>, ProviderError>;

    /// Top-rated titles of one kind.
    async fn top_rated(
        &self,
        kind: MediaKind,
        limit: usize,
    ) -> Result<Vec<ReleaseEntry>, ProviderError>;

    /// A random popular title of one kind.
    async fn random_pick(&self, kind: MediaKind) -> Result<Option<ReleaseEntry>, ProviderError>;
}
