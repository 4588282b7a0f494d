//! Release entries and the TMDB wire shapes they are decoded from.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::{normalize_title, MediaKind};

/// One upcoming or catalogued title, as reported by the metadata provider.
///
/// Transient: fetched fresh per query, never persisted beyond the bounded
/// release-window cache.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseEntry {
    /// Provider-assigned identifier.
    pub provider_id: u64,
    /// Display title, original casing.
    pub title: String,
    pub kind: MediaKind,
    /// Release (movies) or first-air (series) date; `None` when unannounced.
    pub release_date: Option<NaiveDate>,
    pub rating: Option<f32>,
    pub popularity: Option<f32>,
}

impl ReleaseEntry {
    /// Comparison key used for list intersection.
    pub fn normalized_title(&self) -> String {
        normalize_title(&self.title)
    }

    /// "Title (YYYY)" label used when enriching an add-title command.
    pub fn label_with_year(&self) -> String {
        match self.release_date {
            Some(date) => format!("{} ({})", self.title, date.format("%Y")),
            None => format!("{} (TBA)", self.title),
        }
    }
}

/// One page of a TMDB list endpoint.
#[derive(Debug, Deserialize)]
pub struct TmdbPage<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// A movie row as returned by TMDB list/search endpoints.
#[derive(Debug, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub popularity: Option<f32>,
}

impl TmdbMovie {
    pub fn into_release(self) -> ReleaseEntry {
        ReleaseEntry {
            provider_id: self.id,
            title: self.title,
            kind: MediaKind::Movie,
            release_date: parse_provider_date(self.release_date.as_deref()),
            rating: self.vote_average,
            popularity: self.popularity,
        }
    }
}

/// A TV series row as returned by TMDB list/search endpoints.
#[derive(Debug, Deserialize)]
pub struct TmdbShow {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub popularity: Option<f32>,
}

impl TmdbShow {
    pub fn into_release(self) -> ReleaseEntry {
        ReleaseEntry {
            provider_id: self.id,
            title: self.name,
            kind: MediaKind::Series,
            release_date: parse_provider_date(self.first_air_date.as_deref()),
            rating: self.vote_average,
            popularity: self.popularity,
        }
    }
}

/// TMDB sends dates as "YYYY-MM-DD", and sometimes as an empty string.
fn parse_provider_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_movie_page() {
        let body = r#"{
            "page": 1,
            "total_pages": 3,
            "results": [
                {"id": 693134, "title": "Dune: Part Two", "release_date": "2026-08-05",
                 "vote_average": 8.2, "popularity": 512.4},
                {"id": 1, "title": "Untitled Project", "release_date": ""}
            ]
        }"#;
        let page: TmdbPage<TmdbMovie> = serde_json::from_str(body).unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.results.len(), 2);

        let dune = page.results.into_iter().next().unwrap().into_release();
        assert_eq!(dune.kind, MediaKind::Movie);
        assert_eq!(dune.title, "Dune: Part Two");
        assert_eq!(dune.release_date, Some("2026-08-05".parse().unwrap()));
        assert_eq!(dune.rating, Some(8.2));
    }

    #[test]
    fn decodes_show_page_with_missing_fields() {
        let body = r#"{"results": [{"id": 100, "name": "Severance"}]}"#;
        let page: TmdbPage<TmdbShow> = serde_json::from_str(body).unwrap();
        let entry = page.results.into_iter().next().unwrap().into_release();
        assert_eq!(entry.kind, MediaKind::Series);
        assert_eq!(entry.release_date, None);
        assert_eq!(entry.rating, None);
    }

    #[test]
    fn empty_or_malformed_dates_become_none() {
        assert_eq!(parse_provider_date(None), None);
        assert_eq!(parse_provider_date(Some("")), None);
        assert_eq!(parse_provider_date(Some("  ")), None);
        assert_eq!(parse_provider_date(Some("soon")), None);
        assert_eq!(
            parse_provider_date(Some("2026-08-05")),
            Some("2026-08-05".parse().unwrap())
        );
    }

    #[test]
    fn label_with_year_handles_unannounced_dates() {
        let mut entry = TmdbMovie {
            id: 1,
            title: "Dune Messiah".into(),
            release_date: Some("2027-10-01".into()),
            vote_average: None,
            popularity: None,
        }
        .into_release();
        assert_eq!(entry.label_with_year(), "Dune Messiah (2027)");
        entry.release_date = None;
        assert_eq!(entry.label_with_year(), "Dune Messiah (TBA)");
    }
}
