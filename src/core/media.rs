//! Shared vocabulary for the two media kinds and the two user-curated lists.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Whether a title is a movie or a TV series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    /// Singular noun, as used in reply text ("movie", "series").
    pub fn noun(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "series",
        }
    }

    /// Plural noun for list headings ("movies", "series").
    pub fn plural(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movies",
            MediaKind::Series => "series",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            MediaKind::Movie => "🎬",
            MediaKind::Series => "📺",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

impl FromStr for MediaKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(MediaKind::Movie),
            "series" | "tv" => Ok(MediaKind::Series),
            _ => Err(anyhow::anyhow!("invalid media kind: {s}")),
        }
    }
}

/// Which of a user's curated lists a title belongs to.
///
/// Highlight lists feed the daily notification run; favourites are a
/// quick-reference list and never trigger notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListKind {
    Highlight,
    Favourite,
}

impl ListKind {
    pub fn label(&self) -> &'static str {
        match self {
            ListKind::Highlight => "highlight",
            ListKind::Favourite => "favourite",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ListKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "highlight" => Ok(ListKind::Highlight),
            "favourite" => Ok(ListKind::Favourite),
            _ => Err(anyhow::anyhow!("invalid list kind: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kind_display_roundtrip() {
        for kind in [MediaKind::Movie, MediaKind::Series] {
            let parsed: MediaKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn media_kind_accepts_tv_alias() {
        assert_eq!("tv".parse::<MediaKind>().unwrap(), MediaKind::Series);
    }

    #[test]
    fn media_kind_rejects_unknown() {
        assert!("podcast".parse::<MediaKind>().is_err());
    }

    #[test]
    fn list_kind_display_roundtrip() {
        for list in [ListKind::Highlight, ListKind::Favourite] {
            let parsed: ListKind = list.to_string().parse().unwrap();
            assert_eq!(parsed, list);
        }
    }
}
