//! Persisted user store backed by sqlite
//!
//! Holds one profile per chat: the highlight and favourite title lists and
//! the notification opt-in flag. All access goes through a single connection
//! behind an async mutex, so writes to the same profile are serialized and a
//! snapshot read never observes a half-applied mutation. Every mutating call
//! commits before returning; a restart never loses an acknowledged write.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Command usage log
//! - 1.1.0: Favourite lists alongside highlight lists
//! - 1.0.0: Initial schema with profiles and highlight lists

use std::sync::Arc;

use chrono::Utc;
use log::debug;
use sqlite::{Connection, ConnectionThreadSafe, State};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::core::{normalize_title, ListKind, MediaKind};

/// A store operation failed at the sqlite layer.
///
/// Fatal to the triggering command: the mutation did not take effect and the
/// caller surfaces the failure to the user.
#[derive(Debug, Error)]
#[error("user store operation failed: {source}")]
pub struct StoreError {
    #[from]
    source: sqlite::Error,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    user_id        INTEGER PRIMARY KEY,
    notify_enabled INTEGER NOT NULL DEFAULT 0,
    created_at     TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS titles (
    user_id       INTEGER NOT NULL,
    kind          TEXT NOT NULL,
    list          TEXT NOT NULL,
    title         TEXT NOT NULL,
    display_title TEXT NOT NULL,
    added_at      TEXT NOT NULL,
    PRIMARY KEY (user_id, kind, list, title)
);
CREATE TABLE IF NOT EXISTS command_usage (
    user_id INTEGER NOT NULL,
    command TEXT NOT NULL,
    used_at TEXT NOT NULL
);
";

/// One chat's persisted state.
///
/// Created on first interaction with empty lists and notifications off;
/// never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: i64,
    pub highlight_movies: Vec<String>,
    pub highlight_series: Vec<String>,
    pub favourite_movies: Vec<String>,
    pub favourite_series: Vec<String>,
    pub notify_enabled: bool,
}

impl UserProfile {
    /// The highlight list for one media kind.
    pub fn highlights(&self, kind: MediaKind) -> &[String] {
        match kind {
            MediaKind::Movie => &self.highlight_movies,
            MediaKind::Series => &self.highlight_series,
        }
    }

    /// The favourites list for one media kind.
    pub fn favourites(&self, kind: MediaKind) -> &[String] {
        match kind {
            MediaKind::Movie => &self.favourite_movies,
            MediaKind::Series => &self.favourite_series,
        }
    }
}

/// Handle to the user store. Cheap to clone; all clones share one connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<ConnectionThreadSafe>>,
}

impl Database {
    /// Open (creating if needed) the database at `path` and apply the schema.
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open_thread_safe(path)?;
        conn.execute(SCHEMA)?;
        debug!("user store ready at {path}");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Fetch a profile, creating the default (empty lists, notifications off)
    /// on first sight of the user.
    pub async fn get_profile(&self, user_id: i64) -> Result<UserProfile, StoreError> {
        let conn = self.conn.lock().await;
        ensure_user(&conn, user_id)?;
        read_profile(&conn, user_id)
    }

    /// Add a title to one of the user's lists.
    ///
    /// Returns `true` when the title was newly added, `false` when it was
    /// already present under the normalized comparison key.
    pub async fn add_title(
        &self,
        user_id: i64,
        kind: MediaKind,
        list: ListKind,
        display_title: &str,
    ) -> Result<bool, StoreError> {
        let key = normalize_title(display_title);
        let conn = self.conn.lock().await;
        ensure_user(&conn, user_id)?;
        let mut statement = conn.prepare(
            "INSERT OR IGNORE INTO titles (user_id, kind, list, title, display_title, added_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )?;
        statement.bind((1, user_id))?;
        statement.bind((2, kind.noun()))?;
        statement.bind((3, list.label()))?;
        statement.bind((4, key.as_str()))?;
        statement.bind((5, display_title.trim()))?;
        statement.bind((6, Utc::now().to_rfc3339().as_str()))?;
        statement.next()?;
        Ok(conn.change_count() > 0)
    }

    /// Remove a title from one of the user's lists.
    ///
    /// Returns `false` (and changes nothing) when the title is not present.
    pub async fn remove_title(
        &self,
        user_id: i64,
        kind: MediaKind,
        list: ListKind,
        title: &str,
    ) -> Result<bool, StoreError> {
        let key = normalize_title(title);
        let conn = self.conn.lock().await;
        let mut statement = conn.prepare(
            "DELETE FROM titles WHERE user_id = ? AND kind = ? AND list = ? AND title = ?",
        )?;
        statement.bind((1, user_id))?;
        statement.bind((2, kind.noun()))?;
        statement.bind((3, list.label()))?;
        statement.bind((4, key.as_str()))?;
        statement.next()?;
        Ok(conn.change_count() > 0)
    }

    /// Display titles for one list, alphabetically by comparison key.
    pub async fn list_titles(
        &self,
        user_id: i64,
        kind: MediaKind,
        list: ListKind,
    ) -> Result<Vec<String>, StoreError> {
        let conn = self.conn.lock().await;
        read_titles(&conn, user_id, kind, list)
    }

    /// Set the notification opt-in flag. Idempotent.
    pub async fn set_notify(&self, user_id: i64, enabled: bool) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        ensure_user(&conn, user_id)?;
        let mut statement = conn.prepare("UPDATE users SET notify_enabled = ? WHERE user_id = ?")?;
        statement.bind((1, i64::from(enabled)))?;
        statement.bind((2, user_id))?;
        statement.next()?;
        Ok(())
    }

    /// Snapshot of every profile with notifications enabled.
    ///
    /// Taken under a single lock acquisition: each opted-in user appears
    /// exactly once and no profile mixes fields from before and after a
    /// concurrent mutation.
    pub async fn profiles_with_notify(&self) -> Result<Vec<UserProfile>, StoreError> {
        let conn = self.conn.lock().await;
        let mut ids = Vec::new();
        {
            let mut statement =
                conn.prepare("SELECT user_id FROM users WHERE notify_enabled = 1 ORDER BY user_id")?;
            while statement.next()? == State::Row {
                ids.push(statement.read::<i64, _>(0)?);
            }
        }
        let mut profiles = Vec::with_capacity(ids.len());
        for user_id in ids {
            profiles.push(read_profile(&conn, user_id)?);
        }
        Ok(profiles)
    }

    /// Append one row to the command usage log. Best-effort analytics.
    pub async fn log_usage(&self, user_id: i64, command: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let mut statement =
            conn.prepare("INSERT INTO command_usage (user_id, command, used_at) VALUES (?, ?, ?)")?;
        statement.bind((1, user_id))?;
        statement.bind((2, command))?;
        statement.bind((3, Utc::now().to_rfc3339().as_str()))?;
        statement.next()?;
        Ok(())
    }
}

fn ensure_user(conn: &Connection, user_id: i64) -> Result<(), StoreError> {
    let mut statement = conn
        .prepare("INSERT OR IGNORE INTO users (user_id, notify_enabled, created_at) VALUES (?, 0, ?)")?;
    statement.bind((1, user_id))?;
    statement.bind((2, Utc::now().to_rfc3339().as_str()))?;
    statement.next()?;
    Ok(())
}

fn read_profile(conn: &Connection, user_id: i64) -> Result<UserProfile, StoreError> {
    let mut notify_enabled = false;
    {
        let mut statement = conn.prepare("SELECT notify_enabled FROM users WHERE user_id = ?")?;
        statement.bind((1, user_id))?;
        if statement.next()? == State::Row {
            notify_enabled = statement.read::<i64, _>(0)? != 0;
        }
    }
    Ok(UserProfile {
        user_id,
        highlight_movies: read_titles(conn, user_id, MediaKind::Movie, ListKind::Highlight)?,
        highlight_series: read_titles(conn, user_id, MediaKind::Series, ListKind::Highlight)?,
        favourite_movies: read_titles(conn, user_id, MediaKind::Movie, ListKind::Favourite)?,
        favourite_series: read_titles(conn, user_id, MediaKind::Series, ListKind::Favourite)?,
        notify_enabled,
    })
}

fn read_titles(
    conn: &Connection,
    user_id: i64,
    kind: MediaKind,
    list: ListKind,
) -> Result<Vec<String>, StoreError> {
    let mut statement = conn.prepare(
        "SELECT display_title FROM titles
         WHERE user_id = ? AND kind = ? AND list = ? ORDER BY title",
    )?;
    statement.bind((1, user_id))?;
    statement.bind((2, kind.noun()))?;
    statement.bind((3, list.label()))?;
    let mut titles = Vec::new();
    while statement.next()? == State::Row {
        titles.push(statement.read::<String, _>(0)?);
    }
    Ok(titles)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> Database {
        Database::new(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn first_sight_creates_default_profile() {
        let db = memory_db().await;
        let profile = db.get_profile(42).await.unwrap();
        assert_eq!(profile.user_id, 42);
        assert!(!profile.notify_enabled);
        assert!(profile.highlight_movies.is_empty());
        assert!(profile.favourite_series.is_empty());
    }

    #[tokio::test]
    async fn add_title_is_idempotent() {
        let db = memory_db().await;
        let added = db
            .add_title(1, MediaKind::Movie, ListKind::Highlight, "Dune")
            .await
            .unwrap();
        assert!(added);
        let again = db
            .add_title(1, MediaKind::Movie, ListKind::Highlight, "Dune")
            .await
            .unwrap();
        assert!(!again);
        let profile = db.get_profile(1).await.unwrap();
        assert_eq!(profile.highlight_movies, vec!["Dune"]);
    }

    #[tokio::test]
    async fn add_title_dedupes_on_normalized_key() {
        let db = memory_db().await;
        assert!(db
            .add_title(1, MediaKind::Series, ListKind::Highlight, "The Last of Us")
            .await
            .unwrap());
        assert!(!db
            .add_title(1, MediaKind::Series, ListKind::Highlight, "  the LAST of us ")
            .await
            .unwrap());
        let profile = db.get_profile(1).await.unwrap();
        assert_eq!(profile.highlight_series.len(), 1);
        // First spelling wins for display
        assert_eq!(profile.highlight_series[0], "The Last of Us");
    }

    #[tokio::test]
    async fn remove_absent_title_is_a_noop() {
        let db = memory_db().await;
        db.add_title(1, MediaKind::Movie, ListKind::Highlight, "Dune")
            .await
            .unwrap();
        let removed = db
            .remove_title(1, MediaKind::Movie, ListKind::Highlight, "Barbie")
            .await
            .unwrap();
        assert!(!removed);
        let profile = db.get_profile(1).await.unwrap();
        assert_eq!(profile.highlight_movies, vec!["Dune"]);
    }

    #[tokio::test]
    async fn remove_title_matches_normalized() {
        let db = memory_db().await;
        db.add_title(1, MediaKind::Movie, ListKind::Highlight, "Dune (2026)")
            .await
            .unwrap();
        assert!(db
            .remove_title(1, MediaKind::Movie, ListKind::Highlight, " dune (2026) ")
            .await
            .unwrap());
        assert!(db.get_profile(1).await.unwrap().highlight_movies.is_empty());
    }

    #[tokio::test]
    async fn lists_are_independent_per_kind_and_list() {
        let db = memory_db().await;
        db.add_title(1, MediaKind::Movie, ListKind::Highlight, "Dune")
            .await
            .unwrap();
        db.add_title(1, MediaKind::Movie, ListKind::Favourite, "Dune")
            .await
            .unwrap();
        db.add_title(1, MediaKind::Series, ListKind::Highlight, "Dune")
            .await
            .unwrap();
        db.remove_title(1, MediaKind::Movie, ListKind::Highlight, "Dune")
            .await
            .unwrap();
        let profile = db.get_profile(1).await.unwrap();
        assert!(profile.highlight_movies.is_empty());
        assert_eq!(profile.favourite_movies, vec!["Dune"]);
        assert_eq!(profile.highlight_series, vec!["Dune"]);
    }

    #[tokio::test]
    async fn concurrent_adds_to_one_user_both_land() {
        let db = memory_db().await;
        let (a, b) = tokio::join!(
            db.add_title(7, MediaKind::Movie, ListKind::Highlight, "Dune"),
            db.add_title(7, MediaKind::Movie, ListKind::Highlight, "Barbie"),
        );
        assert!(a.unwrap());
        assert!(b.unwrap());
        let profile = db.get_profile(7).await.unwrap();
        assert_eq!(profile.highlight_movies, vec!["Barbie", "Dune"]);
    }

    #[tokio::test]
    async fn notify_flag_controls_snapshot_membership() {
        let db = memory_db().await;
        db.add_title(1, MediaKind::Movie, ListKind::Highlight, "Dune")
            .await
            .unwrap();
        db.add_title(2, MediaKind::Movie, ListKind::Highlight, "Dune")
            .await
            .unwrap();
        db.set_notify(1, true).await.unwrap();

        let profiles = db.profiles_with_notify().await.unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].user_id, 1);
        assert_eq!(profiles[0].highlight_movies, vec!["Dune"]);

        db.set_notify(1, false).await.unwrap();
        assert!(db.profiles_with_notify().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_notify_is_idempotent() {
        let db = memory_db().await;
        db.set_notify(5, true).await.unwrap();
        db.set_notify(5, true).await.unwrap();
        let profiles = db.profiles_with_notify().await.unwrap();
        assert_eq!(profiles.len(), 1);
    }

    #[tokio::test]
    async fn snapshot_has_no_duplicate_users() {
        let db = memory_db().await;
        for id in [1, 2, 3] {
            db.set_notify(id, true).await.unwrap();
        }
        let profiles = db.profiles_with_notify().await.unwrap();
        let ids: Vec<i64> = profiles.iter().map(|p| p.user_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn usage_log_accepts_rows() {
        let db = memory_db().await;
        db.log_usage(9, "movies").await.unwrap();
        db.log_usage(9, "movies").await.unwrap();
    }
}
