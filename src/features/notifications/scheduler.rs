//! Daily notification scheduler
//!
//! One timer-driven task owns the whole run: a single amortized release
//! fetch for the lookahead window, then one batched message per opted-in
//! user whose highlight lists intersect it. The run state token
//! (Idle/Running) is checked-and-set atomically so a tick that fires while a
//! run is still in flight is skipped outright, never queued.
//!
//! Message content is deterministic: matches are deduplicated and ordered by
//! date then title, so re-running a tick against unchanged inputs produces
//! byte-identical text.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.1.0: Per-user dispatch as independent tasks with isolated failures
//! - 1.0.0: Initial daily run loop

use std::collections::HashMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use log::{debug, error, info, warn};
use tokio::task::JoinSet;

use crate::core::{escape_html, normalize_title, MediaKind};
use crate::database::{Database, UserProfile};
use crate::features::metadata::{MetadataProvider, ReleaseEntry, ReleaseWindow};

use super::channel::MessageChannel;

const STATE_IDLE: u8 = 0;
const STATE_RUNNING: u8 = 1;

/// Explicit scheduler state token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
}

/// Outcome of one scheduler tick. A run "succeeds" by completing; partial or
/// zero deliveries still count as a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// The tick fired while a previous run was still in progress.
    pub skipped: bool,
    /// The amortized release fetch failed after its bounded retries.
    pub provider_failed: bool,
    pub profiles_considered: usize,
    pub users_notified: usize,
    pub deliveries_failed: usize,
}

pub struct ReleaseScheduler {
    database: Database,
    provider: Arc<dyn MetadataProvider>,
    channel: Arc<dyn MessageChannel>,
    state: AtomicU8,
    notify_hour_utc: u32,
    lookahead_days: u32,
}

impl ReleaseScheduler {
    pub fn new(
        database: Database,
        provider: Arc<dyn MetadataProvider>,
        channel: Arc<dyn MessageChannel>,
        notify_hour_utc: u32,
        lookahead_days: u32,
    ) -> Self {
        Self {
            database,
            provider,
            channel,
            state: AtomicU8::new(STATE_IDLE),
            notify_hour_utc,
            lookahead_days,
        }
    }

    pub fn run_state(&self) -> RunState {
        match self.state.load(Ordering::SeqCst) {
            STATE_RUNNING => RunState::Running,
            _ => RunState::Idle,
        }
    }

    /// Run forever, ticking once per day at the configured UTC hour.
    pub async fn run(&self) {
        info!(
            "notification scheduler started (daily at {:02}:00 UTC, {}-day lookahead)",
            self.notify_hour_utc, self.lookahead_days
        );
        loop {
            let delay = next_run_delay(Utc::now(), self.notify_hour_utc);
            debug!("next notification run in {}s", delay.as_secs());
            tokio::time::sleep(delay).await;
            self.tick(Utc::now().date_naive()).await;
        }
    }

    /// Execute one notification run for `today`.
    ///
    /// Never returns an error: provider failures, store failures and
    /// per-user delivery failures are all absorbed into the report, and the
    /// state token is back to Idle on every path.
    pub async fn tick(&self, today: NaiveDate) -> RunReport {
        if !self.try_begin_run() {
            warn!("notification tick fired while a run is in progress; skipping");
            return RunReport {
                skipped: true,
                ..RunReport::default()
            };
        }
        let report = self.run_once(today).await;
        self.state.store(STATE_IDLE, Ordering::SeqCst);
        info!(
            "notification run complete: {} notified, {} failed, {} profiles considered",
            report.users_notified, report.deliveries_failed, report.profiles_considered
        );
        report
    }

    fn try_begin_run(&self) -> bool {
        self.state
            .compare_exchange(STATE_IDLE, STATE_RUNNING, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    async fn run_once(&self, today: NaiveDate) -> RunReport {
        let mut report = RunReport::default();
        let window = ReleaseWindow::days_from(today, self.lookahead_days);

        // One upstream fetch amortized across every user in this run
        let releases = match self.provider.upcoming_releases(window).await {
            Ok(releases) => releases,
            Err(err) => {
                error!(
                    "release fetch for {} to {} failed: {err}; no notifications this run",
                    window.start, window.end
                );
                report.provider_failed = true;
                return report;
            }
        };
        let lookup = build_release_lookup(&releases, window);

        let profiles = match self.database.profiles_with_notify().await {
            Ok(profiles) => profiles,
            Err(err) => {
                error!("could not enumerate opted-in profiles: {err}");
                return report;
            }
        };
        report.profiles_considered = profiles.len();

        let mut dispatches = JoinSet::new();
        for profile in profiles {
            let Some(message) = compose_notification(&profile, &lookup) else {
                continue;
            };
            let channel = Arc::clone(&self.channel);
            let chat_id = profile.user_id;
            dispatches.spawn(async move { channel.send(chat_id, &message).await });
        }

        // Failures are collected, logged and dropped; the next daily tick is
        // the retry
        while let Some(joined) = dispatches.join_next().await {
            match joined {
                Ok(Ok(())) => report.users_notified += 1,
                Ok(Err(err)) => {
                    warn!("notification delivery failed: {err}");
                    report.deliveries_failed += 1;
                }
                Err(err) => {
                    warn!("notification dispatch task panicked or was cancelled: {err}");
                    report.deliveries_failed += 1;
                }
            }
        }
        report
    }
}

/// Sleep length until the next occurrence of `hour:00` UTC, strictly in the
/// future so a completed run never double-fires the same day.
fn next_run_delay(now: DateTime<Utc>, hour: u32) -> std::time::Duration {
    let run_time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
    let today_run = now.date_naive().and_time(run_time).and_utc();
    let next = if today_run > now {
        today_run
    } else {
        today_run + chrono::Duration::days(1)
    };
    (next - now)
        .to_std()
        .unwrap_or(std::time::Duration::from_secs(60))
}

type ReleaseLookup = HashMap<(MediaKind, String), Vec<ReleaseEntry>>;

/// Index in-window releases by (kind, normalized title), dropping undated
/// entries and duplicate (title, date) pairs.
fn build_release_lookup(releases: &[ReleaseEntry], window: ReleaseWindow) -> ReleaseLookup {
    let mut lookup: ReleaseLookup = HashMap::new();
    for release in releases {
        let Some(date) = release.release_date else {
            continue;
        };
        if !window.contains(date) {
            continue;
        }
        let slot = lookup
            .entry((release.kind, release.normalized_title()))
            .or_default();
        if slot.iter().any(|seen| seen.release_date == Some(date)) {
            continue;
        }
        slot.push(release.clone());
    }
    lookup
}

/// Build the single batched message for one user, or `None` when nothing in
/// their highlight lists is imminent.
fn compose_notification(profile: &UserProfile, lookup: &ReleaseLookup) -> Option<String> {
    let mut matches = Vec::new();
    for kind in [MediaKind::Series, MediaKind::Movie] {
        for highlight in profile.highlights(kind) {
            let key = (kind, normalize_title(highlight));
            if let Some(entries) = lookup.get(&key) {
                matches.extend(entries.iter().cloned());
            }
        }
    }
    if matches.is_empty() {
        return None;
    }

    // Deterministic content: order by date then title, one line per release
    matches.sort_by(|a, b| {
        (a.release_date, a.normalized_title()).cmp(&(b.release_date, b.normalized_title()))
    });
    matches.dedup_by(|a, b| {
        a.kind == b.kind && a.release_date == b.release_date && a.normalized_title() == b.normalized_title()
    });

    let mut message = String::from("<b>Upcoming Releases:</b>\n");
    for entry in &matches {
        let date = entry
            .release_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "TBA".to_string());
        let verb = match entry.kind {
            MediaKind::Movie => "releases on",
            MediaKind::Series => "airs on",
        };
        message.push_str(&format!(
            "{} <b>{}</b> {verb} <b>{date}</b>\n",
            entry.kind.emoji(),
            escape_html(&entry.title)
        ));
    }
    Some(message.trim_end().to_string())
}
