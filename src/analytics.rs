// =============================================================================
// Usage Analytics — append-only event log
// =============================================================================
//
// Purely observational: every user action (page view, symbol search, data
// fetch, settings change) is appended to an in-memory list and mirrored to a
// JSON-lines file. Append-only ordering is the only invariant. A missing or
// partially corrupt file degrades to whatever lines still parse — analytics
// must never take the dashboard down.
//
// Single writer: the HTTP layer serialises appends through the internal lock,
// so no cross-process coordination is needed.
// =============================================================================

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};
use uuid::Uuid;

// =============================================================================
// UsageEvent
// =============================================================================

/// Category of a recorded user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageKind {
    PageView,
    SymbolSearch,
    Fetch,
    SettingsChange,
    /// A page-side action that is not a view or a search (tab click,
    /// toggle flip); recorded via POST from the page.
    Interaction,
}

impl std::fmt::Display for UsageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageView => write!(f, "page_view"),
            Self::SymbolSearch => write!(f, "symbol_search"),
            Self::Fetch => write!(f, "fetch"),
            Self::SettingsChange => write!(f, "settings_change"),
            Self::Interaction => write!(f, "interaction"),
        }
    }
}

/// One timestamped user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEvent {
    pub id: Uuid,
    /// Identifies the process session that recorded the event. Events loaded
    /// from an older file without the field get the nil UUID.
    #[serde(default)]
    pub session: Uuid,
    pub at: DateTime<Utc>,
    pub kind: UsageKind,
    /// Free-form detail: the page name, searched symbol, etc.
    pub detail: String,
}

/// Aggregate view of the log for the Analytics tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSummary {
    pub total_events: usize,
    /// Event counts per kind.
    pub by_kind: BTreeMap<String, usize>,
    /// View counts per page (detail of `page_view` events).
    pub page_views: BTreeMap<String, usize>,
    /// Event counts per UTC calendar day (`YYYY-MM-DD`).
    pub by_day: BTreeMap<String, usize>,
    pub first_event_at: Option<DateTime<Utc>>,
    pub last_event_at: Option<DateTime<Utc>>,
}

// =============================================================================
// UsageLog
// =============================================================================

/// Append-only usage log, in-memory with a JSON-lines file mirror.
pub struct UsageLog {
    path: PathBuf,
    /// Stamped on every event this process records; events from earlier
    /// sessions keep the id they were written with.
    session: Uuid,
    events: RwLock<Vec<UsageEvent>>,
}

impl UsageLog {
    /// Open (or create) the log at `path`, loading any previously recorded
    /// events. Unparseable lines are skipped with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let session = Uuid::new_v4();
        let events = Self::load_file(&path);
        debug!(path = %path.display(), %session, count = events.len(), "usage log opened");
        Self {
            path,
            session,
            events: RwLock::new(events),
        }
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    fn load_file(path: &Path) -> Vec<UsageEvent> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Vec::new(), // first run, nothing recorded yet
        };

        let mut events = Vec::new();
        for (lineno, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<UsageEvent>(line) {
                Ok(event) => events.push(event),
                Err(e) => {
                    warn!(path = %path.display(), lineno, error = %e, "skipping bad analytics line");
                }
            }
        }
        events
    }

    /// Record a new event: appended in memory and to the file.
    ///
    /// File I/O is best-effort — a write failure is logged and the in-memory
    /// log keeps going.
    pub fn record(&self, kind: UsageKind, detail: impl Into<String>) -> UsageEvent {
        let event = UsageEvent {
            id: Uuid::new_v4(),
            session: self.session,
            at: Utc::now(),
            kind,
            detail: detail.into(),
        };

        {
            // Hold the lock across the file append so events hit the file in
            // the same order they hit memory.
            let mut events = self.events.write();
            events.push(event.clone());

            if let Err(e) = self.append_line(&event) {
                warn!(path = %self.path.display(), error = %e, "failed to append analytics event");
            }
        }

        event
    }

    fn append_line(&self, event: &UsageEvent) -> std::io::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(event).map_err(std::io::Error::other)?;
        writeln!(file, "{line}")
    }

    /// The most recent `limit` events, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<UsageEvent> {
        let events = self.events.read();
        let start = events.len().saturating_sub(limit);
        events[start..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Drop all recorded events, in memory and on disk.
    pub fn clear(&self) {
        let mut events = self.events.write();
        events.clear();
        if let Err(e) = std::fs::write(&self.path, b"") {
            warn!(path = %self.path.display(), error = %e, "failed to truncate analytics file");
        }
    }

    /// Aggregate counts for the Analytics tab.
    pub fn summary(&self) -> UsageSummary {
        let events = self.events.read();

        let mut by_kind: BTreeMap<String, usize> = BTreeMap::new();
        let mut page_views: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_day: BTreeMap<String, usize> = BTreeMap::new();
        for event in events.iter() {
            *by_kind.entry(event.kind.to_string()).or_default() += 1;
            *by_day
                .entry(event.at.format("%Y-%m-%d").to_string())
                .or_default() += 1;
            if event.kind == UsageKind::PageView {
                *page_views.entry(event.detail.clone()).or_default() += 1;
            }
        }

        UsageSummary {
            total_events: events.len(),
            by_kind,
            page_views,
            by_day,
            first_event_at: events.first().map(|e| e.at),
            last_event_at: events.last().map(|e| e.at),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log(name: &str) -> (UsageLog, PathBuf) {
        let path = std::env::temp_dir().join(format!(
            "marketdeck-analytics-{}-{}.jsonl",
            name,
            Uuid::new_v4()
        ));
        (UsageLog::open(&path), path)
    }

    #[test]
    fn record_appends_in_order() {
        let (log, path) = temp_log("order");
        log.record(UsageKind::PageView, "dashboard");
        log.record(UsageKind::SymbolSearch, "AAPL");
        log.record(UsageKind::Fetch, "AAPL 1mo/1d");

        let events = log.recent(10);
        std::fs::remove_file(&path).ok();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].kind, UsageKind::PageView);
        assert_eq!(events[2].detail, "AAPL 1mo/1d");
        assert!(events[0].at <= events[1].at && events[1].at <= events[2].at);
    }

    #[test]
    fn events_survive_reload() {
        let (log, path) = temp_log("reload");
        log.record(UsageKind::PageView, "overview");
        log.record(UsageKind::SettingsChange, "theme=light");
        drop(log);

        let reloaded = UsageLog::open(&path);
        let events = reloaded.recent(10);
        std::fs::remove_file(&path).ok();

        assert_eq!(events.len(), 2);
        assert_eq!(events[1].detail, "theme=light");
    }

    #[test]
    fn bad_lines_are_skipped_on_load() {
        let path = std::env::temp_dir().join(format!("marketdeck-analytics-bad-{}.jsonl", Uuid::new_v4()));
        let log = UsageLog::open(&path);
        log.record(UsageKind::PageView, "dashboard");
        drop(log);

        // Corrupt the file with a garbage line between valid events.
        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str("not json at all\n");
        std::fs::write(&path, content).unwrap();

        let reloaded = UsageLog::open(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn clear_leaves_zero_events() {
        let (log, path) = temp_log("clear");
        log.record(UsageKind::Fetch, "MSFT");
        log.clear();
        assert!(log.is_empty());

        let reloaded = UsageLog::open(&path);
        std::fs::remove_file(&path).ok();
        assert!(reloaded.is_empty());
    }

    #[test]
    fn summary_counts_match_recorded_events() {
        let (log, path) = temp_log("summary");
        log.record(UsageKind::PageView, "dashboard");
        log.record(UsageKind::PageView, "dashboard");
        log.record(UsageKind::PageView, "overview");
        log.record(UsageKind::SymbolSearch, "NVDA");

        let summary = log.summary();
        std::fs::remove_file(&path).ok();

        assert_eq!(summary.total_events, 4);
        assert_eq!(summary.by_kind["page_view"], 3);
        assert_eq!(summary.by_kind["symbol_search"], 1);
        assert_eq!(summary.page_views["dashboard"], 2);
        assert_eq!(summary.page_views["overview"], 1);
        assert_eq!(summary.by_day.values().sum::<usize>(), 4);
        assert!(summary.first_event_at.unwrap() <= summary.last_event_at.unwrap());
    }

    #[test]
    fn events_carry_the_process_session_id() {
        let (log, path) = temp_log("session");
        let a = log.record(UsageKind::PageView, "dashboard");
        let b = log.record(UsageKind::Interaction, "tab:overview");
        std::fs::remove_file(&path).ok();

        assert_eq!(a.session, log.session());
        assert_eq!(a.session, b.session);
        assert!(!a.session.is_nil());
    }

    #[test]
    fn recent_limits_from_the_tail() {
        let (log, path) = temp_log("recent");
        for i in 0..10 {
            log.record(UsageKind::Fetch, format!("sym{i}"));
        }
        let tail = log.recent(3);
        std::fs::remove_file(&path).ok();
        assert_eq!(tail.len(), 3);
        assert_eq!(tail[2].detail, "sym9");
    }
}
