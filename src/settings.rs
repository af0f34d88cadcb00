// =============================================================================
// Dashboard Settings — persisted user preferences with atomic save
// =============================================================================
//
// Every preference the UI exposes lives here so a browser refresh (or a
// process restart) comes back with the same view.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.  All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older settings file.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{Interval, Range, Theme};

/// Bounds for the auto-refresh interval, in seconds.
pub const MIN_REFRESH_SECS: u64 = 5;
pub const MAX_REFRESH_SECS: u64 = 300;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_watchlist() -> Vec<String> {
    vec!["AAPL".to_string(), "MSFT".to_string(), "GOOGL".to_string()]
}

fn default_refresh_secs() -> u64 {
    60
}

// =============================================================================
// IndicatorToggles
// =============================================================================

/// Which indicator families are computed and drawn.
///
/// Everything except Bollinger defaults to `true`; the bands clutter the
/// price chart, so a fresh install leaves them off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorToggles {
    #[serde(default = "default_true")]
    pub sma: bool,
    #[serde(default = "default_true")]
    pub ema: bool,
    #[serde(default = "default_true")]
    pub macd: bool,
    #[serde(default)]
    pub bollinger: bool,
    #[serde(default = "default_true")]
    pub rsi: bool,
    #[serde(default = "default_true")]
    pub atr: bool,
    #[serde(default = "default_true")]
    pub obv: bool,
}

impl Default for IndicatorToggles {
    fn default() -> Self {
        Self {
            sma: true,
            ema: true,
            macd: true,
            bollinger: false,
            rsi: true,
            atr: true,
            obv: true,
        }
    }
}

// =============================================================================
// DashboardSettings
// =============================================================================

/// Top-level user settings for the dashboard.
///
/// Treated as an immutable snapshot per render cycle: a request reads the
/// settings once, runs the fetch → compute → assemble pipeline against that
/// snapshot, and never observes a mid-request change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// Symbols shown on the watchlist / default dashboard tab.
    #[serde(default = "default_watchlist")]
    pub watchlist: Vec<String>,

    /// Lookback window used when a request does not specify one.
    #[serde(default)]
    pub default_range: Range,

    /// Bar interval used when a request does not specify one.
    #[serde(default)]
    pub default_interval: Interval,

    /// Whether the page re-polls on a timer.
    #[serde(default = "default_true")]
    pub auto_refresh: bool,

    /// Poll period in seconds, clamped to [MIN_REFRESH_SECS, MAX_REFRESH_SECS].
    #[serde(default = "default_refresh_secs")]
    pub refresh_interval_secs: u64,

    /// Display theme.
    #[serde(default)]
    pub theme: Theme,

    /// Indicator families to compute and draw.
    #[serde(default)]
    pub indicators: IndicatorToggles,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            watchlist: default_watchlist(),
            default_range: Range::OneMonth,
            default_interval: Interval::OneDay,
            auto_refresh: true,
            refresh_interval_secs: default_refresh_secs(),
            theme: Theme::Dark,
            indicators: IndicatorToggles::default(),
        }
    }
}

impl DashboardSettings {
    /// Load settings from a JSON file at `path`.
    ///
    /// If the file does not exist or is corrupt, returns an error so the
    /// caller can fall back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;

        let mut settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse settings from {}", path.display()))?;
        settings.clamp_refresh();

        info!(
            path = %path.display(),
            watchlist = ?settings.watchlist,
            range = %settings.default_range,
            "settings loaded"
        );

        Ok(settings)
    }

    /// Persist the current settings to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content =
            serde_json::to_string_pretty(self).context("failed to serialise settings to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp settings to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp settings to {}", path.display()))?;

        info!(path = %path.display(), "settings saved (atomic)");
        Ok(())
    }

    /// Force the refresh interval into its allowed bounds.
    pub fn clamp_refresh(&mut self) {
        self.refresh_interval_secs = self
            .refresh_interval_secs
            .clamp(MIN_REFRESH_SECS, MAX_REFRESH_SECS);
    }
}
