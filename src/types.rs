// =============================================================================
// Shared types used across the MarketDeck dashboard
// =============================================================================
//
// `Range` and `Interval` are closed enums mirroring the lookback windows and
// bar widths the upstream quote API accepts. Keeping them as enums (rather
// than raw strings) means an invalid combination is rejected at the HTTP
// boundary instead of surfacing as an empty upstream response.
// =============================================================================

use serde::{Deserialize, Serialize};

// =============================================================================
// Range
// =============================================================================

/// Lookback window for a historical quote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Range {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "max")]
    Max,
}

impl Default for Range {
    fn default() -> Self {
        Self::OneMonth
    }
}

impl Range {
    /// The identifier the upstream API expects in the query string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::YearToDate => "ytd",
            Self::Max => "max",
        }
    }

    /// All ranges, in ascending lookback order (for UI selectors).
    pub fn all() -> &'static [Range] {
        &[
            Self::OneDay,
            Self::FiveDays,
            Self::OneMonth,
            Self::ThreeMonths,
            Self::SixMonths,
            Self::OneYear,
            Self::TwoYears,
            Self::FiveYears,
            Self::YearToDate,
            Self::Max,
        ]
    }

    /// Bar intervals the upstream supports for this range.
    ///
    /// Intraday intervals are only available for short lookbacks; requesting
    /// e.g. 1-minute bars over a year returns an upstream error, so the API
    /// layer validates against this table before fetching.
    pub fn valid_intervals(&self) -> &'static [Interval] {
        use Interval::*;
        match self {
            Self::OneDay => &[
                OneMinute,
                TwoMinutes,
                FiveMinutes,
                FifteenMinutes,
                ThirtyMinutes,
                SixtyMinutes,
                NinetyMinutes,
            ],
            Self::FiveDays => &[
                FiveMinutes,
                FifteenMinutes,
                ThirtyMinutes,
                SixtyMinutes,
                NinetyMinutes,
                OneDay,
            ],
            Self::OneMonth => &[ThirtyMinutes, SixtyMinutes, NinetyMinutes, OneDay, FiveDays, OneWeek],
            Self::ThreeMonths => &[SixtyMinutes, OneDay, FiveDays, OneWeek, OneMonth],
            Self::SixMonths | Self::OneYear | Self::TwoYears | Self::YearToDate => {
                &[OneDay, FiveDays, OneWeek, OneMonth]
            }
            Self::FiveYears | Self::Max => &[OneDay, FiveDays, OneWeek, OneMonth],
        }
    }

    /// The interval used when a request does not specify one.
    pub fn default_interval(&self) -> Interval {
        match self {
            Self::OneDay => Interval::FiveMinutes,
            Self::FiveDays => Interval::FifteenMinutes,
            _ => Interval::OneDay,
        }
    }

    /// Whether `interval` is an allowed bar width for this range.
    pub fn allows(&self, interval: Interval) -> bool {
        self.valid_intervals().contains(&interval)
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Interval
// =============================================================================

/// Bar width for a historical quote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "2m")]
    TwoMinutes,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "60m")]
    SixtyMinutes,
    #[serde(rename = "90m")]
    NinetyMinutes,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1wk")]
    OneWeek,
    #[serde(rename = "1mo")]
    OneMonth,
}

impl Default for Interval {
    fn default() -> Self {
        Self::OneDay
    }
}

impl Interval {
    /// The identifier the upstream API expects in the query string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::TwoMinutes => "2m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::SixtyMinutes => "60m",
            Self::NinetyMinutes => "90m",
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneWeek => "1wk",
            Self::OneMonth => "1mo",
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Theme
// =============================================================================

/// Display theme for the dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Default for Theme {
    fn default() -> Self {
        Self::Dark
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dark => write!(f, "dark"),
            Self::Light => write!(f, "light"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_serde_uses_upstream_identifiers() {
        assert_eq!(serde_json::to_string(&Range::OneMonth).unwrap(), "\"1mo\"");
        assert_eq!(serde_json::to_string(&Range::YearToDate).unwrap(), "\"ytd\"");
        let r: Range = serde_json::from_str("\"6mo\"").unwrap();
        assert_eq!(r, Range::SixMonths);
    }

    #[test]
    fn interval_serde_uses_upstream_identifiers() {
        assert_eq!(serde_json::to_string(&Interval::OneWeek).unwrap(), "\"1wk\"");
        let i: Interval = serde_json::from_str("\"15m\"").unwrap();
        assert_eq!(i, Interval::FifteenMinutes);
    }

    #[test]
    fn every_range_has_a_valid_default_interval() {
        for &range in Range::all() {
            assert!(
                range.allows(range.default_interval()),
                "default interval {} invalid for range {}",
                range.default_interval(),
                range
            );
        }
    }

    #[test]
    fn intraday_intervals_rejected_for_long_ranges() {
        assert!(!Range::OneYear.allows(Interval::OneMinute));
        assert!(!Range::Max.allows(Interval::FiveMinutes));
        assert!(Range::OneDay.allows(Interval::OneMinute));
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(Range::FiveYears.to_string(), "5y");
        assert_eq!(Interval::ThirtyMinutes.to_string(), "30m");
        assert_eq!(Theme::Dark.to_string(), "dark");
    }
}
