use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::holding::Quote;

/// Maximum number of points kept from a daily series.
pub const DAILY_SERIES_POINTS: usize = 30;

/// Requested depth of a daily series from the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SeriesSize {
    /// Last ~100 trading days
    #[default]
    Compact,
    /// Full history
    Full,
}

impl SeriesSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesSize::Compact => "compact",
            SeriesSize::Full => "full",
        }
    }
}

/// One trading day of a daily series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: u64,
}

/// Keep the most recent `DAILY_SERIES_POINTS` bars, ordered oldest-first.
pub fn latest_window(mut bars: Vec<DailyBar>) -> Vec<DailyBar> {
    bars.sort_by_key(|b| std::cmp::Reverse(b.date));
    bars.truncate(DAILY_SERIES_POINTS);
    bars.reverse();
    bars
}

/// Quote plus recent daily series for a single symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDetail {
    pub quote: Quote,
    pub series: Vec<DailyBar>,
}
