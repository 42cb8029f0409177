use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily rollup of aggregate portfolio state. Unique per `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub date: NaiveDate,
    pub total_value: f64,
    pub total_change: f64,
    pub change_percent: f64,
}

/// A single data point for portfolio chart rendering.
///
/// The core generates these; the frontend just renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,

    /// Total portfolio value on this date
    pub value: f64,

    /// Absolute change recorded with the snapshot (0 for series without one)
    pub change: f64,

    pub change_percent: f64,
}

impl From<PortfolioSnapshot> for ChartPoint {
    fn from(s: PortfolioSnapshot) -> Self {
        Self {
            date: s.date,
            value: s.total_value,
            change: s.total_change,
            change_percent: s.change_percent,
        }
    }
}
