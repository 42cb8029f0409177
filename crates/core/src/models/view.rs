use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::analytics::PortfolioSummary;
use super::holding::Holding;
use super::snapshot::ChartPoint;

/// Everything a screen needs after a refresh cycle or a reload.
///
/// Always populated: on failure paths it carries placeholder or stale data
/// together with `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioView {
    /// Identifier of the refresh cycle (or reload) that produced this view
    pub cycle_id: Uuid,

    pub holdings: Vec<Holding>,

    /// Chronological chart series (oldest first)
    pub chart: Vec<ChartPoint>,

    /// Valuation of `holdings`
    pub summary: PortfolioSummary,

    /// User-visible message for a degraded cycle
    pub error: Option<String>,
}

impl PortfolioView {
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}
