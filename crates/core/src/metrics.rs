//! Pure valuation formulas over a list of holdings.
//!
//! The store's summary query and the refresh view both go through these
//! functions so the numbers agree everywhere.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::analytics::{PortfolioSummary, Sector, SectorAllocation};
use crate::models::holding::Holding;
use crate::models::series::DailyBar;
use crate::models::snapshot::ChartPoint;

/// Sum of `price * shares`. Zero for an empty list.
pub fn compute_total_value(holdings: &[Holding]) -> f64 {
    holdings.iter().map(Holding::position_value).sum()
}

/// Sum of `change * shares`. Zero for an empty list.
pub fn compute_total_change(holdings: &[Holding]) -> f64 {
    holdings.iter().map(Holding::position_change).sum()
}

/// Percent change relative to the prior total (`total_value - total_change`).
///
/// Only a zero `total_value` is guarded. When `total_value == total_change`
/// the denominator is zero and the result is infinite.
pub fn compute_change_percent(total_value: f64, total_change: f64) -> f64 {
    if total_value == 0.0 {
        return 0.0;
    }
    (total_change / (total_value - total_change)) * 100.0
}

/// Value, change, percent change and count in one pass over `holdings`.
pub fn summarize(holdings: &[Holding]) -> PortfolioSummary {
    let total_value = compute_total_value(holdings);
    let total_change = compute_total_change(holdings);
    PortfolioSummary {
        total_value,
        total_change,
        change_percent: compute_change_percent(total_value, total_change),
        holding_count: holdings.len(),
    }
}

/// Share of the portfolio value held in each sector, as one-decimal strings.
///
/// Sectors keep their configured order. An empty or zero-valued portfolio
/// reports `"0.0"` for every sector.
pub fn compute_sector_allocation(holdings: &[Holding], sectors: &[Sector]) -> Vec<SectorAllocation> {
    let total_value = compute_total_value(holdings);

    sectors
        .iter()
        .map(|sector| {
            let sector_value: f64 = holdings
                .iter()
                .filter(|h| sector.contains(&h.symbol))
                .map(Holding::position_value)
                .sum();
            let pct = if total_value == 0.0 {
                0.0
            } else {
                (sector_value / total_value) * 100.0
            };
            SectorAllocation {
                sector: sector.name.clone(),
                percentage: format!("{pct:.1}"),
            }
        })
        .collect()
}

/// Share of the portfolio value held in one position, in percent.
/// Zero when the portfolio has no value.
pub fn position_allocation_pct(holding: &Holding, total_value: f64) -> f64 {
    if total_value == 0.0 {
        return 0.0;
    }
    (holding.position_value() / total_value) * 100.0
}

/// Combine per-symbol daily closes into a portfolio value series:
/// `value = sum(close * shares)` on every date present in all series.
/// Oldest first.
pub fn portfolio_value_series(positions: &[(u32, &[DailyBar])]) -> Vec<ChartPoint> {
    if positions.is_empty() {
        return Vec::new();
    }

    let mut by_date: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for (shares, bars) in positions {
        for bar in bars.iter() {
            let entry = by_date.entry(bar.date).or_insert((0.0, 0));
            entry.0 += bar.close * f64::from(*shares);
            entry.1 += 1;
        }
    }

    by_date
        .into_iter()
        .filter(|(_, (_, seen))| *seen == positions.len())
        .map(|(date, (value, _))| ChartPoint {
            date,
            value,
            change: 0.0,
            change_percent: 0.0,
        })
        .collect()
}
