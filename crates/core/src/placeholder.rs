//! Built-in data shown when neither the store nor the quote source can
//! provide anything, so a screen never renders empty.

use chrono::NaiveDate;

use crate::models::holding::{Holding, Quote};
use crate::models::snapshot::ChartPoint;

/// Mock quotes with the share counts used by the placeholder portfolio.
const PLACEHOLDER_STOCKS: &[(&str, f64, f64, &str, u64, u32)] = &[
    ("AAPL", 275.43, 2.15, "1.24", 52_840_000, 10),
    ("GOOGL", 287.52, -15.23, "-0.53", 1_240_000, 5),
    ("MSFT", 350.18, -4.68, "-1.03", 16_883_509, 15),
    ("TSLA", 248.50, 8.75, "3.65", 45_200_000, 8),
    ("AMZN", 286.75, 1.25, "0.67", 28_500_000, 12),
];

const PLACEHOLDER_QUOTE_DATE: &str = "2025-05-26";

const PLACEHOLDER_CHART: &[((i32, u32, u32), f64)] = &[
    ((2025, 5, 20), 14_500.0),
    ((2025, 5, 21), 14_750.0),
    ((2025, 5, 22), 14_400.0),
    ((2025, 5, 23), 14_900.0),
    ((2025, 5, 24), 14_800.0),
    ((2025, 5, 25), 14_850.0),
    ((2025, 5, 26), 14_873.60),
];

/// Mock quotes, without share counts.
pub fn placeholder_quotes() -> Vec<Quote> {
    PLACEHOLDER_STOCKS
        .iter()
        .map(|&(symbol, price, change, pct, volume, _)| {
            Quote::new(symbol, price, change, pct, volume, PLACEHOLDER_QUOTE_DATE)
        })
        .collect()
}

/// Placeholder portfolio: mock quotes with their share counts.
pub fn placeholder_holdings() -> Vec<Holding> {
    PLACEHOLDER_STOCKS
        .iter()
        .zip(placeholder_quotes())
        .map(|(&(.., shares), quote)| Holding::from_quote(quote, Some(shares)))
        .collect()
}

/// One week of placeholder portfolio values, oldest first.
pub fn placeholder_chart() -> Vec<ChartPoint> {
    PLACEHOLDER_CHART
        .iter()
        .filter_map(|&((y, m, d), value)| {
            Some(ChartPoint {
                date: NaiveDate::from_ymd_opt(y, m, d)?,
                value,
                change: 0.0,
                change_percent: 0.0,
            })
        })
        .collect()
}
