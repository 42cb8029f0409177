use serde::{Deserialize, Serialize};

/// Aggregate valuation of the stored holdings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Sum of `price * shares`
    pub total_value: f64,

    /// Sum of `change * shares`
    pub total_change: f64,

    /// `total_change / (total_value - total_change) * 100`, or 0 for an empty portfolio
    pub change_percent: f64,

    /// Number of holdings the summary was computed from
    pub holding_count: usize,
}

/// A named group of symbols used for sector allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    pub name: String,
    pub symbols: Vec<String>,
}

impl Sector {
    pub fn new(name: impl Into<String>, symbols: &[&str]) -> Self {
        Self {
            name: name.into(),
            symbols: symbols.iter().map(|s| s.to_uppercase()).collect(),
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s.eq_ignore_ascii_case(symbol))
    }
}

/// Share of the portfolio value held in one sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorAllocation {
    pub sector: String,

    /// One-decimal percentage string without `%` (e.g., "34.4")
    pub percentage: String,
}

/// Sector breakdown of the current holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub total_value: f64,
    pub sector_allocation: Vec<SectorAllocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationKind {
    Warning,
    Success,
    Info,
}

/// A rule-based suggestion derived from the holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    pub action: String,
}

/// Annualized return, volatility and Sharpe ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub annual_return: f64,
    pub risk: f64,
    pub sharpe: f64,
}

/// Reference metrics of a market index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub name: String,
    pub metrics: PerformanceMetrics,
}

/// One row of a portfolio-vs-benchmark comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub label: String,
    pub user_value: String,
    pub benchmark_value: String,

    /// True when the user's figure beats the benchmark for this metric
    pub is_favorable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub benchmark: String,
    pub rows: Vec<MetricComparison>,
}
