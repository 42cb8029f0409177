use crate::metrics;
use crate::models::analytics::{
    Benchmark, BenchmarkComparison, MetricComparison, PerformanceMetrics, Recommendation,
    RecommendationKind, RiskReport, Sector,
};
use crate::models::holding::Holding;

/// Positions above this share of the portfolio are flagged for rebalancing.
pub const OVERWEIGHT_THRESHOLD_PCT: f64 = 30.0;

/// Rule-based portfolio analytics: sector risk, recommendations, and
/// comparison against market benchmarks.
///
/// Stateless apart from the sector map; all inputs come from the caller.
pub struct AnalyticsService {
    sectors: Vec<Sector>,
}

impl AnalyticsService {
    pub fn new(sectors: Vec<Sector>) -> Self {
        Self { sectors }
    }

    /// Total value and per-sector allocation of `holdings`.
    pub fn risk_report(&self, holdings: &[Holding]) -> RiskReport {
        RiskReport {
            total_value: metrics::compute_total_value(holdings),
            sector_allocation: metrics::compute_sector_allocation(holdings, &self.sectors),
        }
    }

    /// Suggestions for the current holdings.
    ///
    /// One warning per position above `OVERWEIGHT_THRESHOLD_PCT`, in holding
    /// order, followed by the two standing suggestions.
    pub fn recommendations(&self, holdings: &[Holding]) -> Vec<Recommendation> {
        let total_value = metrics::compute_total_value(holdings);

        let mut recommendations: Vec<Recommendation> = holdings
            .iter()
            .filter_map(|h| {
                let allocation = metrics::position_allocation_pct(h, total_value);
                (allocation > OVERWEIGHT_THRESHOLD_PCT).then(|| Recommendation {
                    kind: RecommendationKind::Warning,
                    title: "Overweight Position".into(),
                    description: format!(
                        "{} represents {allocation:.1}% of your portfolio. Consider rebalancing.",
                        h.symbol
                    ),
                    action: "Rebalance".into(),
                })
            })
            .collect();

        recommendations.push(Recommendation {
            kind: RecommendationKind::Success,
            title: "Diversification Opportunity".into(),
            description: "Consider adding international exposure or bonds to reduce risk.".into(),
            action: "Explore".into(),
        });
        recommendations.push(Recommendation {
            kind: RecommendationKind::Info,
            title: "Dollar-Cost Averaging".into(),
            description: "Set up automatic monthly investments to reduce timing risk.".into(),
            action: "Set Up".into(),
        });

        recommendations
    }

    /// Reference indices: annual return %, volatility %, Sharpe ratio.
    pub fn benchmarks() -> Vec<Benchmark> {
        [
            ("S&P 500", 12.5, 15.2, 0.82),
            ("NASDAQ", 15.8, 18.7, 0.85),
            ("Dow Jones", 10.2, 12.8, 0.80),
        ]
        .into_iter()
        .map(|(name, annual_return, risk, sharpe)| Benchmark {
            name: name.to_string(),
            metrics: PerformanceMetrics {
                annual_return,
                risk,
                sharpe,
            },
        })
        .collect()
    }

    pub fn find_benchmark(name: &str) -> Option<Benchmark> {
        Self::benchmarks()
            .into_iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
    }

    /// Portfolio metrics used for comparison until they are derived from history.
    pub fn default_user_metrics() -> PerformanceMetrics {
        PerformanceMetrics {
            annual_return: 14.2,
            risk: 16.5,
            sharpe: 0.86,
        }
    }

    /// Row-by-row comparison. Higher return, lower risk and higher Sharpe are favorable.
    pub fn compare_to_benchmark(user: &PerformanceMetrics, benchmark: &Benchmark) -> BenchmarkComparison {
        let b = &benchmark.metrics;
        BenchmarkComparison {
            benchmark: benchmark.name.clone(),
            rows: vec![
                MetricComparison {
                    label: "Annual Return".into(),
                    user_value: format!("{}%", user.annual_return),
                    benchmark_value: format!("{}%", b.annual_return),
                    is_favorable: user.annual_return > b.annual_return,
                },
                MetricComparison {
                    label: "Risk (Volatility)".into(),
                    user_value: format!("{}%", user.risk),
                    benchmark_value: format!("{}%", b.risk),
                    is_favorable: user.risk < b.risk,
                },
                MetricComparison {
                    label: "Sharpe Ratio".into(),
                    user_value: format!("{:.2}", user.sharpe),
                    benchmark_value: format!("{:.2}", b.sharpe),
                    is_favorable: user.sharpe > b.sharpe,
                },
            ],
        }
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new(crate::models::settings::Settings::default().sectors)
    }
}
