// ═══════════════════════════════════════════════════════════════════
// Service Tests: QuoteService, RefreshService, AnalyticsService,
// GoalService
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use portfolio_tracker_core::clock::FixedClock;
use portfolio_tracker_core::errors::CoreError;
use portfolio_tracker_core::models::analytics::{PerformanceMetrics, RecommendationKind};
use portfolio_tracker_core::models::holding::{Holding, Quote};
use portfolio_tracker_core::models::series::{DailyBar, SeriesSize};
use portfolio_tracker_core::models::settings::{Settings, WatchEntry};
use portfolio_tracker_core::placeholder;
use portfolio_tracker_core::providers::registry::QuoteSourceRegistry;
use portfolio_tracker_core::providers::static_source::StaticQuoteSource;
use portfolio_tracker_core::providers::traits::QuoteSource;
use portfolio_tracker_core::services::analytics_service::AnalyticsService;
use portfolio_tracker_core::services::goal_service::{self, GoalService};
use portfolio_tracker_core::services::quote_service::QuoteService;
use portfolio_tracker_core::services::refresh_service::RefreshService;
use portfolio_tracker_core::storage::store::PortfolioStore;

// ═══════════════════════════════════════════════════════════════════
// Mock Sources
// ═══════════════════════════════════════════════════════════════════

/// A source that always fails (for testing fallback behavior).
struct FailingSource;

#[async_trait]
impl QuoteSource for FailingSource {
    fn name(&self) -> &str {
        "FailingMock"
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, CoreError> {
        Err(CoreError::Api {
            provider: "FailingMock".into(),
            message: format!("Simulated failure {symbol}"),
        })
    }

    async fn get_daily_series(&self, symbol: &str, _size: SeriesSize) -> Result<Vec<DailyBar>, CoreError> {
        Err(CoreError::Api {
            provider: "FailingMock".into(),
            message: format!("Simulated failure {symbol}"),
        })
    }
}

/// Answers every request with an exhausted-quota notice.
struct RateLimitedSource;

#[async_trait]
impl QuoteSource for RateLimitedSource {
    fn name(&self) -> &str {
        "RateLimitedMock"
    }

    async fn get_quote(&self, _symbol: &str) -> Result<Quote, CoreError> {
        Err(CoreError::RateLimited {
            provider: "RateLimitedMock".into(),
            message: "Daily request limit reached".into(),
        })
    }

    async fn get_daily_series(&self, _symbol: &str, _size: SeriesSize) -> Result<Vec<DailyBar>, CoreError> {
        Err(CoreError::RateLimited {
            provider: "RateLimitedMock".into(),
            message: "Daily request limit reached".into(),
        })
    }
}

/// Serves one fixed price for any symbol and counts calls.
struct CountingSource {
    price: f64,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl QuoteSource for CountingSource {
    fn name(&self) -> &str {
        "CountingMock"
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Quote::new(symbol, self.price, 1.0, "0.50", 100, "2025-05-23"))
    }

    async fn get_daily_series(&self, _symbol: &str, _size: SeriesSize) -> Result<Vec<DailyBar>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

/// Answers the first request, then cancels the cycle it belongs to.
struct CancellingSource {
    token: CancellationToken,
}

#[async_trait]
impl QuoteSource for CancellingSource {
    fn name(&self) -> &str {
        "CancellingMock"
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, CoreError> {
        self.token.cancel();
        Ok(Quote::new(symbol, 10.0, 0.0, "0", 1, "2025-05-23"))
    }

    async fn get_daily_series(&self, _symbol: &str, _size: SeriesSize) -> Result<Vec<DailyBar>, CoreError> {
        self.token.cancel();
        Ok(Vec::new())
    }
}

/// Only knows some symbols.
struct PartialSource;

#[async_trait]
impl QuoteSource for PartialSource {
    fn name(&self) -> &str {
        "PartialMock"
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, CoreError> {
        match symbol {
            "AAPL" => Ok(Quote::new("AAPL", 200.0, 2.0, "1.01", 10, "2025-05-23")),
            "NAN" => Ok(Quote::new("NAN", f64::NAN, 0.0, "0", 0, "2025-05-23")),
            _ => Err(CoreError::Network(format!("timeout for {symbol}"))),
        }
    }

    async fn get_daily_series(&self, symbol: &str, _size: SeriesSize) -> Result<Vec<DailyBar>, CoreError> {
        Err(CoreError::Network(format!("timeout for {symbol}")))
    }
}

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fast_settings() -> Settings {
    Settings {
        inter_request_delay_ms: 0,
        warmup_delay_ms: 0,
        ..Settings::default()
    }
}

fn boxed<S: QuoteSource + 'static>(source: S) -> Box<dyn QuoteSource> {
    Box::new(source)
}

fn registry_of(sources: Vec<Box<dyn QuoteSource>>) -> QuoteSourceRegistry {
    let mut registry = QuoteSourceRegistry::new();
    for source in sources {
        registry.register(source);
    }
    registry
}

struct Harness {
    store: Arc<PortfolioStore>,
    refresh: RefreshService,
}

fn harness_with(settings: Settings, sources: Vec<Box<dyn QuoteSource>>) -> Harness {
    let clock = Arc::new(FixedClock::at_date(make_date(2025, 5, 26)));
    let store = Arc::new(PortfolioStore::in_memory(clock.clone()));
    let quotes = Arc::new(QuoteService::new(registry_of(sources), settings.inter_request_delay()));
    let refresh = RefreshService::new(store.clone(), quotes, &settings, clock);
    Harness { store, refresh }
}

fn harness(sources: Vec<Box<dyn QuoteSource>>) -> Harness {
    harness_with(fast_settings(), sources)
}

fn bars(closes: &[(u32, f64)]) -> Vec<DailyBar> {
    closes
        .iter()
        .map(|&(day, close)| DailyBar {
            date: make_date(2025, 5, day),
            close,
            volume: 0,
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════
// QuoteService
// ═══════════════════════════════════════════════════════════════════

mod quote_service {
    use super::*;

    #[tokio::test]
    async fn falls_back_to_next_source() {
        let service = QuoteService::new(
            registry_of(vec![boxed(FailingSource), boxed(StaticQuoteSource::with_defaults())]),
            Duration::ZERO,
        );
        let quote = service.get_quote("MSFT").await.unwrap();
        assert_eq!(quote.price, 350.18);
    }

    #[tokio::test]
    async fn non_finite_price_rejected() {
        let service = QuoteService::new(registry_of(vec![boxed(PartialSource)]), Duration::ZERO);
        let err = service.get_quote("NAN").await.unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));
    }

    #[tokio::test]
    async fn no_sources_is_an_error() {
        let service = QuoteService::new(QuoteSourceRegistry::new(), Duration::ZERO);
        assert!(service.get_quote("AAPL").await.is_err());
    }

    #[tokio::test]
    async fn batch_skips_failed_symbols() {
        let service = QuoteService::new(registry_of(vec![boxed(PartialSource)]), Duration::ZERO);
        let symbols = vec!["MSFT".to_string(), "AAPL".to_string(), "TSLA".to_string()];
        let quotes = service
            .fetch_quotes(&symbols, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].symbol, "AAPL");
    }

    #[tokio::test]
    async fn batch_fails_only_when_all_fail() {
        let service = QuoteService::new(registry_of(vec![boxed(FailingSource)]), Duration::ZERO);
        let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
        let err = service
            .fetch_quotes(&symbols, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NoQuoteData(_)));
        assert!(err.to_string().starts_with("Failed to fetch any stock data"));
    }

    #[tokio::test]
    async fn cancelled_batch_stops_between_requests() {
        let token = CancellationToken::new();
        let service = QuoteService::new(
            registry_of(vec![boxed(CancellingSource { token: token.clone() })]),
            Duration::from_secs(3600),
        );
        let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
        let err = service.fetch_quotes(&symbols, &token).await.unwrap_err();
        assert!(matches!(err, CoreError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_between_requests_not_after_last() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = QuoteService::new(
            registry_of(vec![boxed(CountingSource {
                price: 1.0,
                calls: calls.clone(),
            })]),
            Duration::from_secs(1),
        );
        let symbols: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();

        let started = tokio::time::Instant::now();
        service
            .fetch_quotes(&symbols, &CancellationToken::new())
            .await
            .unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(2) && elapsed < Duration::from_secs(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn series_batch_keeps_symbol_order() {
        let source = StaticQuoteSource::with_defaults()
            .with_series("AAPL", bars(&[(20, 1.0)]))
            .with_series("MSFT", bars(&[(20, 2.0)]));
        let service = QuoteService::new(registry_of(vec![boxed(source)]), Duration::ZERO);
        let symbols = vec!["MSFT".to_string(), "TSLA".to_string(), "AAPL".to_string()];

        let series = service
            .fetch_series(&symbols, SeriesSize::Compact, &CancellationToken::new())
            .await
            .unwrap();
        let order: Vec<&str> = series.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(order, vec!["MSFT", "AAPL"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// RefreshService
// ═══════════════════════════════════════════════════════════════════

mod refresh_cycle {
    use super::*;

    #[tokio::test]
    async fn persists_holdings_and_todays_snapshot() {
        let h = harness(vec![boxed(StaticQuoteSource::with_defaults())]);
        let view = h.refresh.refresh(&CancellationToken::new()).await.unwrap();

        assert!(view.error.is_none());
        assert_eq!(view.holdings.len(), 5);
        assert_eq!(h.store.list_holdings().await.len(), 5);

        let history = h.store.list_snapshots(30).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].date, make_date(2025, 5, 26));
        assert!((history[0].total_value - view.summary.total_value).abs() < 1e-9);
        assert_eq!(view.chart.len(), 1);
    }

    #[tokio::test]
    async fn watch_list_default_shares_applied() {
        let h = harness(vec![boxed(StaticQuoteSource::with_defaults())]);
        let view = h.refresh.refresh(&CancellationToken::new()).await.unwrap();
        let shares: Vec<(String, Option<u32>)> =
            view.holdings.iter().map(|h| (h.symbol.clone(), h.shares)).collect();
        assert_eq!(
            shares,
            vec![
                ("AAPL".to_string(), Some(10)),
                ("GOOGL".to_string(), Some(5)),
                ("MSFT".to_string(), Some(15)),
                ("TSLA".to_string(), Some(8)),
                ("AMZN".to_string(), Some(12)),
            ]
        );
    }

    #[tokio::test]
    async fn stored_shares_survive_refresh() {
        let h = harness(vec![boxed(StaticQuoteSource::with_defaults())]);
        h.refresh.refresh(&CancellationToken::new()).await.unwrap();
        h.store.update_holding_shares("AAPL", 42).await.unwrap();

        let view = h.refresh.refresh(&CancellationToken::new()).await.unwrap();
        let aapl = view.holdings.iter().find(|h| h.symbol == "AAPL").unwrap();
        assert_eq!(aapl.shares, Some(42));
    }

    #[tokio::test]
    async fn upstream_failure_uses_placeholder_and_reports_error() {
        let h = harness(vec![boxed(FailingSource)]);
        let view = h.refresh.refresh(&CancellationToken::new()).await.unwrap();

        let error = view.error.clone().unwrap();
        assert!(error.contains("Failed to fetch any stock data"));
        let symbols: Vec<&str> = view.holdings.iter().map(|h| h.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "GOOGL", "MSFT", "TSLA", "AMZN"]);

        // the placeholder set is still reconciled
        assert_eq!(h.store.list_holdings().await.len(), 5);
        assert_eq!(h.store.list_snapshots(30).await.len(), 1);
    }

    #[tokio::test]
    async fn rate_limited_for_every_symbol_falls_back_to_placeholder() {
        let h = harness(vec![boxed(RateLimitedSource)]);
        let view = h.refresh.refresh(&CancellationToken::new()).await.unwrap();

        let error = view.error.clone().unwrap();
        assert!(!error.is_empty());
        assert!(error.contains("Rate limited (RateLimitedMock)"));
        let expected: Vec<(String, f64, Option<u32>)> = placeholder::placeholder_holdings()
            .into_iter()
            .map(|h| (h.symbol, h.price, h.shares))
            .collect();
        let shown: Vec<(String, f64, Option<u32>)> = view
            .holdings
            .iter()
            .map(|h| (h.symbol.clone(), h.price, h.shares))
            .collect();
        assert_eq!(shown, expected);

        let stored: Vec<String> = h.store.list_holdings().await.into_iter().map(|h| h.symbol).collect();
        assert_eq!(stored, vec!["AAPL", "AMZN", "GOOGL", "MSFT", "TSLA"]);
        assert_eq!(h.store.list_snapshots(30).await.len(), 1);
    }

    #[tokio::test]
    async fn partial_failure_keeps_successful_quotes() {
        let h = harness(vec![boxed(PartialSource)]);
        let view = h.refresh.refresh(&CancellationToken::new()).await.unwrap();

        assert!(view.error.is_none());
        assert_eq!(view.holdings.len(), 1);
        assert_eq!(view.holdings[0].symbol, "AAPL");
        assert_eq!(view.summary.total_value, 2_000.0);
    }

    #[tokio::test]
    async fn cancelled_before_start_writes_nothing() {
        let h = harness(vec![boxed(StaticQuoteSource::with_defaults())]);
        let token = CancellationToken::new();
        token.cancel();

        let err = h.refresh.refresh(&token).await.unwrap_err();
        assert!(matches!(err, CoreError::Cancelled));
        assert!(h.store.list_holdings().await.is_empty());
        assert!(h.store.list_snapshots(30).await.is_empty());
    }

    #[tokio::test]
    async fn cancelled_mid_fetch_writes_nothing() {
        let token = CancellationToken::new();
        let settings = Settings {
            inter_request_delay_ms: 60_000,
            ..fast_settings()
        };
        let h = harness_with(settings, vec![boxed(CancellingSource { token: token.clone() })]);

        let err = h.refresh.refresh(&token).await.unwrap_err();
        assert!(matches!(err, CoreError::Cancelled));
        assert!(h.store.list_holdings().await.is_empty());
    }

    #[tokio::test]
    async fn startup_can_be_cancelled_during_warmup() {
        let settings = Settings {
            warmup_delay_ms: 60_000,
            ..fast_settings()
        };
        let h = harness_with(settings, vec![boxed(StaticQuoteSource::with_defaults())]);
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let err = h.refresh.startup(&token).await.unwrap_err();
        assert!(matches!(err, CoreError::Cancelled));
        assert!(h.store.list_snapshots(30).await.is_empty());
    }

    #[tokio::test]
    async fn reconcile_failure_shows_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(FixedClock::at_date(make_date(2025, 5, 26)));
        let store = Arc::new(PortfolioStore::open(dir.path(), clock.clone()));
        let settings = fast_settings();
        let quotes = Arc::new(QuoteService::new(
            registry_of(vec![boxed(StaticQuoteSource::with_defaults())]),
            Duration::ZERO,
        ));
        let refresh = RefreshService::new(store, quotes, &settings, clock);

        let view = refresh.refresh(&CancellationToken::new()).await.unwrap();
        assert!(view.has_error());
        let expected: Vec<(String, f64, Option<u32>)> = placeholder::placeholder_holdings()
            .into_iter()
            .map(|h| (h.symbol, h.price, h.shares))
            .collect();
        let shown: Vec<(String, f64, Option<u32>)> = view
            .holdings
            .iter()
            .map(|h| (h.symbol.clone(), h.price, h.shares))
            .collect();
        assert_eq!(shown, expected);
        assert_eq!(view.chart, placeholder::placeholder_chart());
    }
}

mod load_and_reload {
    use super::*;

    #[tokio::test]
    async fn empty_store_shows_placeholder_chart() {
        let h = harness(vec![boxed(StaticQuoteSource::with_defaults())]);
        let loaded = h.refresh.load().await;
        assert!(loaded.holdings.is_empty());
        assert!(!loaded.used_placeholder);
        assert_eq!(loaded.chart, placeholder::placeholder_chart());
    }

    #[tokio::test]
    async fn edit_shares_reloads_without_fetching() {
        let calls = Arc::new(AtomicUsize::new(0));
        let h = harness(vec![boxed(CountingSource {
            price: 100.0,
            calls: calls.clone(),
        })]);
        h.refresh.refresh(&CancellationToken::new()).await.unwrap();
        let after_refresh = calls.load(Ordering::SeqCst);

        let view = h.refresh.edit_shares("TSLA", 3).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), after_refresh);

        let tsla = view.holdings.iter().find(|h| h.symbol == "TSLA").unwrap();
        assert_eq!(tsla.shares, Some(3));
        // store order is by symbol
        assert_eq!(view.holdings[0].symbol, "AAPL");
        assert_eq!(view.holdings[1].symbol, "AMZN");
    }
}

mod market_data {
    use super::*;

    #[tokio::test]
    async fn symbol_detail_combines_quote_and_series() {
        let source = StaticQuoteSource::with_defaults().with_series("AAPL", bars(&[(21, 270.0), (22, 272.5)]));
        let h = harness(vec![boxed(source)]);

        let detail = h.refresh.symbol_detail("AAPL").await.unwrap();
        assert_eq!(detail.quote.symbol, "AAPL");
        assert_eq!(detail.series.len(), 2);
        assert_eq!(detail.series[1].close, 272.5);
    }

    #[tokio::test]
    async fn symbol_detail_fails_without_series() {
        let h = harness(vec![boxed(StaticQuoteSource::with_defaults())]);
        assert!(h.refresh.symbol_detail("AAPL").await.is_err());
    }

    #[tokio::test]
    async fn portfolio_history_from_daily_closes() {
        let settings = Settings {
            watch_list: vec![WatchEntry::new("AAPL", 10), WatchEntry::new("MSFT", 2)],
            ..fast_settings()
        };
        let source = StaticQuoteSource::with_defaults()
            .with_series("AAPL", bars(&[(20, 100.0), (21, 110.0), (22, 120.0)]))
            .with_series("MSFT", bars(&[(21, 300.0), (22, 310.0)]));
        let h = harness_with(settings, vec![boxed(source)]);

        let points = h
            .refresh
            .portfolio_history(&CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, make_date(2025, 5, 21));
        assert_eq!(points[0].value, 1_700.0);
        assert_eq!(points[1].value, 1_820.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// AnalyticsService
// ═══════════════════════════════════════════════════════════════════

mod analytics {
    use super::*;

    #[test]
    fn risk_report_for_placeholder_portfolio() {
        let service = AnalyticsService::default();
        let report = service.risk_report(&placeholder::placeholder_holdings());

        assert!((report.total_value - 14_873.6).abs() < 1e-6);
        let pcts: Vec<&str> = report
            .sector_allocation
            .iter()
            .map(|a| a.percentage.as_str())
            .collect();
        assert_eq!(pcts, vec!["63.5", "13.4", "23.1"]);
    }

    #[test]
    fn overweight_positions_are_flagged() {
        let service = AnalyticsService::default();
        let recs = service.recommendations(&placeholder::placeholder_holdings());

        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].kind, RecommendationKind::Warning);
        assert_eq!(
            recs[0].description,
            "MSFT represents 35.3% of your portfolio. Consider rebalancing."
        );
        assert_eq!(recs[1].kind, RecommendationKind::Success);
        assert_eq!(recs[2].kind, RecommendationKind::Info);
    }

    #[test]
    fn balanced_portfolio_gets_standing_suggestions_only() {
        let holdings: Vec<Holding> = ["AAPL", "GOOGL", "MSFT", "TSLA"]
            .iter()
            .map(|s| Holding::from_quote(Quote::new(*s, 100.0, 0.0, "0", 0, "2025-05-26"), Some(1)))
            .collect();
        let recs = AnalyticsService::default().recommendations(&holdings);
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r.kind != RecommendationKind::Warning));
    }

    #[test]
    fn empty_portfolio_has_no_warnings() {
        let recs = AnalyticsService::default().recommendations(&[]);
        assert_eq!(recs.len(), 2);
    }

    #[test]
    fn benchmark_lookup_is_case_insensitive() {
        assert_eq!(AnalyticsService::benchmarks().len(), 3);
        assert!(AnalyticsService::find_benchmark("nasdaq").is_some());
        assert!(AnalyticsService::find_benchmark("FTSE").is_none());
    }

    #[test]
    fn comparison_favorability() {
        let user = PerformanceMetrics {
            annual_return: 14.2,
            risk: 16.5,
            sharpe: 0.86,
        };
        let nasdaq = AnalyticsService::find_benchmark("NASDAQ").unwrap();
        let cmp = AnalyticsService::compare_to_benchmark(&user, &nasdaq);

        assert_eq!(cmp.benchmark, "NASDAQ");
        let favorable: Vec<bool> = cmp.rows.iter().map(|r| r.is_favorable).collect();
        assert_eq!(favorable, vec![false, true, true]);
        assert_eq!(cmp.rows[0].user_value, "14.2%");
        assert_eq!(cmp.rows[0].benchmark_value, "15.8%");
        assert_eq!(cmp.rows[2].user_value, "0.86");
    }
}

// ═══════════════════════════════════════════════════════════════════
// GoalService
// ═══════════════════════════════════════════════════════════════════

mod goals {
    use super::*;

    fn service() -> GoalService {
        let clock = Arc::new(FixedClock::at_date(make_date(2025, 5, 26)));
        GoalService::new(Arc::new(PortfolioStore::in_memory(clock)))
    }

    #[tokio::test]
    async fn add_goal_starts_at_zero() {
        let goals = service();
        let id = goals.add_goal("  New Car ", "20000", "2027-03-01").await.unwrap();
        let goal = goals.list().await.into_iter().find(|g| g.id == id).unwrap();
        assert_eq!(goal.name, "New Car");
        assert_eq!(goal.current, 0.0);
        assert_eq!(goal.target, 20_000.0);
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_store() {
        let goals = service();
        for (name, target, deadline) in [
            ("", "100", "2026-01-01"),
            ("Car", "", "2026-01-01"),
            ("Car", "100", " "),
            ("Car", "lots", "2026-01-01"),
            ("Car", "-5", "2026-01-01"),
            ("Car", "0", "2026-01-01"),
            ("Car", "inf", "2026-01-01"),
        ] {
            let err = goals.add_goal(name, target, deadline).await.unwrap_err();
            assert!(matches!(err, CoreError::ValidationError(_)), "{name}/{target}/{deadline}");
        }
        assert_eq!(goals.list().await.len(), 3);
    }

    #[tokio::test]
    async fn update_progress_parses_amount() {
        let goals = service();
        let id = goals.list().await[0].id;

        assert_eq!(goals.update_progress(id, "40000.50").await.unwrap(), 1);
        assert!(goals.update_progress(id, "forty").await.is_err());
        assert_eq!(goals.update_progress(-1, "10").await.unwrap(), 0);

        let goal = goals.list().await.into_iter().find(|g| g.id == id).unwrap();
        assert_eq!(goal.current, 40_000.5);
    }

    #[test]
    fn empty_fields_message() {
        let err = goal_service::parse_new_goal("", "", "").unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: Please fill all fields");
    }

    #[test]
    fn share_counts_are_whole_non_negative_numbers() {
        assert_eq!(goal_service::parse_shares(" 12 ").unwrap(), 12);
        assert_eq!(goal_service::parse_shares("0").unwrap(), 0);
        assert!(goal_service::parse_shares("-1").is_err());
        assert!(goal_service::parse_shares("2.5").is_err());
        assert!(goal_service::parse_shares("ten").is_err());
    }
}
