pub mod clock;
pub mod errors;
pub mod format;
pub mod metrics;
pub mod models;
pub mod placeholder;
pub mod providers;
pub mod services;
pub mod storage;

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use clock::{Clock, SystemClock};
use errors::CoreError;
use models::{
    analytics::{Benchmark, BenchmarkComparison, PortfolioSummary, Recommendation, RiskReport},
    goal::FinancialGoal,
    holding::Holding,
    series::SymbolDetail,
    settings::Settings,
    snapshot::{ChartPoint, PortfolioSnapshot},
    view::PortfolioView,
};
use providers::registry::QuoteSourceRegistry;
use services::{
    analytics_service::AnalyticsService,
    goal_service::{self, GoalService},
    quote_service::QuoteService,
    refresh_service::RefreshService,
};
use storage::store::PortfolioStore;

/// Main entry point for the Portfolio Tracker core library.
///
/// Owns the store and all services, and exposes the user-facing commands:
/// refresh-now, edit-shares, add-goal and update-goal-progress. Raw user
/// input is validated here; invalid input never reaches the store.
#[must_use]
pub struct PortfolioTracker {
    settings: Settings,
    store: Arc<PortfolioStore>,
    quote_service: Arc<QuoteService>,
    refresh_service: RefreshService,
    goal_service: GoalService,
    analytics_service: AnalyticsService,
    /// Parent of every cycle's cancellation token.
    shutdown: CancellationToken,
}

impl std::fmt::Debug for PortfolioTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioTracker")
            .field("store", &self.store)
            .field("quote_sources", &self.quote_service.source_names())
            .field("watch_list", &self.settings.watch_list.len())
            .field("shut_down", &self.shutdown.is_cancelled())
            .finish()
    }
}

impl PortfolioTracker {
    /// Build a tracker from settings: file-backed store at
    /// `settings.database_path`, quote sources per `settings.quote_sources`.
    pub fn from_settings(settings: Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store = Arc::new(PortfolioStore::open(&settings.database_path, clock.clone()));
        let registry = QuoteSourceRegistry::from_settings(&settings);
        Ok(Self::with_parts(settings, store, registry, clock))
    }

    /// Build a tracker from explicit parts (custom sources, in-memory store, fixed clock).
    pub fn with_parts(
        settings: Settings,
        store: Arc<PortfolioStore>,
        registry: QuoteSourceRegistry,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let quote_service = Arc::new(QuoteService::new(registry, settings.inter_request_delay()));
        let refresh_service =
            RefreshService::new(store.clone(), quote_service.clone(), &settings, clock);
        let goal_service = GoalService::new(store.clone());
        let analytics_service = AnalyticsService::new(settings.sectors.clone());

        Self {
            settings,
            store,
            quote_service,
            refresh_service,
            goal_service,
            analytics_service,
            shutdown: CancellationToken::new(),
        }
    }

    /// Open the database, create the schema, seed default goals.
    /// Optional: every operation initializes on first use.
    pub async fn initialize(&self) -> Result<(), CoreError> {
        self.store.initialize().await
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn store(&self) -> &Arc<PortfolioStore> {
        &self.store
    }

    // ── Cancellation ────────────────────────────────────────────────

    /// A token for one cycle. Cancelling it stops only that cycle;
    /// `shutdown()` cancels every token handed out.
    #[must_use]
    pub fn cycle_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    /// Cancel all in-flight and future cycles started through this tracker.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    // ── Refresh ─────────────────────────────────────────────────────

    /// Startup cycle: warm-up delay, then a full refresh.
    pub async fn startup(&self) -> Result<PortfolioView, CoreError> {
        self.startup_with(&self.cycle_token()).await
    }

    /// Startup cycle under a caller-owned token.
    pub async fn startup_with(&self, cancel: &CancellationToken) -> Result<PortfolioView, CoreError> {
        self.refresh_service.startup(cancel).await
    }

    /// Full refresh cycle (Load → Fetch → Reconcile).
    pub async fn refresh_now(&self) -> Result<PortfolioView, CoreError> {
        self.refresh_with(&self.cycle_token()).await
    }

    /// Full refresh cycle under a caller-owned token.
    pub async fn refresh_with(&self, cancel: &CancellationToken) -> Result<PortfolioView, CoreError> {
        self.refresh_service.refresh(cancel).await
    }

    /// Current view from the store only.
    pub async fn reload(&self) -> PortfolioView {
        self.refresh_service.reload().await
    }

    // ── Commands ────────────────────────────────────────────────────

    /// Set the shares held for `symbol` from raw input, then reload from the
    /// store. Does not contact the quote source.
    pub async fn edit_shares(&self, symbol: &str, raw_shares: &str) -> Result<PortfolioView, CoreError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(CoreError::ValidationError("Symbol must not be empty".into()));
        }
        let shares = goal_service::parse_shares(raw_shares)?;
        self.refresh_service.edit_shares(&symbol, shares).await
    }

    /// Create a savings goal from raw form input. Returns the new goal id.
    pub async fn add_goal(&self, name: &str, raw_target: &str, deadline: &str) -> Result<i64, CoreError> {
        self.goal_service.add_goal(name, raw_target, deadline).await
    }

    /// Set a goal's progress amount from raw input. Returns rows updated (0 or 1).
    pub async fn update_goal_progress(&self, id: i64, raw_amount: &str) -> Result<usize, CoreError> {
        self.goal_service.update_progress(id, raw_amount).await
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub async fn holdings(&self) -> Vec<Holding> {
        self.store.list_holdings().await
    }

    pub async fn goals(&self) -> Vec<FinancialGoal> {
        self.goal_service.list().await
    }

    /// Stored snapshots for the configured window, oldest first.
    pub async fn history(&self) -> Vec<PortfolioSnapshot> {
        self.store.list_snapshots(self.settings.history_days).await
    }

    pub async fn summary(&self) -> PortfolioSummary {
        self.store.compute_summary().await
    }

    pub async fn risk_report(&self) -> RiskReport {
        let holdings = self.store.list_holdings().await;
        self.analytics_service.risk_report(&holdings)
    }

    pub async fn recommendations(&self) -> Vec<Recommendation> {
        let holdings = self.store.list_holdings().await;
        self.analytics_service.recommendations(&holdings)
    }

    #[must_use]
    pub fn benchmarks(&self) -> Vec<Benchmark> {
        AnalyticsService::benchmarks()
    }

    /// Compare the portfolio's metrics against a benchmark by name
    /// (case-insensitive, e.g. "NASDAQ").
    pub fn compare_to_benchmark(&self, name: &str) -> Result<BenchmarkComparison, CoreError> {
        let benchmark = AnalyticsService::find_benchmark(name).ok_or_else(|| {
            CoreError::ValidationError(format!("Unknown benchmark '{name}'"))
        })?;
        Ok(AnalyticsService::compare_to_benchmark(
            &AnalyticsService::default_user_metrics(),
            &benchmark,
        ))
    }

    /// Quote and recent daily closes for one symbol.
    pub async fn symbol_detail(&self, symbol: &str) -> Result<SymbolDetail, CoreError> {
        self.refresh_service.symbol_detail(&symbol.trim().to_uppercase()).await
    }

    /// Portfolio value per trading day rebuilt from upstream daily series.
    pub async fn portfolio_history(&self) -> Result<Vec<ChartPoint>, CoreError> {
        self.refresh_service.portfolio_history(&self.cycle_token()).await
    }
}
