use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::clock::Clock;
use crate::errors::CoreError;
use crate::metrics;
use crate::models::holding::Holding;
use crate::models::series::{SeriesSize, SymbolDetail};
use crate::models::settings::{Settings, WatchEntry};
use crate::models::snapshot::ChartPoint;
use crate::models::view::PortfolioView;
use crate::placeholder;
use crate::services::quote_service::QuoteService;
use crate::storage::store::PortfolioStore;

/// Result of the Load phase.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedState {
    /// Stored holdings (possibly empty), or the placeholder set if the store failed
    pub holdings: Vec<Holding>,

    /// Stored snapshot window, or the placeholder chart when there is none
    pub chart: Vec<ChartPoint>,

    /// True when the store read failed and placeholder holdings were substituted
    pub used_placeholder: bool,
}

/// Result of the Fetch phase.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    /// Fetched holdings, or the placeholder set when every quote failed
    pub holdings: Vec<Holding>,

    /// Upstream failure to show the user
    pub error: Option<String>,
}

/// Runs refresh cycles: Load → Fetch → Reconcile.
///
/// Phases of one cycle run strictly in sequence. Separate cycles are not
/// serialized against each other; concurrent cycles interleave at the
/// granularity of single store operations (last write per key wins).
///
/// Every failure path has a fallback, so a cycle always yields a view.
/// The only error a cycle returns is `Cancelled`.
pub struct RefreshService {
    store: Arc<PortfolioStore>,
    quotes: Arc<QuoteService>,
    watch_list: Vec<WatchEntry>,
    symbols: Vec<String>,
    history_days: u32,
    warmup_delay: Duration,
    clock: Arc<dyn Clock>,
}

impl RefreshService {
    pub fn new(
        store: Arc<PortfolioStore>,
        quotes: Arc<QuoteService>,
        settings: &Settings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            quotes,
            watch_list: settings.watch_list.clone(),
            symbols: settings.symbols(),
            history_days: settings.history_days,
            warmup_delay: settings.warmup_delay(),
            clock,
        }
    }

    // ── Phases ──────────────────────────────────────────────────────

    /// Read cached holdings and the snapshot window.
    pub async fn load(&self) -> LoadedState {
        let holdings = self.store.try_list_holdings().await;
        let snapshots = self.store.try_list_snapshots(self.history_days).await;

        match (holdings, snapshots) {
            (Ok(holdings), Ok(snapshots)) => {
                info!(
                    holdings = holdings.len(),
                    snapshots = snapshots.len(),
                    "Loaded portfolio from store"
                );
                LoadedState {
                    holdings,
                    chart: chart_or_placeholder(snapshots.into_iter().map(ChartPoint::from).collect()),
                    used_placeholder: false,
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                error!(error = %e, "Error loading data from store, using placeholder data");
                LoadedState {
                    holdings: placeholder::placeholder_holdings(),
                    chart: placeholder::placeholder_chart(),
                    used_placeholder: true,
                }
            }
        }
    }

    /// Fetch fresh quotes for the watch list and attach share counts.
    ///
    /// Shares already stored for a symbol win over the watch-list default.
    /// When every quote fails the placeholder holdings are used instead and
    /// the failure is reported in `error`.
    pub async fn fetch(
        &self,
        stored: &[Holding],
        cancel: &CancellationToken,
    ) -> Result<FetchOutcome, CoreError> {
        let fetched_at = self.clock.now().to_rfc3339();

        let stored_shares: HashMap<&str, u32> = stored
            .iter()
            .filter_map(|h| h.shares.map(|s| (h.symbol.as_str(), s)))
            .collect();
        let default_shares: HashMap<&str, u32> = self
            .watch_list
            .iter()
            .map(|e| (e.symbol.as_str(), e.shares))
            .collect();

        match self.quotes.fetch_quotes(&self.symbols, cancel).await {
            Ok(quotes) => {
                let holdings = quotes
                    .into_iter()
                    .map(|mut quote| {
                        quote.last_updated = fetched_at.clone();
                        let shares = stored_shares
                            .get(quote.symbol.as_str())
                            .or_else(|| default_shares.get(quote.symbol.as_str()))
                            .copied();
                        Holding::from_quote(quote, shares)
                    })
                    .collect();
                Ok(FetchOutcome {
                    holdings,
                    error: None,
                })
            }
            Err(CoreError::Cancelled) => Err(CoreError::Cancelled),
            Err(e) => {
                warn!(error = %e, "Quote fetch failed, using placeholder holdings");
                let holdings = placeholder::placeholder_holdings()
                    .into_iter()
                    .map(|mut h| {
                        h.last_updated = fetched_at.clone();
                        if let Some(&s) = stored_shares.get(h.symbol.as_str()) {
                            h.shares = Some(s);
                        }
                        h
                    })
                    .collect();
                Ok(FetchOutcome {
                    holdings,
                    error: Some(e.to_string()),
                })
            }
        }
    }

    /// Persist holdings, record today's snapshot from the stored summary, and
    /// return the refreshed chart window.
    pub async fn reconcile(&self, holdings: &[Holding]) -> Result<Vec<ChartPoint>, CoreError> {
        self.store.upsert_holdings(holdings).await?;

        let summary = self.store.compute_summary().await;
        self.store
            .record_snapshot(summary.total_value, summary.total_change, summary.change_percent)
            .await?;

        let snapshots = self.store.list_snapshots(self.history_days).await;
        Ok(chart_or_placeholder(
            snapshots.into_iter().map(ChartPoint::from).collect(),
        ))
    }

    // ── Cycles ──────────────────────────────────────────────────────

    /// One full refresh cycle.
    pub async fn refresh(&self, cancel: &CancellationToken) -> Result<PortfolioView, CoreError> {
        let cycle_id = Uuid::new_v4();
        let span = info_span!("refresh", cycle_id = %cycle_id);
        self.run_cycle(cycle_id, cancel).instrument(span).await
    }

    /// Wait for the warm-up delay, then run one refresh cycle.
    pub async fn startup(&self, cancel: &CancellationToken) -> Result<PortfolioView, CoreError> {
        if !self.warmup_delay.is_zero() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(CoreError::Cancelled),
                _ = tokio::time::sleep(self.warmup_delay) => {}
            }
        }
        self.refresh(cancel).await
    }

    /// Rebuild the view from the store without contacting the quote source.
    pub async fn reload(&self) -> PortfolioView {
        let loaded = self.load().await;
        build_view(Uuid::new_v4(), loaded.holdings, loaded.chart, None)
    }

    /// Set the share count of one holding, then reload from the store.
    pub async fn edit_shares(&self, symbol: &str, shares: u32) -> Result<PortfolioView, CoreError> {
        self.store.update_holding_shares(symbol, shares).await?;
        Ok(self.reload().await)
    }

    // ── Market data ─────────────────────────────────────────────────

    /// Latest quote and recent daily closes for one symbol, fetched concurrently.
    pub async fn symbol_detail(&self, symbol: &str) -> Result<SymbolDetail, CoreError> {
        let (quote, series) = tokio::try_join!(
            self.quotes.get_quote(symbol),
            self.quotes.get_daily_series(symbol, SeriesSize::Compact),
        )?;
        Ok(SymbolDetail { quote, series })
    }

    /// Portfolio value per trading day, reconstructed from each watch-list
    /// symbol's daily closes and its current share count.
    pub async fn portfolio_history(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ChartPoint>, CoreError> {
        let stored: HashMap<String, u32> = self
            .store
            .list_holdings()
            .await
            .into_iter()
            .filter_map(|h| h.shares.map(|s| (h.symbol, s)))
            .collect();

        let series = self
            .quotes
            .fetch_series(&self.symbols, SeriesSize::Compact, cancel)
            .await?;

        let positions: Vec<(u32, &[_])> = series
            .iter()
            .map(|(symbol, bars)| {
                let shares = stored.get(symbol).copied().unwrap_or_else(|| {
                    self.watch_list
                        .iter()
                        .find(|e| &e.symbol == symbol)
                        .map(|e| e.shares)
                        .unwrap_or(0)
                });
                (shares, bars.as_slice())
            })
            .collect();

        Ok(metrics::portfolio_value_series(&positions))
    }

    // ── Internal ────────────────────────────────────────────────────

    async fn run_cycle(
        &self,
        cycle_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<PortfolioView, CoreError> {
        ensure_active(cancel)?;
        let loaded = self.load().await;

        ensure_active(cancel)?;
        let stored = if loaded.used_placeholder {
            &[][..]
        } else {
            loaded.holdings.as_slice()
        };
        let fetched = self.fetch(stored, cancel).await?;

        ensure_active(cancel)?;
        match self.reconcile(&fetched.holdings).await {
            Ok(chart) => {
                info!(holdings = fetched.holdings.len(), "Refresh cycle complete");
                Ok(build_view(cycle_id, fetched.holdings, chart, fetched.error))
            }
            Err(e) => {
                error!(error = %e, "Failed to persist refreshed portfolio, showing placeholder data");
                Ok(build_view(
                    cycle_id,
                    placeholder::placeholder_holdings(),
                    placeholder::placeholder_chart(),
                    Some(e.to_string()),
                ))
            }
        }
    }
}

fn ensure_active(cancel: &CancellationToken) -> Result<(), CoreError> {
    if cancel.is_cancelled() {
        info!("Refresh cycle cancelled");
        return Err(CoreError::Cancelled);
    }
    Ok(())
}

fn chart_or_placeholder(chart: Vec<ChartPoint>) -> Vec<ChartPoint> {
    if chart.is_empty() {
        placeholder::placeholder_chart()
    } else {
        chart
    }
}

fn build_view(
    cycle_id: Uuid,
    holdings: Vec<Holding>,
    chart: Vec<ChartPoint>,
    error: Option<String>,
) -> PortfolioView {
    let summary = metrics::summarize(&holdings);
    PortfolioView {
        cycle_id,
        holdings,
        chart,
        summary,
        error,
    }
}
