use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::holding::Quote;
use crate::models::series::{DailyBar, SeriesSize};

/// Trait abstraction for all market-data upstreams.
///
/// Each upstream (Alpha Vantage, Yahoo Finance, built-in mock data)
/// implements this trait. Upstreams are untrusted: any call may fail with
/// an upstream error (`Api`, `RateLimited`, `Network`).
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Latest quote for a symbol.
    async fn get_quote(&self, symbol: &str) -> Result<Quote, CoreError>;

    /// Daily closes for a symbol, oldest first, at most the 30 most recent points.
    async fn get_daily_series(
        &self,
        symbol: &str,
        size: SeriesSize,
    ) -> Result<Vec<DailyBar>, CoreError>;
}
