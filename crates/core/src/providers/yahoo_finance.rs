use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::holding::Quote;
use crate::models::series::{latest_window, DailyBar, SeriesSize};
use super::traits::QuoteSource;

const PROVIDER: &str = "Yahoo Finance";

/// Yahoo Finance quote source for stock/equity quotes.
///
/// - **Free**: No API key required.
/// - **No strict rate limits** (unofficial public API).
/// - **Data**: daily OHLCV; the latest quote is derived from the last two
///   daily closes.
///
/// Uses the `yahoo_finance_api` crate which wraps Yahoo Finance's
/// public endpoints.
pub struct YahooFinanceQuoteSource {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceQuoteSource {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }

    /// Convert a unix timestamp (seconds) to `chrono::NaiveDate`.
    fn timestamp_to_naive_date(ts: i64) -> Option<chrono::NaiveDate> {
        chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
    }

    async fn daily_quotes(
        &self,
        symbol: &str,
        range: &str,
    ) -> Result<Vec<yahoo_finance_api::Quote>, CoreError> {
        let resp = self
            .connector
            .get_quote_range(symbol, "1d", range)
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to fetch daily quotes for {symbol}: {e}"),
            })?;

        resp.quotes().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse quotes for {symbol}: {e}"),
        })
    }
}

#[async_trait]
impl QuoteSource for YahooFinanceQuoteSource {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, CoreError> {
        let upper = symbol.to_uppercase();
        let quotes = self.daily_quotes(&upper, "5d").await?;

        let (last, prev) = match quotes.as_slice() {
            [.., prev, last] => (last, Some(prev)),
            [last] => (last, None),
            [] => {
                return Err(CoreError::Api {
                    provider: PROVIDER.into(),
                    message: format!("No quote data for {upper}"),
                })
            }
        };

        let prev_close = prev.map(|q| q.close).unwrap_or(last.close);
        let change = last.close - prev_close;
        let change_percent = if prev_close == 0.0 {
            0.0
        } else {
            change / prev_close * 100.0
        };
        let last_updated = Self::timestamp_to_naive_date(last.timestamp as i64)
            .map(|d| d.to_string())
            .unwrap_or_default();

        Ok(Quote::new(
            upper,
            last.close,
            change,
            format!("{change_percent:.4}"),
            last.volume,
            last_updated,
        ))
    }

    async fn get_daily_series(
        &self,
        symbol: &str,
        size: SeriesSize,
    ) -> Result<Vec<DailyBar>, CoreError> {
        let range = match size {
            SeriesSize::Compact => "3mo",
            SeriesSize::Full => "max",
        };
        let quotes = self.daily_quotes(&symbol.to_uppercase(), range).await?;

        let bars = quotes
            .iter()
            .filter_map(|q| {
                Some(DailyBar {
                    date: Self::timestamp_to_naive_date(q.timestamp as i64)?,
                    close: q.close,
                    volume: q.volume,
                })
            })
            .collect();

        Ok(latest_window(bars))
    }
}
