use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::holding::Quote;
use crate::models::series::{DailyBar, SeriesSize};
use crate::providers::registry::QuoteSourceRegistry;

/// Fetches quotes and daily series from the configured sources.
///
/// - Single requests fall back through the registry's sources in order.
/// - Batch requests are sequential with a fixed pause between calls, to stay
///   inside upstream quotas. Per-symbol failures are logged and skipped; the
///   batch fails only when every symbol failed.
pub struct QuoteService {
    registry: QuoteSourceRegistry,
    inter_request_delay: Duration,
}

impl QuoteService {
    pub fn new(registry: QuoteSourceRegistry, inter_request_delay: Duration) -> Self {
        Self {
            registry,
            inter_request_delay,
        }
    }

    pub fn source_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Latest quote for `symbol` from the first source that answers.
    ///
    /// Quotes with a non-finite or negative price are rejected and the next
    /// source is tried.
    pub async fn get_quote(&self, symbol: &str) -> Result<Quote, CoreError> {
        let mut last_error = None;

        for source in self.registry.sources() {
            match source.get_quote(symbol).await {
                Ok(quote) if !quote.price.is_finite() || quote.price < 0.0 => {
                    last_error = Some(CoreError::Api {
                        provider: source.name().to_string(),
                        message: format!(
                            "Invalid price returned for {symbol}: {} (must be finite and non-negative)",
                            quote.price
                        ),
                    });
                }
                Ok(quote) => return Ok(quote),
                Err(e) => {
                    debug!(source = source.name(), symbol, error = %e, "Quote source failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| no_source(symbol)))
    }

    /// Daily series for `symbol` from the first source that answers.
    pub async fn get_daily_series(
        &self,
        symbol: &str,
        size: SeriesSize,
    ) -> Result<Vec<DailyBar>, CoreError> {
        let mut last_error = None;

        for source in self.registry.sources() {
            match source.get_daily_series(symbol, size).await {
                Ok(series) => return Ok(series),
                Err(e) => {
                    debug!(source = source.name(), symbol, error = %e, "Series source failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| no_source(symbol)))
    }

    /// Quotes for every symbol, in order, skipping symbols that fail.
    ///
    /// Fails with `NoQuoteData` when no symbol succeeded, and with
    /// `Cancelled` as soon as `cancel` fires.
    pub async fn fetch_quotes(
        &self,
        symbols: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<Quote>, CoreError> {
        let mut quotes = Vec::with_capacity(symbols.len());
        let mut last_error = None;

        for (i, symbol) in symbols.iter().enumerate() {
            if i > 0 {
                self.pause(cancel).await?;
            } else if cancel.is_cancelled() {
                return Err(CoreError::Cancelled);
            }

            match self.get_quote(symbol).await {
                Ok(quote) => quotes.push(quote),
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "Failed to fetch quote, skipping");
                    last_error = Some(e);
                }
            }
        }

        if quotes.is_empty() {
            let reason = last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no symbols requested".to_string());
            return Err(CoreError::NoQuoteData(reason));
        }
        Ok(quotes)
    }

    /// Daily series for every symbol, in order, skipping symbols that fail.
    /// Same failure rules as `fetch_quotes`.
    pub async fn fetch_series(
        &self,
        symbols: &[String],
        size: SeriesSize,
        cancel: &CancellationToken,
    ) -> Result<Vec<(String, Vec<DailyBar>)>, CoreError> {
        let mut all = Vec::with_capacity(symbols.len());
        let mut last_error = None;

        for (i, symbol) in symbols.iter().enumerate() {
            if i > 0 {
                self.pause(cancel).await?;
            } else if cancel.is_cancelled() {
                return Err(CoreError::Cancelled);
            }

            match self.get_daily_series(symbol, size).await {
                Ok(series) => all.push((symbol.clone(), series)),
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "Failed to fetch daily series, skipping");
                    last_error = Some(e);
                }
            }
        }

        if all.is_empty() {
            let reason = last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no symbols requested".to_string());
            return Err(CoreError::NoQuoteData(reason));
        }
        Ok(all)
    }

    async fn pause(&self, cancel: &CancellationToken) -> Result<(), CoreError> {
        if self.inter_request_delay.is_zero() {
            return if cancel.is_cancelled() {
                Err(CoreError::Cancelled)
            } else {
                Ok(())
            };
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(CoreError::Cancelled),
            _ = tokio::time::sleep(self.inter_request_delay) => Ok(()),
        }
    }
}

fn no_source(symbol: &str) -> CoreError {
    CoreError::Api {
        provider: "none".into(),
        message: format!("No quote source configured for {symbol}"),
    }
}
