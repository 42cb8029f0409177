use async_trait::async_trait;
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::holding::Quote;
use crate::models::series::{latest_window, DailyBar, SeriesSize};
use crate::placeholder;
use super::traits::QuoteSource;

const PROVIDER: &str = "Static";

/// Serves quotes from memory. Used for offline operation and demos.
pub struct StaticQuoteSource {
    quotes: HashMap<String, Quote>,
    series: HashMap<String, Vec<DailyBar>>,
}

impl StaticQuoteSource {
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self {
            quotes: quotes
                .into_iter()
                .map(|q| (q.symbol.to_uppercase(), q))
                .collect(),
            series: HashMap::new(),
        }
    }

    /// The built-in mock quotes.
    pub fn with_defaults() -> Self {
        Self::new(placeholder::placeholder_quotes())
    }

    /// Attach a daily series for a symbol.
    pub fn with_series(mut self, symbol: &str, bars: Vec<DailyBar>) -> Self {
        self.series.insert(symbol.to_uppercase(), bars);
        self
    }
}

impl Default for StaticQuoteSource {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl QuoteSource for StaticQuoteSource {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, CoreError> {
        self.quotes
            .get(&symbol.to_uppercase())
            .cloned()
            .ok_or_else(|| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("No quote data for {symbol}"),
            })
    }

    async fn get_daily_series(
        &self,
        symbol: &str,
        _size: SeriesSize,
    ) -> Result<Vec<DailyBar>, CoreError> {
        self.series
            .get(&symbol.to_uppercase())
            .cloned()
            .map(latest_window)
            .ok_or_else(|| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("No time series data for {symbol}"),
            })
    }
}
