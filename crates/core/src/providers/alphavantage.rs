use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::warn;

use crate::errors::CoreError;
use crate::models::holding::Quote;
use crate::models::series::{latest_window, DailyBar, SeriesSize};
use crate::models::settings::DEFAULT_ALPHAVANTAGE_URL;
use super::traits::QuoteSource;

const PROVIDER: &str = "Alpha Vantage";

/// Alpha Vantage API quote source for stock/equity quotes.
///
/// - **Free tier**: 25 requests/day (across ALL endpoints).
/// - **Requires**: API key; the public `demo` key only serves a few symbols.
/// - **Quota signalling**: an exhausted quota or demo-key restriction comes
///   back as HTTP 200 with an `Information` (or `Note`) field instead of data.
pub struct AlphaVantageQuoteSource {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageQuoteSource {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_ALPHAVANTAGE_URL, Duration::from_secs(10))
    }

    /// Point the source at another endpoint (proxies, test servers).
    pub fn with_base_url(api_key: String, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|e| {
                    warn!(error = %e, "HTTP client setup failed, using defaults without timeout");
                    Client::new()
                }),
            api_key,
            base_url: base_url.into(),
        }
    }

    fn api_error(message: String) -> CoreError {
        CoreError::Api {
            provider: PROVIDER.into(),
            message,
        }
    }
}

// ── Alpha Vantage API response types ────────────────────────────────

#[derive(Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: Option<String>,
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "06. volume")]
    volume: Option<String>,
    #[serde(rename = "07. latest trading day")]
    latest_trading_day: Option<String>,
    #[serde(rename = "09. change")]
    change: Option<String>,
    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
}

#[derive(Deserialize)]
struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<HashMap<String, DailyData>>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct DailyData {
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

/// Map the quota/diagnostic fields Alpha Vantage returns in place of data.
fn check_diagnostics(
    symbol: &str,
    information: Option<String>,
    note: Option<String>,
    error_message: Option<String>,
) -> Result<(), CoreError> {
    if let Some(message) = information.or(note) {
        return Err(CoreError::RateLimited {
            provider: PROVIDER.into(),
            message,
        });
    }
    if let Some(message) = error_message {
        return Err(AlphaVantageQuoteSource::api_error(format!(
            "Upstream rejected request for {symbol}: {message}"
        )));
    }
    Ok(())
}

fn parse_field<T: std::str::FromStr>(
    symbol: &str,
    field: &str,
    value: Option<&str>,
) -> Result<T, CoreError>
where
    T::Err: std::fmt::Display,
{
    let raw = value.ok_or_else(|| {
        AlphaVantageQuoteSource::api_error(format!("Missing {field} in quote for {symbol}"))
    })?;
    raw.trim().parse().map_err(|e| {
        AlphaVantageQuoteSource::api_error(format!("Invalid {field} '{raw}' for {symbol}: {e}"))
    })
}

#[async_trait]
impl QuoteSource for AlphaVantageQuoteSource {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, CoreError> {
        let upper = symbol.to_uppercase();
        let resp: GlobalQuoteResponse = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", upper.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| Self::api_error(format!("Failed to parse quote for {upper}: {e}")))?;

        check_diagnostics(&upper, resp.information, resp.note, resp.error_message)?;

        let quote = resp
            .global_quote
            .ok_or_else(|| Self::api_error(format!("Invalid response from API for symbol {upper}")))?;

        let price: f64 = parse_field(&upper, "price", quote.price.as_deref())?;
        if !price.is_finite() || price < 0.0 {
            return Err(Self::api_error(format!(
                "Invalid price returned for {upper}: {price} (must be finite and non-negative)"
            )));
        }
        let change: f64 = parse_field(&upper, "change", quote.change.as_deref())?;
        let volume: u64 = parse_field(&upper, "volume", quote.volume.as_deref())?;
        let change_percent = quote
            .change_percent
            .ok_or_else(|| Self::api_error(format!("Missing change percent in quote for {upper}")))?
            .trim()
            .trim_end_matches('%')
            .to_string();
        let last_updated = quote
            .latest_trading_day
            .ok_or_else(|| Self::api_error(format!("Missing trading day in quote for {upper}")))?;

        Ok(Quote::new(
            quote.symbol.unwrap_or(upper),
            price,
            change,
            change_percent,
            volume,
            last_updated,
        ))
    }

    async fn get_daily_series(
        &self,
        symbol: &str,
        size: SeriesSize,
    ) -> Result<Vec<DailyBar>, CoreError> {
        let upper = symbol.to_uppercase();
        let resp: TimeSeriesResponse = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", upper.as_str()),
                ("outputsize", size.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| Self::api_error(format!("Failed to parse time series for {upper}: {e}")))?;

        check_diagnostics(&upper, resp.information, resp.note, resp.error_message)?;

        let time_series = resp
            .time_series
            .ok_or_else(|| Self::api_error(format!("No time series data for {upper}")))?;

        let bars = time_series
            .iter()
            .map(|(date_str, data)| {
                let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                    Self::api_error(format!("Invalid date '{date_str}' for {upper}: {e}"))
                })?;
                Ok(DailyBar {
                    date,
                    close: parse_field(&upper, "close", Some(data.close.as_str()))?,
                    volume: parse_field(&upper, "volume", Some(data.volume.as_str()))?,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        Ok(latest_window(bars))
    }
}
