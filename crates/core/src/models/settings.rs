use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::errors::CoreError;

use super::analytics::Sector;

/// Key under which the Alpha Vantage API key is stored in `api_keys`.
pub const ALPHAVANTAGE_KEY: &str = "alphavantage";

/// Key used when no Alpha Vantage key is configured (heavily rate-limited).
pub const DEMO_API_KEY: &str = "demo";

pub const DEFAULT_ALPHAVANTAGE_URL: &str = "https://www.alphavantage.co/query";

/// Which upstream supplies quotes. Sources are tried in the configured order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSourceKind {
    /// Built-in mock quotes, no network access
    Static,
    /// Alpha Vantage REST API (API key, strict quotas)
    AlphaVantage,
    /// Yahoo Finance public endpoints (no key)
    YahooFinance,
}

impl std::fmt::Display for QuoteSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteSourceKind::Static => write!(f, "static"),
            QuoteSourceKind::AlphaVantage => write!(f, "alpha_vantage"),
            QuoteSourceKind::YahooFinance => write!(f, "yahoo_finance"),
        }
    }
}

/// A symbol refreshed on every cycle, with the share count used when the
/// store holds no shares for it yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEntry {
    pub symbol: String,
    pub shares: u32,
}

impl WatchEntry {
    pub fn new(symbol: impl Into<String>, shares: u32) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            shares,
        }
    }
}

/// Runtime configuration for the tracker. Stored as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Quote sources in fallback order.
    pub quote_sources: Vec<QuoteSourceKind>,

    /// Optional API keys for providers that require them.
    /// Keys: provider name (e.g., "alphavantage").
    pub api_keys: HashMap<String, String>,

    pub alphavantage_base_url: String,

    pub request_timeout_secs: u64,

    /// Pause between consecutive quote requests, to respect upstream quotas.
    pub inter_request_delay_ms: u64,

    /// Pause before the startup refresh cycle.
    pub warmup_delay_ms: u64,

    /// Number of daily snapshots returned for charting.
    pub history_days: u32,

    pub database_path: String,

    pub watch_list: Vec<WatchEntry>,

    pub sectors: Vec<Sector>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quote_sources: vec![QuoteSourceKind::Static],
            api_keys: HashMap::new(),
            alphavantage_base_url: DEFAULT_ALPHAVANTAGE_URL.to_string(),
            request_timeout_secs: 10,
            inter_request_delay_ms: 1000,
            warmup_delay_ms: 2000,
            history_days: 30,
            database_path: "portfolio.db".to_string(),
            watch_list: vec![
                WatchEntry::new("AAPL", 10),
                WatchEntry::new("GOOGL", 5),
                WatchEntry::new("MSFT", 15),
                WatchEntry::new("TSLA", 8),
                WatchEntry::new("AMZN", 12),
            ],
            sectors: vec![
                Sector::new("Technology", &["AAPL", "GOOGL", "MSFT"]),
                Sector::new("Electric Vehicles", &["TSLA"]),
                Sector::new("E-commerce", &["AMZN"]),
            ],
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. Missing fields take their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize settings: {e}")))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.quote_sources.is_empty() {
            return Err(CoreError::ValidationError(
                "At least one quote source must be configured".into(),
            ));
        }
        if self.history_days == 0 {
            return Err(CoreError::ValidationError(
                "history_days must be greater than 0".into(),
            ));
        }
        if let Some(entry) = self.watch_list.iter().find(|e| e.symbol.trim().is_empty()) {
            return Err(CoreError::ValidationError(format!(
                "Watch list entry with {} shares has an empty symbol",
                entry.shares
            )));
        }
        Ok(())
    }

    /// Set an API key for a provider (e.g., "alphavantage").
    pub fn set_api_key(&mut self, provider: &str, key: &str) -> Result<(), CoreError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CoreError::ValidationError(format!(
                "API key for '{provider}' must not be empty"
            )));
        }
        self.api_keys.insert(provider.to_string(), key.to_string());
        Ok(())
    }

    /// Alpha Vantage key, or the public demo key when none is configured.
    pub fn alphavantage_key(&self) -> &str {
        self.api_keys
            .get(ALPHAVANTAGE_KEY)
            .map(String::as_str)
            .unwrap_or(DEMO_API_KEY)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn inter_request_delay(&self) -> Duration {
        Duration::from_millis(self.inter_request_delay_ms)
    }

    pub fn warmup_delay(&self) -> Duration {
        Duration::from_millis(self.warmup_delay_ms)
    }

    /// Watch-list symbols in configured order.
    pub fn symbols(&self) -> Vec<String> {
        self.watch_list.iter().map(|e| e.symbol.clone()).collect()
    }
}
