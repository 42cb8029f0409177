use tracing::warn;

use crate::models::settings::{QuoteSourceKind, Settings};

use super::alphavantage::AlphaVantageQuoteSource;
use super::static_source::StaticQuoteSource;
use super::traits::QuoteSource;
use super::yahoo_finance::YahooFinanceQuoteSource;

/// Registry of configured quote sources, in fallback order.
///
/// The first source is the primary; later ones are consulted only when
/// every earlier source failed for a request.
pub struct QuoteSourceRegistry {
    sources: Vec<Box<dyn QuoteSource>>,
}

impl QuoteSourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Build the sources listed in `settings.quote_sources`, in that order.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut registry = Self::new();

        for kind in &settings.quote_sources {
            match kind {
                QuoteSourceKind::Static => {
                    registry.register(Box::new(StaticQuoteSource::with_defaults()));
                }
                QuoteSourceKind::AlphaVantage => {
                    registry.register(Box::new(AlphaVantageQuoteSource::with_base_url(
                        settings.alphavantage_key().to_string(),
                        settings.alphavantage_base_url.clone(),
                        settings.request_timeout(),
                    )));
                }
                QuoteSourceKind::YahooFinance => match YahooFinanceQuoteSource::new() {
                    Ok(yahoo) => registry.register(Box::new(yahoo)),
                    Err(e) => warn!(error = %e, "Yahoo Finance source unavailable, skipping"),
                },
            }
        }

        registry
    }

    /// Register a new quote source at the lowest priority.
    pub fn register(&mut self, source: Box<dyn QuoteSource>) {
        self.sources.push(source);
    }

    /// All sources in priority order.
    pub fn sources(&self) -> Vec<&dyn QuoteSource> {
        self.sources.iter().map(|s| s.as_ref()).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for QuoteSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
