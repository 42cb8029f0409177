use serde::{Deserialize, Serialize};

/// Raw quote record as delivered by a quote source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Ticker symbol, uppercased (e.g., "AAPL")
    pub symbol: String,

    /// Latest unit price
    pub price: f64,

    /// Absolute change since prior close
    pub change: f64,

    /// Percent change as a decimal string without the trailing `%` (e.g., "1.24")
    pub change_percent: String,

    /// Trade volume
    pub volume: u64,

    /// ISO-8601 date or timestamp of the quoted data
    pub last_updated: String,
}

impl Quote {
    pub fn new(
        symbol: impl Into<String>,
        price: f64,
        change: f64,
        change_percent: impl Into<String>,
        volume: u64,
        last_updated: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            price,
            change,
            change_percent: change_percent.into(),
            volume,
            last_updated: last_updated.into(),
        }
    }
}

/// A position in one security.
///
/// At most one holding exists per `symbol` in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: String,
    pub volume: u64,

    /// Quantity held. Unknown at fetch time until attached; values as 0 when missing.
    pub shares: Option<u32>,

    pub last_updated: String,
}

impl Holding {
    /// Attach a share count to a fetched quote.
    pub fn from_quote(quote: Quote, shares: Option<u32>) -> Self {
        Self {
            symbol: quote.symbol,
            price: quote.price,
            change: quote.change,
            change_percent: quote.change_percent,
            volume: quote.volume,
            shares,
            last_updated: quote.last_updated,
        }
    }

    /// Share count used for valuation.
    pub fn shares_or_zero(&self) -> u32 {
        self.shares.unwrap_or(0)
    }

    /// `price * shares`
    pub fn position_value(&self) -> f64 {
        self.price * f64::from(self.shares_or_zero())
    }

    /// `change * shares`
    pub fn position_change(&self) -> f64 {
        self.change * f64::from(self.shares_or_zero())
    }
}
