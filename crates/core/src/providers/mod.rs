pub mod registry;
pub mod traits;

// Quote source implementations
pub mod alphavantage;
pub mod static_source;
pub mod yahoo_finance;
