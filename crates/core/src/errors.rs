use thiserror::Error;

/// Unified error type for the entire portfolio-tracker-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage ─────────────────────────────────────────────────────
    #[error("Storage error: {0}")]
    Storage(String),

    // ── Configuration / File ────────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Upstream / Network ──────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Rate limited ({provider}): {message}")]
    RateLimited {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to fetch any stock data: {0}")]
    NoQuoteData(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl CoreError {
    /// True for failures caused by the quote source (unreachable,
    /// rate-limited, malformed payload).
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            CoreError::Api { .. }
                | CoreError::RateLimited { .. }
                | CoreError::Network(_)
                | CoreError::NoQuoteData(_)
        )
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, CoreError::Storage(_))
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(e: rusqlite::Error) -> Self {
        CoreError::Storage(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL, including the apikey query parameter.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
