use thiserror::Error;

/// Unified error type for the entire wayplan-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Settlement / Expense validation ─────────────────────────────
    #[error("Invalid expense data in '{expense}': {message}")]
    InvalidExpenseData {
        /// The `reason` label of the offending expense record.
        expense: String,
        message: String,
    },

    // ── API / Network ───────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server rejected the operation: {0}")]
    ValidationConflict(String),

    #[error("API error ({endpoint}): {message}")]
    Api {
        endpoint: String,
        message: String,
    },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Local itinerary lookups ─────────────────────────────────────
    #[error("Day not found: {0}")]
    DayNotFound(i64),

    #[error("Activity not found: {0}")]
    ActivityNotFound(i64),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Sanitize error message: strip query parameters from URLs so
        // bearer tokens or move parameters never end up in logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
