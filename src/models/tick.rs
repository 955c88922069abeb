use serde::{Deserialize, Serialize};

/// A simulated quote pushed to realtime clients. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTick {
    pub symbol: String,
    /// Decimal string with exactly two fractional digits.
    pub price: String,
    /// ISO-8601, UTC, millisecond precision.
    pub timestamp: String,
}
