//! Market data module
//!
//! OHLC datasets, the provider seam that produces them, and the TTL cache
//! that sits in front of the provider.

pub mod dataset;
pub mod provider;
pub mod cache;

pub use dataset::*;
pub use provider::*;
pub use cache::*;

/// Errors raised while producing market data.
#[derive(Debug, thiserror::Error)]
pub enum MarketDataError {
    #[error("series length mismatch: closes={closes}, highs={highs}, lows={lows}, opens={opens}")]
    LengthMismatch {
        closes: usize,
        highs: usize,
        lows: usize,
        opens: usize,
    },
    #[error("provider failed for {symbol}: {reason}")]
    Provider { symbol: String, reason: String },
}
