//! Signal engine: indicator scoring over cached OHLC data.
//!
//! Built on [ta-rs](https://github.com/greyblake/ta-rs) for the technical
//! analysis.
//!
//! # Features
//!
//! - **Market Data**: OHLC datasets, a pluggable [`data::DataProvider`] and a
//!   TTL-bounded [`data::MarketDataCache`]
//! - **Technical Indicators**: RSI, MACD, SMA, Bollinger Bands, ATR
//! - **Scoring**: [`signal::SignalEngine`] turns the last-bar readings into a
//!   BUY/SELL call
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use signal_engine::prelude::*;
//!
//! # async fn run() {
//! let cache = MarketDataCache::new(
//!     Arc::new(SyntheticProvider::default()),
//!     Arc::new(shared::SystemClock),
//!     chrono::Duration::seconds(DEFAULT_CACHE_TTL_SECS),
//! );
//! let engine = SignalEngine::default();
//! let result = match cache.get("BTC/USDT", shared::Timeframe::Min1).await {
//!     Some(dataset) => engine.score(&dataset),
//!     None => engine.fallback(),
//! };
//! println!("{} {:?}", result.direction, result.analysis);
//! # }
//! ```

pub mod data;
pub mod indicators;
pub mod signal;

// Re-export commonly used types
pub mod prelude {
    pub use crate::data::*;
    pub use crate::indicators::*;
    pub use crate::signal::*;
}
