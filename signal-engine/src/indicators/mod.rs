//! Technical indicators module
//!
//! Thin wrappers over the `ta` crate that track warm-up, so a reading is
//! only reported once the indicator has seen enough samples.

pub mod rsi;
pub mod macd;
pub mod sma;
pub mod bb;
pub mod atr;

pub use rsi::*;
pub use macd::*;
pub use sma::*;
pub use bb::*;
pub use atr::*;

/// Errors raised when an indicator cannot be constructed.
#[derive(Debug, thiserror::Error)]
pub enum IndicatorError {
    #[error("invalid parameters for {indicator}: {reason}")]
    InvalidParameter {
        indicator: &'static str,
        reason: String,
    },
}

impl IndicatorError {
    pub(crate) fn invalid(indicator: &'static str, err: ta::errors::TaError) -> Self {
        IndicatorError::InvalidParameter {
            indicator,
            reason: format!("{:?}", err),
        }
    }
}

/// One OHLC sample as fed to the indicators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl ta::Open for Bar {
    fn open(&self) -> f64 {
        self.open
    }
}

impl ta::High for Bar {
    fn high(&self) -> f64 {
        self.high
    }
}

impl ta::Low for Bar {
    fn low(&self) -> f64 {
        self.low
    }
}

impl ta::Close for Bar {
    fn close(&self) -> f64 {
        self.close
    }
}

/// Indicator trait for all indicators
pub trait Indicator {
    /// Get the name of the indicator
    fn name(&self) -> &str;

    /// Update indicator with the next bar
    fn update(&mut self, bar: &Bar);

    /// Get current indicator value
    fn value(&self) -> Option<f64>;

    /// Check if indicator is ready (has enough data)
    fn is_ready(&self) -> bool;
}
