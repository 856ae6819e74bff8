//! OHLC dataset structures

use chrono::{DateTime, Utc};
use shared::Timeframe;

use crate::data::MarketDataError;
use crate::indicators::Bar;

/// Parallel open/high/low/close sequences as returned by a provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OhlcSeries {
    pub opens: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub closes: Vec<f64>,
}

impl OhlcSeries {
    /// Check that all four sequences have the same length.
    pub fn validate(&self) -> Result<(), MarketDataError> {
        let n = self.closes.len();
        if self.highs.len() != n || self.lows.len() != n || self.opens.len() != n {
            return Err(MarketDataError::LengthMismatch {
                closes: n,
                highs: self.highs.len(),
                lows: self.lows.len(),
                opens: self.opens.len(),
            });
        }
        Ok(())
    }
}

/// Immutable market dataset for one (symbol, timeframe) key.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketDataset {
    symbol: String,
    timeframe: Timeframe,
    series: OhlcSeries,
    generated_at: DateTime<Utc>,
}

impl MarketDataset {
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        series: OhlcSeries,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, MarketDataError> {
        series.validate()?;
        Ok(Self {
            symbol: symbol.into(),
            timeframe,
            series,
            generated_at,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn closes(&self) -> &[f64] {
        &self.series.closes
    }

    pub fn highs(&self) -> &[f64] {
        &self.series.highs
    }

    pub fn lows(&self) -> &[f64] {
        &self.series.lows
    }

    pub fn opens(&self) -> &[f64] {
        &self.series.opens
    }

    pub fn len(&self) -> usize {
        self.series.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.closes.is_empty()
    }

    /// Iterate the dataset as bars, oldest first.
    pub fn bars(&self) -> impl Iterator<Item = Bar> + '_ {
        let s = &self.series;
        (0..s.closes.len()).map(move |i| Bar {
            open: s.opens[i],
            high: s.highs[i],
            low: s.lows[i],
            close: s.closes[i],
        })
    }
}
