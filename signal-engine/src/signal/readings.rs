//! Last-bar indicator readings over a dataset

use crate::data::MarketDataset;
use crate::indicators::{BollingerBands, Indicator, IndicatorError, ATR, MACD, RSI, SMA};

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const BB_PERIOD: usize = 20;
pub const BB_STD_DEV: f64 = 2.0;
pub const SMA_FAST: usize = 20;
pub const SMA_SLOW: usize = 50;
pub const ATR_PERIOD: usize = 14;

/// Indicator values at the last bar. `None` marks an indicator that had
/// not warmed up yet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorReadings {
    pub close: f64,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub sma_fast: Option<f64>,
    pub sma_slow: Option<f64>,
    pub atr: Option<f64>,
}

impl IndicatorReadings {
    pub fn compute(dataset: &MarketDataset) -> Result<Self, IndicatorError> {
        let mut rsi = RSI::new(RSI_PERIOD)?;
        let mut macd = MACD::new(MACD_FAST, MACD_SLOW, MACD_SIGNAL)?;
        let mut bb = BollingerBands::new(BB_PERIOD, BB_STD_DEV)?;
        let mut sma_fast = SMA::new(SMA_FAST)?;
        let mut sma_slow = SMA::new(SMA_SLOW)?;
        let mut atr = ATR::new(ATR_PERIOD)?;

        let mut close = 0.0;
        for bar in dataset.bars() {
            rsi.update(&bar);
            macd.update(&bar);
            bb.update(&bar);
            sma_fast.update(&bar);
            sma_slow.update(&bar);
            atr.update(&bar);
            close = bar.close;
        }

        Ok(Self {
            close,
            rsi: rsi.value(),
            macd: macd.macd(),
            macd_signal: macd.signal(),
            bb_upper: bb.upper(),
            bb_lower: bb.lower(),
            sma_fast: sma_fast.value(),
            sma_slow: sma_slow.value(),
            atr: atr.value(),
        })
    }
}
