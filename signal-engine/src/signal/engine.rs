//! BUY/SELL scoring rules

use rand::Rng;
use tracing::{debug, error};

use crate::data::MarketDataset;
use crate::signal::{Direction, IndicatorReadings, SignalResult};

/// Minimum series length before indicators are attempted.
pub const DEFAULT_MIN_POINTS: usize = 30;

pub const FALLBACK_LINE: &str = "▪️ Market data unavailable - using generated signal";

/// Scores datasets with a fixed RSI / MACD / Bollinger / SMA / ATR pipeline.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    min_points: usize,
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_POINTS)
    }
}

impl SignalEngine {
    pub fn new(min_points: usize) -> Self {
        Self { min_points }
    }

    pub fn min_points(&self) -> usize {
        self.min_points
    }

    /// Score a dataset. Short series take the random fallback and never
    /// touch the indicators.
    pub fn score(&self, dataset: &MarketDataset) -> SignalResult {
        if dataset.len() < self.min_points || dataset.is_empty() {
            debug!(
                "Only {} samples for {} (need {}), using fallback",
                dataset.len(),
                dataset.symbol(),
                self.min_points
            );
            return self.fallback();
        }

        match IndicatorReadings::compute(dataset) {
            Ok(readings) => self.evaluate(&readings),
            Err(e) => {
                error!("Indicator setup failed for {}: {}", dataset.symbol(), e);
                self.fallback()
            }
        }
    }

    /// Apply the scoring rules to a set of readings. Missing readings take
    /// the "else" branch of each comparison.
    pub fn evaluate(&self, r: &IndicatorReadings) -> SignalResult {
        let mut analysis = Vec::with_capacity(5);
        let mut buy_score = 0;
        let mut sell_score = 0;

        match r.rsi {
            Some(rsi) if rsi < 30.0 => {
                analysis.push(format!("▪️ RSI: {:.2} (Oversold)", rsi));
                buy_score += 2;
            }
            Some(rsi) if rsi > 70.0 => {
                analysis.push(format!("▪️ RSI: {:.2} (Overbought)", rsi));
                sell_score += 2;
            }
            Some(rsi) => analysis.push(format!("▪️ RSI: {:.2} (Neutral)", rsi)),
            None => analysis.push("▪️ RSI: n/a (Neutral)".to_string()),
        }

        match (r.macd, r.macd_signal) {
            (Some(macd), Some(signal)) if macd > signal => {
                analysis.push("▪️ MACD: Bullish crossover".to_string());
                buy_score += 1;
            }
            _ => {
                analysis.push("▪️ MACD: Bearish crossover".to_string());
                sell_score += 1;
            }
        }

        if r.bb_lower.is_some_and(|lower| r.close < lower) {
            analysis.push("▪️ Price below Lower Band (Oversold)".to_string());
            buy_score += 2;
        } else if r.bb_upper.is_some_and(|upper| r.close > upper) {
            analysis.push("▪️ Price above Upper Band (Overbought)".to_string());
            sell_score += 2;
        }

        match (r.sma_fast, r.sma_slow) {
            (Some(fast), Some(slow)) if fast > slow => {
                analysis.push("▪️ SMA20 > SMA50 (Uptrend)".to_string());
                buy_score += 1;
            }
            _ => {
                analysis.push("▪️ SMA20 < SMA50 (Downtrend)".to_string());
                sell_score += 1;
            }
        }

        match r.atr {
            Some(atr) => analysis.push(format!("▪️ ATR: {:.4} (Volatility)", atr)),
            None => analysis.push("▪️ ATR: n/a (Volatility)".to_string()),
        }

        let direction = if buy_score >= sell_score {
            Direction::Buy
        } else {
            Direction::Sell
        };

        SignalResult {
            direction,
            buy_score,
            sell_score,
            analysis,
            fallback: false,
        }
    }

    /// Random direction for when there is nothing to analyse.
    pub fn fallback(&self) -> SignalResult {
        Self::fallback_with(&mut rand::thread_rng())
    }

    pub fn fallback_with<R: Rng + ?Sized>(rng: &mut R) -> SignalResult {
        let direction = if rng.gen_bool(0.5) {
            Direction::Buy
        } else {
            Direction::Sell
        };
        SignalResult {
            direction,
            buy_score: 0,
            sell_score: 0,
            analysis: vec![FALLBACK_LINE.to_string()],
            fallback: true,
        }
    }
}
