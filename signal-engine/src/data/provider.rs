//! Data provider seam and the synthetic price-path generator

use async_trait::async_trait;
use rand::Rng;
use shared::Timeframe;

use crate::data::{MarketDataError, OhlcSeries};

/// Number of samples the synthetic provider produces per dataset.
pub const SYNTHETIC_SAMPLES: usize = 100;

/// Source of OHLC series. Swap in a real feed by implementing this.
#[async_trait]
pub trait DataProvider: Send + Sync {
    async fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<OhlcSeries, MarketDataError>;
}

/// Fabricates a drifting random walk around a random base price.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    samples: usize,
}

impl SyntheticProvider {
    pub fn new(samples: usize) -> Self {
        Self { samples }
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new(SYNTHETIC_SAMPLES)
    }
}

#[async_trait]
impl DataProvider for SyntheticProvider {
    async fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<OhlcSeries, MarketDataError> {
        let series = generate_series(&mut rand::thread_rng(), self.samples);
        tracing::debug!("Generated {} synthetic samples for {} ({})", series.closes.len(), symbol, timeframe);
        Ok(series)
    }
}

/// Linear trend plus bounded uniform noise; highs, lows and opens are
/// bounded offsets from the close.
pub fn generate_series<R: Rng + ?Sized>(rng: &mut R, samples: usize) -> OhlcSeries {
    let trend = rng.gen_range(-0.5..0.5);
    let base_price = 100.0 + rng.gen_range(-20.0..20.0);

    let closes: Vec<f64> = (0..samples)
        .map(|i| base_price + i as f64 * trend + rng.gen_range(-1.0..1.0))
        .collect();
    let highs = closes.iter().map(|c| c + rng.gen_range(0.0..1.0)).collect();
    let lows = closes.iter().map(|c| c - rng.gen_range(0.0..1.0)).collect();
    let opens = closes.iter().map(|c| c + rng.gen_range(-0.5..0.5)).collect();

    OhlcSeries { opens, highs, lows, closes }
}
