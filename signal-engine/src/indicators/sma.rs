//! SMA (Simple Moving Average) indicator

use crate::indicators::{Bar, Indicator, IndicatorError};
use ta::indicators::SimpleMovingAverage;
use ta::Next;

/// SMA indicator wrapper
#[derive(Debug, Clone)]
pub struct SMA {
    inner: SimpleMovingAverage,
    period: usize,
    update_count: usize,
    last_value: Option<f64>,
}

impl SMA {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        Ok(Self {
            inner: SimpleMovingAverage::new(period)
                .map_err(|e| IndicatorError::invalid("SMA", e))?,
            period,
            update_count: 0,
            last_value: None,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for SMA {
    fn name(&self) -> &str {
        "SMA"
    }

    fn update(&mut self, bar: &Bar) {
        let sma_value = self.inner.next(bar.close);
        self.update_count += 1;
        if self.update_count >= self.period {
            self.last_value = Some(sma_value);
        }
    }

    fn value(&self) -> Option<f64> {
        self.last_value
    }

    fn is_ready(&self) -> bool {
        self.update_count >= self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_averages_last_window() {
        let mut sma = SMA::new(3).unwrap();
        for close in [1.0, 2.0, 3.0, 4.0] {
            sma.update(&Bar { open: close, high: close, low: close, close });
        }
        assert!((sma.value().unwrap() - 3.0).abs() < 1e-9);
    }
}
