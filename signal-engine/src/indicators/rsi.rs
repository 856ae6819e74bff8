//! RSI (Relative Strength Index) indicator

use crate::indicators::{Bar, Indicator, IndicatorError};
use ta::indicators::RelativeStrengthIndex;
use ta::Next;

/// RSI indicator wrapper
#[derive(Debug, Clone)]
pub struct RSI {
    inner: RelativeStrengthIndex,
    period: usize,
    update_count: usize,
    last_value: Option<f64>,
}

impl RSI {
    /// Create new RSI indicator
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        Ok(Self {
            inner: RelativeStrengthIndex::new(period)
                .map_err(|e| IndicatorError::invalid("RSI", e))?,
            period,
            update_count: 0,
            last_value: None,
        })
    }

    /// Get RSI period
    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for RSI {
    fn name(&self) -> &str {
        "RSI"
    }

    fn update(&mut self, bar: &Bar) {
        let rsi_value = self.inner.next(bar.close);
        self.update_count += 1;
        if self.update_count > self.period {
            self.last_value = Some(rsi_value);
        }
    }

    fn value(&self) -> Option<f64> {
        self.last_value
    }

    fn is_ready(&self) -> bool {
        // ta RSI needs period+1 values
        self.update_count > self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(close: f64) -> Bar {
        Bar { open: close, high: close, low: close, close }
    }

    #[test]
    fn test_rsi_warm_up() {
        let mut rsi = RSI::new(14).unwrap();
        for i in 0..14 {
            rsi.update(&bar(100.0 + i as f64));
        }
        assert!(!rsi.is_ready());
        assert!(rsi.value().is_none());

        rsi.update(&bar(115.0));
        assert!(rsi.is_ready());
        let value = rsi.value().unwrap();
        assert!((0.0..=100.0).contains(&value));
    }

    #[test]
    fn test_rsi_rejects_zero_period() {
        assert!(RSI::new(0).is_err());
    }
}
