//! ATR (Average True Range) indicator

use crate::indicators::{Bar, Indicator, IndicatorError};
use ta::indicators::AverageTrueRange;
use ta::Next;

/// ATR indicator wrapper. Unlike the close-driven indicators it reads the
/// full bar, since true range needs high, low and the previous close.
#[derive(Debug, Clone)]
pub struct ATR {
    inner: AverageTrueRange,
    period: usize,
    update_count: usize,
    last_value: Option<f64>,
}

impl ATR {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        Ok(Self {
            inner: AverageTrueRange::new(period)
                .map_err(|e| IndicatorError::invalid("ATR", e))?,
            period,
            update_count: 0,
            last_value: None,
        })
    }
}

impl Indicator for ATR {
    fn name(&self) -> &str {
        "ATR"
    }

    fn update(&mut self, bar: &Bar) {
        let atr_value = self.inner.next(bar);
        self.update_count += 1;
        if self.update_count >= self.period {
            self.last_value = Some(atr_value);
        }
    }

    fn value(&self) -> Option<f64> {
        self.last_value
    }

    fn is_ready(&self) -> bool {
        self.update_count >= self.period
    }
}
