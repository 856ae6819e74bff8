//! Signal scoring
//!
//! Turns a market dataset into a BUY/SELL call with a short analysis.

pub mod engine;
pub mod readings;

pub use engine::*;
pub use readings::*;

use std::fmt;

/// Recommended trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closing remark attached to a signal; rendered through the locale table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conclusion {
    StrongBuy,
    StrongSell,
    GeneratedBuy,
    GeneratedSell,
}

/// Outcome of one scoring run. Never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalResult {
    pub direction: Direction,
    pub buy_score: u32,
    pub sell_score: u32,
    pub analysis: Vec<String>,
    /// Set when the direction was drawn at random for lack of data.
    pub fallback: bool,
}

impl SignalResult {
    pub fn conclusion(&self) -> Conclusion {
        match (self.direction, self.fallback) {
            (Direction::Buy, false) => Conclusion::StrongBuy,
            (Direction::Sell, false) => Conclusion::StrongSell,
            (Direction::Buy, true) => Conclusion::GeneratedBuy,
            (Direction::Sell, true) => Conclusion::GeneratedSell,
        }
    }

    pub fn analysis_text(&self) -> String {
        self.analysis.join("\n")
    }
}
