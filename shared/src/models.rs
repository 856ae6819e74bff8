use std::fmt;

use serde::{Deserialize, Serialize};

/// Interface languages offered in the language picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
    De,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Ru, Language::De];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
            Language::De => "de",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.code() == code)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Asset categories shown after the access gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Currencies,
    Crypto,
    Stocks,
    Indices,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Currencies,
        Category::Crypto,
        Category::Stocks,
        Category::Indices,
    ];

    /// Tradable symbols under this category, in menu order.
    pub fn assets(&self) -> &'static [&'static str] {
        match self {
            Category::Currencies => &[
                "EUR/USD", "GBP/USD", "USD/JPY", "AUD/USD", "USD/CAD",
                "USD/CHF", "NZD/USD", "EUR/GBP", "EUR/JPY", "GBP/JPY",
            ],
            Category::Crypto => &[
                "BTC/USDT", "ETH/USDT", "BNB/USDT", "XRP/USDT", "SOL/USDT",
                "ADA/USDT", "DOGE/USDT", "DOT/USDT", "MATIC/USDT", "AVAX/USDT",
            ],
            Category::Stocks => &[
                "AAPL", "TSLA", "MSFT", "AMZN", "GOOGL",
                "META", "NVDA", "TSM", "AMD", "INTC",
            ],
            Category::Indices => &[
                "US500", "USTEC", "US30", "GER30", "UK100",
                "JP225", "HK50", "AUS200", "EU50", "BRENT",
            ],
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.assets().contains(&symbol)
    }
}

/// Returns the catalog's own `'static` spelling of `symbol`, if listed anywhere.
pub fn find_asset(symbol: &str) -> Option<&'static str> {
    Category::ALL
        .iter()
        .flat_map(|c| c.assets().iter().copied())
        .find(|a| *a == symbol)
}

/// Analysis timeframes offered for a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "30s")]
    Sec30,
    #[serde(rename = "1m")]
    Min1,
    #[serde(rename = "2m")]
    Min2,
    #[serde(rename = "3m")]
    Min3,
    #[serde(rename = "5m")]
    Min5,
}

impl Timeframe {
    pub const ALL: [Timeframe; 5] = [
        Timeframe::Sec30,
        Timeframe::Min1,
        Timeframe::Min2,
        Timeframe::Min3,
        Timeframe::Min5,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Timeframe::Sec30 => "30s",
            Timeframe::Min1 => "1m",
            Timeframe::Min2 => "2m",
            Timeframe::Min3 => "3m",
            Timeframe::Min5 => "5m",
        }
    }

    pub fn seconds(&self) -> u64 {
        match self {
            Timeframe::Sec30 => 30,
            Timeframe::Min1 => 60,
            Timeframe::Min2 => 120,
            Timeframe::Min3 => 180,
            Timeframe::Min5 => 300,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
