use serde::{Deserialize, Serialize};

/// One sample of a time series, `timestamp_ms` is milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp_ms: i64,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp_ms: i64, price: f64) -> Self {
        Self {
            timestamp_ms,
            price,
        }
    }
}

/// Ticker summary for one coin as shown on a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinSummary {
    pub symbol: String,
    pub price: f64,
    pub volume: f64,
    pub price_change_percent: f64,
}

/// Aggregate market figures in USD.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalStats {
    pub total_market_cap: f64,
    pub market_cap_change_percent: f64,
    pub total_volume: f64,
    pub btc_dominance: f64,
    pub volume_change_percent: Option<f64>,
    pub dominance_change_percent: Option<f64>,
}

/// Which global figure the market chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    #[default]
    MarketCap,
    Volume,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::MarketCap, Metric::Volume];

    pub fn label(self) -> &'static str {
        match self {
            Metric::MarketCap => "Market Cap",
            Metric::Volume => "Volume",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Metric::MarketCap => "market_cap",
            Metric::Volume => "volume",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Strip the quote asset from a trading pair, `BTCUSDT` becomes `BTC`.
pub fn base_symbol(symbol: &str) -> &str {
    symbol.strip_suffix("USDT").unwrap_or(symbol)
}
