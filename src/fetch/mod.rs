use futures::future::BoxFuture;

use crate::error::FetchError;

pub mod client;
pub mod decode;
pub mod market_chart;
pub mod model;
pub mod range;
pub mod request;
#[cfg(test)]
pub(crate) mod test_server;

pub use client::MarketClient;
pub use model::{base_symbol, CoinSummary, GlobalStats, Metric, PricePoint};
pub use range::{DayCount, TimeRange};

pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Market data endpoints consumed by the dashboard surfaces.
///
/// Every call is lazy: nothing is sent until the returned future is polled.
pub trait MarketSource: Send + Sync {
    /// Top USDT pairs ranked by 24h quote volume.
    fn top_coins(&self, limit: usize) -> BoxFuture<'_, FetchResult<Vec<CoinSummary>>>;

    /// Coins ranked by market cap.
    fn all_coins(&self, limit: usize) -> BoxFuture<'_, FetchResult<Vec<CoinSummary>>>;

    fn global_stats(&self) -> BoxFuture<'_, FetchResult<GlobalStats>>;

    fn market_chart(
        &self,
        metric: Metric,
        days: DayCount,
    ) -> BoxFuture<'_, FetchResult<Vec<PricePoint>>>;

    /// Closing prices for `symbol` (base asset, e.g. `BTC`), oldest first.
    fn price_history(
        &self,
        symbol: String,
        days: DayCount,
    ) -> BoxFuture<'_, FetchResult<Vec<PricePoint>>>;
}
