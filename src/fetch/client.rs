use std::collections::HashMap;

use chrono::Utc;
use futures::future::{BoxFuture, FutureExt};
use log::{debug, info};
use serde_json::Value;

use crate::config::{Config, EndpointConfig};
use crate::error::{FetchError, Result};

use super::decode::{
    self, BinanceTicker, CoinGeckoMarket, GlobalEnvelope, HistoryEnvelope, QUOTE_ASSET,
};
use super::market_chart::synthesize_series;
use super::model::{CoinSummary, GlobalStats, Metric, PricePoint};
use super::range::{kline_interval_for_days, kline_rows_for_days, DayCount};
use super::request::{render_template, HttpClient};
use super::{FetchResult, MarketSource};

const KLINE_LIMIT: u32 = 1000;
const DAY_MS: i64 = 86_400_000;

/// `MarketSource` backed by Binance, CoinGecko and the optional application endpoints.
pub struct MarketClient {
    http: HttpClient,
    endpoints: EndpointConfig,
}

impl MarketClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = HttpClient::new(&config.http.user_agent, config.request_timeout())?;
        Ok(Self {
            http,
            endpoints: config.endpoints.clone(),
        })
    }

    fn binance_url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoints.binance_base.trim_end_matches('/'), path)
    }

    fn coingecko_url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoints.coingecko_base.trim_end_matches('/'), path)
    }

    async fn fetch_top_coins(&self, limit: usize) -> FetchResult<Vec<CoinSummary>> {
        if let Some(url) = &self.endpoints.top_coins_url {
            let coins: Vec<CoinSummary> = self.http.get_json(url, &[]).await?;
            return decode::take_ranked(coins, limit, url);
        }

        let url = self.binance_url("ticker/24hr");
        let tickers: Vec<BinanceTicker> = self.http.get_json(&url, &[]).await?;
        let coins = decode::rank_usdt_tickers(tickers, limit)?;
        debug!("Ranked {} USDT pairs", coins.len());
        Ok(coins)
    }

    async fn fetch_all_coins(&self, limit: usize) -> FetchResult<Vec<CoinSummary>> {
        let url = self.coingecko_url("coins/markets");
        let query = [
            ("vs_currency", "usd".to_string()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", limit.to_string()),
            ("page", "1".to_string()),
        ];
        let markets: Vec<CoinGeckoMarket> = self.http.get_json(&url, &query).await?;
        decode::coingecko_markets(markets, limit)
    }

    async fn fetch_global(&self) -> FetchResult<GlobalEnvelope> {
        let url = self.coingecko_url("global");
        self.http.get_json(&url, &[]).await
    }

    async fn fetch_market_chart(&self, metric: Metric, days: DayCount) -> FetchResult<Vec<PricePoint>> {
        let envelope = self.fetch_global().await?;
        let latest = envelope.data.metric_value(metric)?;
        Ok(synthesize_series(latest, days, Utc::now().timestamp_millis()))
    }

    async fn fetch_price_history(&self, symbol: &str, days: DayCount) -> FetchResult<Vec<PricePoint>> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(FetchError::format("symbol must not be empty"));
        }

        if let Some(template) = &self.endpoints.history_url {
            let replacements = HashMap::from([
                ("symbol", symbol.clone()),
                ("days", days.days().to_string()),
            ]);
            let url = render_template(template, &replacements)
                .map_err(|err| FetchError::format(err.to_string()))?;
            let envelope: HistoryEnvelope = self.http.get_json(&url, &[]).await?;
            return decode::history_to_points(envelope);
        }

        let url = self.binance_url("klines");
        let query = kline_query(&symbol, days.days(), Utc::now().timestamp_millis());
        let rows: Vec<Vec<Value>> = self.http.get_json(&url, &query).await?;
        let points = decode::klines_to_points(rows)?;
        info!("Fetched {} price points for {}", points.len(), symbol);
        Ok(points)
    }
}

/// Query for Binance klines ending at `end_ms`.
///
/// Binance fills `limit` rows forward from `startTime`, so it is only sent when
/// the whole window fits; longer windows keep the newest `KLINE_LIMIT` candles.
fn kline_query(symbol: &str, days: u32, end_ms: i64) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("symbol", format!("{symbol}{QUOTE_ASSET}")),
        ("interval", kline_interval_for_days(days).to_string()),
        ("endTime", end_ms.to_string()),
        ("limit", KLINE_LIMIT.to_string()),
    ];
    if kline_rows_for_days(days) <= u64::from(KLINE_LIMIT) {
        let start_ms = end_ms - i64::from(days) * DAY_MS;
        query.push(("startTime", start_ms.to_string()));
    }
    query
}

impl MarketSource for MarketClient {
    fn top_coins(&self, limit: usize) -> BoxFuture<'_, FetchResult<Vec<CoinSummary>>> {
        self.fetch_top_coins(limit).boxed()
    }

    fn all_coins(&self, limit: usize) -> BoxFuture<'_, FetchResult<Vec<CoinSummary>>> {
        self.fetch_all_coins(limit).boxed()
    }

    fn global_stats(&self) -> BoxFuture<'_, FetchResult<GlobalStats>> {
        async move { self.fetch_global().await?.data.into_stats() }.boxed()
    }

    fn market_chart(
        &self,
        metric: Metric,
        days: DayCount,
    ) -> BoxFuture<'_, FetchResult<Vec<PricePoint>>> {
        self.fetch_market_chart(metric, days).boxed()
    }

    fn price_history(
        &self,
        symbol: String,
        days: DayCount,
    ) -> BoxFuture<'_, FetchResult<Vec<PricePoint>>> {
        async move { self.fetch_price_history(&symbol, days).await }.boxed()
    }
}
