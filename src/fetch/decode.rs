use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::FetchError;

use super::model::{CoinSummary, GlobalStats, Metric, PricePoint};
use super::FetchResult;

pub const QUOTE_ASSET: &str = "USDT";

/// Entry of Binance `GET /ticker/24hr`; numeric fields arrive as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceTicker {
    pub symbol: String,
    pub last_price: String,
    pub quote_volume: String,
    pub price_change_percent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GlobalEnvelope {
    pub data: GlobalData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GlobalData {
    pub total_market_cap: Option<HashMap<String, Value>>,
    pub total_volume: Option<HashMap<String, Value>>,
    pub market_cap_percentage: Option<HashMap<String, Value>>,
    pub market_cap_change_percentage_24h_usd: Option<Value>,
    pub volume_change_percentage_24h_usd: Option<Value>,
    pub dominance_change_percentage_24h: Option<Value>,
}

/// Entry of CoinGecko `GET /coins/markets`.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinGeckoMarket {
    pub symbol: String,
    pub current_price: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub total_volume: Option<f64>,
}

/// Body of the application's `market-history` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEnvelope {
    pub prices: Vec<Vec<Value>>,
}

/// Keep USDT pairs, rank by quote volume and cut the list to `limit` entries.
pub fn rank_usdt_tickers(tickers: Vec<BinanceTicker>, limit: usize) -> FetchResult<Vec<CoinSummary>> {
    if tickers.is_empty() {
        return Err(FetchError::empty("24h ticker"));
    }

    let mut coins = tickers
        .into_iter()
        .filter(|ticker| ticker.symbol.ends_with(QUOTE_ASSET))
        .map(|ticker| {
            Ok(CoinSummary {
                price: parse_decimal(&ticker.symbol, "lastPrice", &ticker.last_price)?,
                volume: parse_decimal(&ticker.symbol, "quoteVolume", &ticker.quote_volume)?,
                price_change_percent: parse_decimal(
                    &ticker.symbol,
                    "priceChangePercent",
                    &ticker.price_change_percent,
                )?,
                symbol: ticker.symbol,
            })
        })
        .collect::<FetchResult<Vec<_>>>()?;

    if coins.is_empty() {
        return Err(FetchError::empty("24h ticker (USDT pairs)"));
    }

    coins.sort_by(|a, b| b.volume.partial_cmp(&a.volume).unwrap_or(Ordering::Equal));
    coins.truncate(limit);
    Ok(coins)
}

/// Take the first `limit` entries of a pre-ranked list in server order.
pub fn take_ranked(coins: Vec<CoinSummary>, limit: usize, source: &str) -> FetchResult<Vec<CoinSummary>> {
    if coins.is_empty() {
        return Err(FetchError::empty(source));
    }
    Ok(coins.into_iter().take(limit).collect())
}

pub fn coingecko_markets(markets: Vec<CoinGeckoMarket>, limit: usize) -> FetchResult<Vec<CoinSummary>> {
    if markets.is_empty() {
        return Err(FetchError::empty("coin markets"));
    }

    markets
        .into_iter()
        .take(limit)
        .map(|market| {
            let field = |name: &str, value: Option<f64>| {
                value.ok_or_else(|| {
                    FetchError::format(format!("{} is missing `{name}`", market.symbol))
                })
            };
            Ok(CoinSummary {
                price: field("current_price", market.current_price)?,
                volume: field("total_volume", market.total_volume)?,
                price_change_percent: field(
                    "price_change_percentage_24h",
                    market.price_change_percentage_24h,
                )?,
                symbol: market.symbol.to_uppercase(),
            })
        })
        .collect()
}

impl GlobalData {
    pub fn into_stats(self) -> FetchResult<GlobalStats> {
        Ok(GlobalStats {
            total_market_cap: keyed_usd(&self.total_market_cap, "total_market_cap")?,
            market_cap_change_percent: required_number(
                &self.market_cap_change_percentage_24h_usd,
                "market_cap_change_percentage_24h_usd",
            )?,
            total_volume: keyed_usd(&self.total_volume, "total_volume")?,
            btc_dominance: keyed(&self.market_cap_percentage, "market_cap_percentage", "btc")?,
            volume_change_percent: optional_number(&self.volume_change_percentage_24h_usd),
            dominance_change_percent: optional_number(&self.dominance_change_percentage_24h),
        })
    }

    /// USD figure backing the market chart for `metric`.
    pub fn metric_value(&self, metric: Metric) -> FetchResult<f64> {
        match metric {
            Metric::MarketCap => keyed_usd(&self.total_market_cap, "total_market_cap"),
            Metric::Volume => keyed_usd(&self.total_volume, "total_volume"),
        }
    }
}

pub fn klines_to_points(rows: Vec<Vec<Value>>) -> FetchResult<Vec<PricePoint>> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let timestamp_ms = row
                .first()
                .and_then(as_timestamp)
                .ok_or_else(|| FetchError::format(format!("kline {idx} has no open time")))?;
            let price = row
                .get(4)
                .and_then(as_number)
                .ok_or_else(|| FetchError::format(format!("kline {idx} has no close price")))?;
            Ok(PricePoint::new(timestamp_ms, price))
        })
        .collect()
}

pub fn history_to_points(envelope: HistoryEnvelope) -> FetchResult<Vec<PricePoint>> {
    let mut points = envelope
        .prices
        .into_iter()
        .enumerate()
        .map(|(idx, pair)| match pair.as_slice() {
            [ts, price] => match (as_timestamp(ts), as_number(price)) {
                (Some(ts), Some(price)) => Ok(PricePoint::new(ts, price)),
                _ => Err(FetchError::format(format!("price point {idx} is not numeric"))),
            },
            _ => Err(FetchError::format(format!(
                "price point {idx} must be a [timestamp, price] pair"
            ))),
        })
        .collect::<FetchResult<Vec<_>>>()?;

    points.sort_by_key(|point| point.timestamp_ms);
    Ok(points)
}

fn keyed_usd(map: &Option<HashMap<String, Value>>, field: &str) -> FetchResult<f64> {
    keyed(map, field, "usd")
}

fn keyed(map: &Option<HashMap<String, Value>>, field: &str, key: &str) -> FetchResult<f64> {
    let map = map
        .as_ref()
        .ok_or_else(|| FetchError::format(format!("missing `{field}`")))?;
    map.get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| FetchError::format(format!("`{field}.{key}` is missing or not a number")))
}

fn required_number(value: &Option<Value>, field: &str) -> FetchResult<f64> {
    optional_number(value)
        .ok_or_else(|| FetchError::format(format!("`{field}` is missing or not a number")))
}

fn optional_number(value: &Option<Value>) -> Option<f64> {
    value.as_ref().and_then(Value::as_f64)
}

fn as_number(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
}

fn as_timestamp(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|ts| ts as i64))
}

fn parse_decimal(symbol: &str, field: &str, raw: &str) -> FetchResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| FetchError::format(format!("{symbol}: `{field}` is not a number: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::request::decode_json;

    fn ticker(symbol: &str, price: &str, volume: &str, change: &str) -> BinanceTicker {
        BinanceTicker {
            symbol: symbol.to_string(),
            last_price: price.to_string(),
            quote_volume: volume.to_string(),
            price_change_percent: change.to_string(),
        }
    }

    #[test]
    fn ranks_usdt_pairs_by_volume() {
        let tickers = vec![
            ticker("ETHUSDT", "3000.5", "500", "1.2"),
            ticker("ETHBTC", "0.05", "99999", "0.1"),
            ticker("BTCUSDT", "65000", "900", "-0.4"),
            ticker("DOGEUSDT", "0.12", "100", "5"),
        ];

        let coins = rank_usdt_tickers(tickers, 2).unwrap();
        let symbols: Vec<&str> = coins.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, ["BTCUSDT", "ETHUSDT"]);
        assert!((coins[0].price_change_percent + 0.4).abs() < 1e-9);
    }

    #[test]
    fn empty_ticker_list_is_empty_result() {
        let err = rank_usdt_tickers(Vec::new(), 9).expect_err("should fail");
        assert!(err.is_empty_result());

        let err = rank_usdt_tickers(vec![ticker("ETHBTC", "1", "1", "1")], 9)
            .expect_err("no USDT pairs");
        assert!(err.is_empty_result());
    }

    #[test]
    fn malformed_ticker_fails_whole_fetch() {
        let tickers = vec![
            ticker("BTCUSDT", "65000", "900", "1"),
            ticker("ETHUSDT", "n/a", "500", "1"),
        ];
        let err = rank_usdt_tickers(tickers, 9).expect_err("should fail");
        assert!(matches!(err, FetchError::Format(_)), "{err:?}");
    }

    #[test]
    fn decodes_global_stats_with_optional_fields_absent() {
        let body = r#"{
            "data": {
                "total_market_cap": { "usd": 2400000000000.0, "eur": 2200000000000.0 },
                "total_volume": { "usd": 95000000000.0 },
                "market_cap_percentage": { "btc": 52.31, "eth": 17.0 },
                "market_cap_change_percentage_24h_usd": -1.25
            }
        }"#;

        let envelope: GlobalEnvelope = decode_json("global", body).unwrap();
        let stats = envelope.data.into_stats().unwrap();
        assert_eq!(stats.total_market_cap, 2.4e12);
        assert_eq!(stats.btc_dominance, 52.31);
        assert_eq!(stats.volume_change_percent, None);
        assert_eq!(stats.dominance_change_percent, None);
    }

    #[test]
    fn missing_market_cap_figure_is_format_error() {
        let body = r#"{ "data": { "total_market_cap": { "usd": "lots" }, "total_volume": { "usd": 1.0 } } }"#;
        let envelope: GlobalEnvelope = decode_json("global", body).unwrap();

        let err = envelope
            .data
            .metric_value(Metric::MarketCap)
            .expect_err("string figure rejected");
        assert!(matches!(err, FetchError::Format(_)), "{err:?}");
        assert_eq!(envelope.data.metric_value(Metric::Volume).unwrap(), 1.0);
    }

    #[test]
    fn decodes_klines_close_prices() {
        let body = r#"[
            [1700000000000, "35000.1", "35100", "34900", "35050.5", "12.3", 1700000059999],
            [1700000060000, "35050.5", "35200", "35000", "35150.0", "8.1", 1700000119999]
        ]"#;
        let rows: Vec<Vec<Value>> = decode_json("klines", body).unwrap();
        let points = klines_to_points(rows).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0], PricePoint::new(1_700_000_000_000, 35050.5));
        assert_eq!(points[1].price, 35150.0);
    }

    #[test]
    fn history_points_are_sorted_by_timestamp() {
        let body = r#"{ "prices": [[1700000060000, 2.0], [1700000000000, 1.0]] }"#;
        let envelope: HistoryEnvelope = decode_json("history", body).unwrap();
        let points = history_to_points(envelope).unwrap();

        assert_eq!(points[0].price, 1.0);
        assert_eq!(points[1].price, 2.0);
    }

    #[test]
    fn coingecko_missing_price_fails() {
        let body = r#"[
            { "symbol": "btc", "current_price": 65000.0, "price_change_percentage_24h": 1.0, "total_volume": 3.0 },
            { "symbol": "new", "current_price": null, "price_change_percentage_24h": 1.0, "total_volume": 3.0 }
        ]"#;
        let markets: Vec<CoinGeckoMarket> = decode_json("markets", body).unwrap();

        let ok = coingecko_markets(markets.clone(), 1).unwrap();
        assert_eq!(ok[0].symbol, "BTC");

        let err = coingecko_markets(markets, 100).expect_err("null price rejected");
        assert!(matches!(err, FetchError::Format(_)), "{err:?}");
    }
}
