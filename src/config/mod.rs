use serde::{Deserialize, Serialize};

pub mod loader;
pub mod validator;

pub use validator::validate_config;

pub const DEFAULT_CONFIG_FILE: &str = "coin-dashboard.json";

/// Upstream endpoints. Optional URLs switch a surface to the application's own API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EndpointConfig {
    pub binance_base: String,
    pub coingecko_base: String,
    /// Template with `{symbol}` and `{days}` placeholders.
    pub history_url: Option<String>,
    pub top_coins_url: Option<String>,
    pub icon_base: String,
    pub icon_fallback: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            binance_base: "https://api.binance.com/api/v3".to_string(),
            coingecko_base: "https://api.coingecko.com/api/v3".to_string(),
            history_url: None,
            top_coins_url: None,
            icon_base:
                "https://raw.githubusercontent.com/spothq/cryptocurrency-icons/master/128/color"
                    .to_string(),
            icon_fallback:
                "https://raw.githubusercontent.com/spothq/cryptocurrency-icons/master/128/icon/generic.png"
                    .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RefreshConfig {
    pub coin_list_secs: u64,
    pub top_coins: usize,
    pub all_coins: usize,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            coin_list_secs: 30,
            top_coins: 9,
            all_coins: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("coin-dashboard/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub endpoints: EndpointConfig,
    pub refresh: RefreshConfig,
    pub http: HttpConfig,
}

impl Config {
    pub fn coin_list_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.refresh.coin_list_secs)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.http.timeout_secs)
    }
}
