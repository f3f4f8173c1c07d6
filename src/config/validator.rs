use crate::error::{AppError, Result};
use crate::fetch::request::template_placeholders;

use super::{Config, EndpointConfig, HttpConfig, RefreshConfig};

const HISTORY_PLACEHOLDERS: &[&str] = &["symbol", "days"];

/// Validate a loaded configuration and surface every problem at once.
pub fn validate_config(config: &Config) -> Result<()> {
    let mut issues = Vec::new();

    validate_endpoints(&config.endpoints, &mut issues);
    validate_refresh(&config.refresh, &mut issues);
    validate_http(&config.http, &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::message(format!(
            "configuration invalid:\n  - {}",
            issues.join("\n  - ")
        )))
    }
}

fn validate_endpoints(endpoints: &EndpointConfig, issues: &mut Vec<String>) {
    for (name, value) in [
        ("endpoints.binance_base", &endpoints.binance_base),
        ("endpoints.coingecko_base", &endpoints.coingecko_base),
        ("endpoints.icon_base", &endpoints.icon_base),
        ("endpoints.icon_fallback", &endpoints.icon_fallback),
    ] {
        check_url(name, value, issues);
    }

    if let Some(template) = &endpoints.history_url {
        check_url("endpoints.history_url", template, issues);
        match template_placeholders(template) {
            Ok(keys) => {
                for key in keys {
                    if !HISTORY_PLACEHOLDERS.contains(&key.as_str()) {
                        issues.push(format!(
                            "endpoints.history_url uses unknown placeholder `{{{key}}}`"
                        ));
                    }
                }
            }
            Err(err) => issues.push(format!("endpoints.history_url: {err}")),
        }
    }

    if let Some(url) = &endpoints.top_coins_url {
        check_url("endpoints.top_coins_url", url, issues);
    }
}

fn check_url(name: &str, value: &str, issues: &mut Vec<String>) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        issues.push(format!("{name} must not be empty"));
    } else if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        issues.push(format!("{name} must be an http(s) URL, got `{trimmed}`"));
    }
}

fn validate_refresh(refresh: &RefreshConfig, issues: &mut Vec<String>) {
    if refresh.coin_list_secs == 0 {
        issues.push("refresh.coin_list_secs must be greater than zero".to_string());
    }
    if refresh.top_coins == 0 {
        issues.push("refresh.top_coins must be greater than zero".to_string());
    }
    if refresh.all_coins == 0 {
        issues.push("refresh.all_coins must be greater than zero".to_string());
    }
    if refresh.top_coins > refresh.all_coins {
        issues.push(format!(
            "refresh.top_coins ({}) exceeds refresh.all_coins ({})",
            refresh.top_coins, refresh.all_coins
        ));
    }
}

fn validate_http(http: &HttpConfig, issues: &mut Vec<String>) {
    if http.timeout_secs == 0 {
        issues.push("http.timeout_secs must be greater than zero".to_string());
    }
    if http.user_agent.trim().is_empty() {
        issues.push("http.user_agent must not be empty".to_string());
    }
}
