use std::sync::Arc;

use log::info;

use crate::cli::Commands;
use crate::config::Config;
use crate::error::{FetchError, Result};
use crate::fetch::{MarketSource, TimeRange};
use crate::poll::{PollLoop, NO_DATA_NOTICE};
use crate::render::format::tooltip_label;
use crate::render::{price_summary, CoinCard, IconSet, StatsBanner};
use crate::ui::run_dashboard;

/// Routes a CLI command to the dashboard or to a one-shot report.
pub struct AppController {
    config: Config,
    source: Arc<dyn MarketSource>,
}

impl AppController {
    pub fn new(config: Config, source: Arc<dyn MarketSource>) -> Self {
        Self { config, source }
    }

    pub async fn run(&self, command: Commands) -> Result<()> {
        let lines = match command {
            Commands::Dashboard => {
                let mut poll = PollLoop::from_config(Arc::clone(&self.source), &self.config);
                return run_dashboard(&mut poll).await;
            }
            Commands::Coins { all } => self.coin_report(all).await?,
            Commands::Global => self.global_report().await?,
            Commands::History { symbol, days } => self.history_report(&symbol, &days).await?,
        };

        for line in lines {
            println!("{line}");
        }
        Ok(())
    }

    pub async fn coin_report(&self, all: bool) -> Result<Vec<String>> {
        let refresh = &self.config.refresh;
        let coins = if all {
            self.source.all_coins(refresh.all_coins).await?
        } else {
            self.source.top_coins(refresh.top_coins).await?
        };
        if coins.is_empty() {
            return Err(FetchError::empty("coin list").into());
        }
        info!("Fetched {} coins", coins.len());

        let icons = IconSet::from_endpoints(&self.config.endpoints);
        let mut lines = vec![format!(
            "{:<4} {:<8} {:>18} {:>9}  {:<18}  {}",
            "#", "Symbol", "Price", "24h", "Volume", "Icon"
        )];
        let mut fallback = None;
        for (rank, coin) in coins.iter().enumerate() {
            let card = CoinCard::build(coin, &icons);
            lines.push(format!(
                "{:<4} {:<8} {:>18} {:>9}  {:<18}  {}",
                rank + 1,
                card.symbol,
                card.price,
                card.change.text,
                card.volume.trim_start_matches("24h Volume: "),
                card.icon_url,
            ));
            fallback.get_or_insert(card.icon_fallback);
        }
        if let Some(fallback) = fallback {
            lines.push(format!("Missing icons fall back to {fallback}"));
        }
        Ok(lines)
    }

    pub async fn global_report(&self) -> Result<Vec<String>> {
        let stats = self.source.global_stats().await?;
        let banner = StatsBanner::build(&stats);
        Ok(vec![
            format!(
                "Total Market Cap: {} ({})",
                banner.total_market_cap, banner.market_cap_change.text
            ),
            format!(
                "24h Volume:       {} ({})",
                banner.total_volume, banner.volume_change.text
            ),
            format!(
                "BTC Dominance:    {} ({})",
                banner.btc_dominance, banner.dominance_change.text
            ),
        ])
    }

    pub async fn history_report(&self, symbol: &str, days: &str) -> Result<Vec<String>> {
        let symbol = symbol.trim().to_uppercase();
        let days = TimeRange::parse_lenient(days);
        let points = self.source.price_history(symbol.clone(), days).await?;

        let mut lines = vec![format!("{symbol}/USDT ({})", days.title_suffix())];
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            lines.push(NO_DATA_NOTICE.to_string());
            return Ok(lines);
        };

        lines.push(format!(
            "{} -> {} ({} points)",
            tooltip_label(first.timestamp_ms),
            tooltip_label(last.timestamp_ms),
            points.len()
        ));
        match price_summary(&points) {
            Some(summary) => {
                lines.push(format!("Current: {}", summary.current_price));
                lines.push(format!("Change:  {}", summary.change.text));
            }
            None => lines.push("Not enough data for a price summary.".to_string()),
        }
        Ok(lines)
    }
}
