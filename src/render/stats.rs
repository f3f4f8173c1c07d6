use crate::fetch::GlobalStats;

use super::format::{format_usd_compact, BadgeText, FormatContext};

/// Text of the global market banner.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsBanner {
    pub total_market_cap: String,
    pub market_cap_change: BadgeText,
    pub total_volume: String,
    pub volume_change: BadgeText,
    pub btc_dominance: String,
    pub dominance_change: BadgeText,
}

impl StatsBanner {
    pub fn build(stats: &GlobalStats) -> Self {
        Self {
            total_market_cap: format_usd_compact(stats.total_market_cap, FormatContext::Summary),
            market_cap_change: BadgeText::change(stats.market_cap_change_percent),
            total_volume: format_usd_compact(stats.total_volume, FormatContext::Summary),
            volume_change: BadgeText::optional_change(stats.volume_change_percent),
            btc_dominance: format!("{:.1}%", stats.btc_dominance),
            dominance_change: BadgeText::optional_change(stats.dominance_change_percent),
        }
    }
}
