pub mod chart;
pub mod format;
pub mod list;
pub mod stats;

pub use chart::{
    price_summary, render_chart, ChartConfig, ChartRender, ChartSurface, ChartWidget,
    PriceSummary, ValueAxis,
};
pub use format::{axis_label, format_usd_compact, Badge, BadgeText, FormatContext};
pub use list::{render_list, CardContainer, CoinCard, ContainerContent, IconSet};
pub use stats::StatsBanner;

pub const CHART_ERROR_MESSAGE: &str = "Unable to load chart data. Please try again later.";
pub const LIST_ERROR_MESSAGE: &str = "Unable to load cryptocurrency data. Please try again later.";
pub const STATS_ERROR_MESSAGE: &str = "Unable to load market statistics.";
pub const DETAIL_ERROR_MESSAGE: &str = "Failed to load data";
pub const DETAIL_LOADING_MESSAGE: &str = "Loading data...";
