use log::{debug, info, warn};

use crate::error::FetchError;
use crate::fetch::{CoinSummary, GlobalStats, Metric, PricePoint, TimeRange};
use crate::render::{
    price_summary, render_chart, render_list, CardContainer, ChartConfig, ChartRender,
    ChartSurface, ChartWidget, ContainerContent, IconSet, PriceSummary, StatsBanner, ValueAxis,
    CHART_ERROR_MESSAGE, DETAIL_ERROR_MESSAGE, DETAIL_LOADING_MESSAGE, LIST_ERROR_MESSAGE,
    STATS_ERROR_MESSAGE,
};

use super::surface::{SurfaceKind, SurfaceState};

pub const NO_DATA_NOTICE: &str = "No data available for this range.";

/// Metric and range the market chart is showing or about to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChartSelection {
    pub metric: Metric,
    pub range: TimeRange,
}

impl ChartSelection {
    pub fn chart_config(self, points: Vec<PricePoint>) -> ChartConfig {
        let label = self.metric.label();
        ChartConfig {
            title: format!("Total Crypto {} ({})", label, self.range.title_suffix()),
            series_name: label.to_string(),
            y_axis_title: format!("{label} (USD)"),
            value_axis: ValueAxis::CompactUsd,
            range: self.range,
            points,
        }
    }
}

/// Which coin listing the card container shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListView {
    #[default]
    Top,
    All,
}

impl ListView {
    pub fn toggle(self) -> Self {
        match self {
            ListView::Top => ListView::All,
            ListView::All => ListView::Top,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ListView::Top => "Top Traded (24h volume)",
            ListView::All => "Top 100 by Market Cap",
        }
    }
}

/// Successful fetch result tagged with the request parameters it answers.
#[derive(Debug, Clone)]
pub enum Payload {
    Stats(GlobalStats),
    Chart {
        selection: ChartSelection,
        points: Vec<PricePoint>,
    },
    Coins {
        view: ListView,
        coins: Vec<CoinSummary>,
    },
    Detail {
        symbol: String,
        range: TimeRange,
        points: Vec<PricePoint>,
    },
}

/// Resolution of one poll cycle as posted back by its task.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub surface: SurfaceKind,
    pub cycle: u64,
    /// Generation of the detail panel the cycle was started for.
    pub panel: Option<u64>,
    pub result: Result<Payload, FetchError>,
}

impl CycleOutcome {
    pub fn new(surface: SurfaceKind, cycle: u64, result: Result<Payload, FetchError>) -> Self {
        Self {
            surface,
            cycle,
            panel: None,
            result,
        }
    }

    pub fn for_panel(mut self, generation: u64) -> Self {
        self.panel = Some(generation);
        self
    }
}

/// Price chart for a single coin.
#[derive(Debug, Default)]
pub struct DetailPanel {
    pub symbol: String,
    /// Bumped every time a panel is opened; stale outcomes carry an older value.
    pub generation: u64,
    pub range: TimeRange,
    pub surface: SurfaceState,
    pub chart: ChartWidget,
    pub summary: Option<PriceSummary>,
}

impl DetailPanel {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    pub fn chart_config(&self, points: Vec<PricePoint>) -> ChartConfig {
        ChartConfig {
            title: format!("{} Price ({})", self.symbol, self.range.title_suffix()),
            series_name: "Price".to_string(),
            y_axis_title: "Price (USD)".to_string(),
            value_axis: ValueAxis::Price,
            range: self.range,
            points,
        }
    }
}

/// Render state of every surface, owned by the poll loop.
#[derive(Debug)]
pub struct DashboardState {
    pub stats: SurfaceState,
    pub banner: Option<StatsBanner>,
    pub chart: SurfaceState,
    pub chart_widget: ChartWidget,
    pub shown_selection: Option<ChartSelection>,
    pub coins: SurfaceState,
    pub cards: CardContainer,
    pub shown_view: ListView,
    pub detail: Option<DetailPanel>,
    icons: IconSet,
    next_panel: u64,
}

impl DashboardState {
    pub fn new(icons: IconSet) -> Self {
        Self {
            stats: SurfaceState::default(),
            banner: None,
            chart: SurfaceState::default(),
            chart_widget: ChartWidget::default(),
            shown_selection: None,
            coins: SurfaceState::default(),
            cards: CardContainer::default(),
            shown_view: ListView::default(),
            detail: None,
            icons,
            next_panel: 0,
        }
    }

    /// Show `panel`, replacing any open one. Outcomes for the old panel are ignored from now on.
    pub fn open_detail(&mut self, mut panel: DetailPanel) -> &DetailPanel {
        panel.generation = self.next_panel;
        self.next_panel += 1;
        self.detail.insert(panel)
    }

    pub fn surface(&self, kind: SurfaceKind) -> Option<&SurfaceState> {
        match kind {
            SurfaceKind::Stats => Some(&self.stats),
            SurfaceKind::Chart => Some(&self.chart),
            SurfaceKind::CoinList => Some(&self.coins),
            SurfaceKind::Detail => self.detail.as_ref().map(|detail| &detail.surface),
        }
    }

    /// Move a surface into `Fetching`; returns `None` when the surface does not exist.
    pub fn begin(&mut self, kind: SurfaceKind) -> Option<u64> {
        let cycle = match kind {
            SurfaceKind::Stats => self.stats.begin(),
            SurfaceKind::Chart => self.chart.begin(),
            SurfaceKind::CoinList => {
                self.cards.show_loading();
                self.coins.begin()
            }
            SurfaceKind::Detail => {
                let detail = self.detail.as_mut()?;
                if detail.chart.has_instance() {
                    detail.chart.show_loading(DETAIL_LOADING_MESSAGE);
                }
                detail.surface.begin()
            }
        };
        debug!("{kind} cycle {cycle} started");
        Some(cycle)
    }

    /// Apply a resolved cycle. Failures only touch the surface that produced them.
    pub fn apply(&mut self, outcome: CycleOutcome) {
        let CycleOutcome {
            surface,
            cycle,
            panel,
            result,
        } = outcome;

        if surface == SurfaceKind::Detail
            && (panel.is_none() || self.detail.as_ref().map(|d| d.generation) != panel)
        {
            debug!("Dropping detail cycle {cycle}; panel closed or switched");
            return;
        }

        match result {
            Ok(payload) => self.apply_payload(surface, cycle, payload),
            Err(err) => {
                warn!("{surface} cycle {cycle} failed: {err}");
                self.apply_failure(surface, cycle, err);
            }
        }
    }

    fn apply_payload(&mut self, surface: SurfaceKind, cycle: u64, payload: Payload) {
        match payload {
            Payload::Stats(stats) => {
                self.banner = Some(StatsBanner::build(&stats));
                self.stats.rendered(cycle, None);
            }
            Payload::Chart { selection, points } => {
                let config = selection.chart_config(points);
                match render_chart(&mut self.chart_widget, config) {
                    ChartRender::NoData => {
                        info!("Chart cycle {cycle} returned no data");
                        self.chart.rendered(cycle, Some(NO_DATA_NOTICE.to_string()));
                    }
                    _ => {
                        self.shown_selection = Some(selection);
                        self.chart.rendered(cycle, None);
                    }
                }
            }
            Payload::Coins { view, coins } => {
                if coins.is_empty() {
                    self.apply_failure(surface, cycle, FetchError::empty("coin list"));
                    return;
                }
                render_list(&mut self.cards, &coins, &self.icons);
                self.shown_view = view;
                info!("Rendered {} coin cards", coins.len());
                self.coins.rendered(cycle, None);
            }
            Payload::Detail {
                symbol,
                range,
                points,
            } => {
                let Some(detail) = self.detail.as_mut().filter(|d| d.symbol == symbol) else {
                    return;
                };
                detail.range = range;
                let summary = price_summary(&points);
                let config = detail.chart_config(points);
                match render_chart(&mut detail.chart, config) {
                    ChartRender::NoData => {
                        detail
                            .surface
                            .rendered(cycle, Some(NO_DATA_NOTICE.to_string()));
                    }
                    _ => {
                        if summary.is_some() {
                            detail.summary = summary;
                        }
                        detail.surface.rendered(cycle, None);
                    }
                }
            }
        }
    }

    fn apply_failure(&mut self, surface: SurfaceKind, cycle: u64, err: FetchError) {
        match surface {
            SurfaceKind::Stats => self.stats.failed(cycle, STATS_ERROR_MESSAGE, false),
            SurfaceKind::Chart => self.chart.failed(cycle, CHART_ERROR_MESSAGE, false),
            SurfaceKind::CoinList => {
                let content = if err.is_empty_result() {
                    ContainerContent::Empty(crate::render::list::EMPTY_MESSAGE.to_string())
                } else {
                    ContainerContent::Error {
                        message: LIST_ERROR_MESSAGE.to_string(),
                        retry: true,
                    }
                };
                self.cards.replace(content);
                self.coins.failed(cycle, LIST_ERROR_MESSAGE, true);
            }
            SurfaceKind::Detail => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.chart.hide_loading();
                    detail.chart.show_loading(DETAIL_ERROR_MESSAGE);
                    detail.surface.failed(cycle, DETAIL_ERROR_MESSAGE, false);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointConfig;
    use crate::poll::surface::SurfacePhase;

    fn state() -> DashboardState {
        DashboardState::new(IconSet::from_endpoints(&EndpointConfig::default()))
    }

    fn points(n: i64) -> Vec<PricePoint> {
        (0..n).map(|i| PricePoint::new(i * 60_000, 100.0 + i as f64)).collect()
    }

    fn history(symbol: &str, n: i64) -> Result<Payload, FetchError> {
        Ok(Payload::Detail {
            symbol: symbol.to_string(),
            range: TimeRange::Week,
            points: points(n),
        })
    }

    /// Begin a detail cycle on the open panel, returning the cycle and panel generation.
    fn begin_detail(state: &mut DashboardState) -> (u64, u64) {
        let cycle = state.begin(SurfaceKind::Detail).unwrap();
        (cycle, state.detail.as_ref().unwrap().generation)
    }

    #[test]
    fn chart_failure_leaves_widget_untouched() {
        let mut state = state();
        let cycle = state.begin(SurfaceKind::Chart).unwrap();
        state.apply(CycleOutcome::new(
            SurfaceKind::Chart,
            cycle,
            Err(FetchError::network("connection refused")),
        ));

        assert_eq!(state.chart.error_message(), Some(CHART_ERROR_MESSAGE));
        assert!(!state.chart_widget.has_instance());
        assert_eq!(state.shown_selection, None);
        assert_eq!(state.stats.phase(), &SurfacePhase::Idle);
    }

    #[test]
    fn chart_title_reflects_selection() {
        let selection = ChartSelection {
            metric: Metric::MarketCap,
            range: TimeRange::Month,
        };
        let config = selection.chart_config(points(2));
        assert_eq!(config.title, "Total Crypto Market Cap (Last 30 Days)");
        assert_eq!(config.y_axis_title, "Market Cap (USD)");
    }

    #[test]
    fn empty_coin_list_shows_empty_state_with_retry() {
        let mut state = state();
        let cycle = state.begin(SurfaceKind::CoinList).unwrap();
        state.apply(CycleOutcome::new(
            SurfaceKind::CoinList,
            cycle,
            Ok(Payload::Coins {
                view: ListView::Top,
                coins: Vec::new(),
            }),
        ));

        assert!(matches!(state.cards.content(), ContainerContent::Empty(_)));
        assert!(state.coins.can_retry());
    }

    #[test]
    fn detail_failure_shows_overlay_and_keeps_chart() {
        let mut state = state();
        state.open_detail(DetailPanel::new("BTC"));

        let (first, panel) = begin_detail(&mut state);
        let outcome = CycleOutcome::new(SurfaceKind::Detail, first, history("BTC", 5));
        state.apply(outcome.for_panel(panel));
        let before = state.detail.as_ref().unwrap().chart.instance().cloned();

        let (second, panel) = begin_detail(&mut state);
        assert_eq!(
            state.detail.as_ref().unwrap().chart.loading_message(),
            Some(DETAIL_LOADING_MESSAGE)
        );
        state.apply(
            CycleOutcome::new(SurfaceKind::Detail, second, Err(FetchError::network("timeout")))
                .for_panel(panel),
        );

        let detail = state.detail.as_ref().unwrap();
        assert_eq!(detail.chart.loading_message(), Some(DETAIL_ERROR_MESSAGE));
        assert_eq!(detail.chart.instance().cloned(), before);
        assert_eq!(detail.summary.as_ref().unwrap().current_price, "$104.00");
    }

    #[test]
    fn detail_outcome_after_close_is_dropped() {
        let mut state = state();
        state.apply(CycleOutcome::new(SurfaceKind::Detail, 0, history("ETH", 3)).for_panel(0));
        assert!(state.detail.is_none());
        assert_eq!(state.begin(SurfaceKind::Detail), None);

        state.open_detail(DetailPanel::new("BTC"));
        let (cycle, panel) = begin_detail(&mut state);
        let outcome = CycleOutcome::new(SurfaceKind::Detail, cycle, history("ETH", 3));
        state.apply(outcome.for_panel(panel));
        let detail = state.detail.as_ref().unwrap();
        assert!(!detail.chart.has_instance());
        assert!(detail.surface.is_fetching());
    }

    #[test]
    fn late_failure_for_switched_coin_is_dropped() {
        let mut state = state();
        state.open_detail(DetailPanel::new("ETH"));
        let (eth_cycle, eth_panel) = begin_detail(&mut state);

        state.open_detail(DetailPanel::new("BTC"));
        let (btc_cycle, btc_panel) = begin_detail(&mut state);
        assert_ne!(eth_panel, btc_panel);

        state.apply(
            CycleOutcome::new(SurfaceKind::Detail, eth_cycle, Err(FetchError::network("reset")))
                .for_panel(eth_panel),
        );

        let detail = state.detail.as_ref().unwrap();
        assert_eq!(detail.symbol, "BTC");
        assert!(detail.surface.is_fetching());
        assert_eq!(detail.surface.in_flight(), 1);
        assert_eq!(detail.chart.loading_message(), None);

        let outcome = CycleOutcome::new(SurfaceKind::Detail, btc_cycle, history("BTC", 4));
        state.apply(outcome.for_panel(btc_panel));
        let detail = state.detail.as_ref().unwrap();
        assert_eq!(detail.surface.phase(), &SurfacePhase::Rendered);
        assert_eq!(detail.chart.instance().unwrap().config.points.len(), 4);
    }

    #[test]
    fn detail_outcome_without_panel_tag_is_dropped() {
        let mut state = state();
        state.open_detail(DetailPanel::new("SOL"));
        let (cycle, _) = begin_detail(&mut state);
        state.apply(CycleOutcome::new(
            SurfaceKind::Detail,
            cycle,
            Err(FetchError::network("reset")),
        ));
        assert!(state.detail.as_ref().unwrap().surface.is_fetching());
    }
}
