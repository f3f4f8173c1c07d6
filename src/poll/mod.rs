use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::config::Config;
use crate::fetch::{DayCount, MarketSource, TimeRange};
use crate::render::IconSet;

pub mod state;
pub mod surface;

pub use state::{
    ChartSelection, CycleOutcome, DashboardState, DetailPanel, ListView, Payload, NO_DATA_NOTICE,
};
pub use surface::{SurfaceKind, SurfacePhase, SurfaceState};

/// How many coins each list view asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLimits {
    pub top: usize,
    pub all: usize,
}

impl ListLimits {
    fn for_view(self, view: ListView) -> usize {
        match view {
            ListView::Top => self.top,
            ListView::All => self.all,
        }
    }
}

/// Drives every dashboard surface.
///
/// Each trigger spawns one task; finished tasks post a [`CycleOutcome`] back
/// over the channel and the owner applies them with [`PollLoop::drain`] or
/// [`PollLoop::next_outcome`]. Nothing in flight is ever cancelled.
pub struct PollLoop {
    source: Arc<dyn MarketSource>,
    tx: UnboundedSender<CycleOutcome>,
    rx: UnboundedReceiver<CycleOutcome>,
    selection: ChartSelection,
    list_view: ListView,
    limits: ListLimits,
    period: Duration,
    next_list_refresh: Option<Instant>,
    state: DashboardState,
}

impl PollLoop {
    pub fn new(
        source: Arc<dyn MarketSource>,
        limits: ListLimits,
        period: Duration,
        icons: IconSet,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            tx,
            rx,
            selection: ChartSelection::default(),
            list_view: ListView::default(),
            limits,
            period,
            next_list_refresh: None,
            state: DashboardState::new(icons),
        }
    }

    pub fn from_config(source: Arc<dyn MarketSource>, config: &Config) -> Self {
        let limits = ListLimits {
            top: config.refresh.top_coins,
            all: config.refresh.all_coins,
        };
        Self::new(
            source,
            limits,
            config.coin_list_period(),
            IconSet::from_endpoints(&config.endpoints),
        )
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DashboardState {
        &mut self.state
    }

    pub fn selection(&self) -> ChartSelection {
        self.selection
    }

    pub fn list_view(&self) -> ListView {
        self.list_view
    }

    /// One cycle for each of the stats, chart and coin-list surfaces, then arm the list timer.
    pub fn mount(&mut self) {
        info!("Mounting dashboard");
        self.trigger(SurfaceKind::Stats);
        self.trigger(SurfaceKind::Chart);
        self.trigger(SurfaceKind::CoinList);
        self.next_list_refresh = Some(Instant::now() + self.period);
    }

    /// Start a cycle for `kind`. Returns `false` when the surface is not on screen.
    pub fn trigger(&mut self, kind: SurfaceKind) -> bool {
        let Some(cycle) = self.state.begin(kind) else {
            return false;
        };

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        match kind {
            SurfaceKind::Stats => {
                tokio::spawn(async move {
                    let result = source.global_stats().await.map(Payload::Stats);
                    post(&tx, CycleOutcome::new(kind, cycle, result));
                });
            }
            SurfaceKind::Chart => {
                let selection = self.selection;
                tokio::spawn(async move {
                    let result = source
                        .market_chart(selection.metric, DayCount::Known(selection.range))
                        .await
                        .map(|points| Payload::Chart { selection, points });
                    post(&tx, CycleOutcome::new(kind, cycle, result));
                });
            }
            SurfaceKind::CoinList => {
                let view = self.list_view;
                let limit = self.limits.for_view(view);
                tokio::spawn(async move {
                    let fetched = match view {
                        ListView::Top => source.top_coins(limit).await,
                        ListView::All => source.all_coins(limit).await,
                    };
                    let result = fetched.map(|coins| Payload::Coins { view, coins });
                    post(&tx, CycleOutcome::new(kind, cycle, result));
                });
            }
            SurfaceKind::Detail => {
                let Some(detail) = self.state.detail.as_ref() else {
                    return false;
                };
                let symbol = detail.symbol.clone();
                let range = detail.range;
                let panel = detail.generation;
                tokio::spawn(async move {
                    let result = source
                        .price_history(symbol.clone(), DayCount::Known(range))
                        .await
                        .map(|points| Payload::Detail {
                            symbol,
                            range,
                            points,
                        });
                    post(&tx, CycleOutcome::new(kind, cycle, result).for_panel(panel));
                });
            }
        }
        true
    }

    /// Range keys drive the detail chart while it is open, the market chart otherwise.
    pub fn select_range(&mut self, range: TimeRange) {
        if let Some(detail) = self.state.detail.as_mut() {
            detail.range = range;
            self.trigger(SurfaceKind::Detail);
            return;
        }
        self.selection.range = range;
        debug!("Chart range -> {range}");
        self.trigger(SurfaceKind::Chart);
    }

    pub fn cycle_metric(&mut self) {
        self.selection.metric = self.selection.metric.next();
        debug!("Chart metric -> {}", self.selection.metric.label());
        self.trigger(SurfaceKind::Chart);
    }

    /// Re-issue the coin list, only from its error state.
    pub fn retry_coin_list(&mut self) -> bool {
        if !self.state.coins.can_retry() {
            return false;
        }
        info!("Retrying coin list");
        self.trigger(SurfaceKind::CoinList)
    }

    pub fn toggle_list_view(&mut self) {
        self.list_view = self.list_view.toggle();
        info!("Coin list view -> {}", self.list_view.title());
        self.trigger(SurfaceKind::CoinList);
    }

    pub fn open_detail(&mut self, symbol: &str) {
        let mut panel = DetailPanel::new(symbol.to_uppercase());
        panel.range = self.selection.range;
        let panel = self.state.open_detail(panel);
        info!("Opening detail chart for {}", panel.symbol);
        self.trigger(SurfaceKind::Detail);
    }

    pub fn close_detail(&mut self) {
        if let Some(detail) = self.state.detail.take() {
            debug!("Closed detail chart for {}", detail.symbol);
        }
    }

    /// Fire the coin-list refresh when its period has elapsed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_list_refresh else {
            return false;
        };
        if now < due {
            return false;
        }
        self.next_list_refresh = Some(now + self.period);
        self.trigger(SurfaceKind::CoinList)
    }

    /// Apply every outcome that has already arrived.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.rx.try_recv() {
            self.state.apply(outcome);
            applied += 1;
        }
        applied
    }

    /// Wait for the next outcome and apply it.
    pub async fn next_outcome(&mut self) -> Option<SurfaceKind> {
        let outcome = self.rx.recv().await?;
        let kind = outcome.surface;
        self.state.apply(outcome);
        Some(kind)
    }

    /// Apply outcomes until no surface is fetching.
    pub async fn settle(&mut self) {
        while self.in_flight() > 0 {
            if self.next_outcome().await.is_none() {
                break;
            }
        }
    }

    fn in_flight(&self) -> usize {
        [
            SurfaceKind::Stats,
            SurfaceKind::Chart,
            SurfaceKind::CoinList,
            SurfaceKind::Detail,
        ]
        .into_iter()
        .filter_map(|kind| self.state.surface(kind))
        .map(SurfaceState::in_flight)
        .sum()
    }
}

fn post(tx: &UnboundedSender<CycleOutcome>, outcome: CycleOutcome) {
    let (surface, cycle) = (outcome.surface, outcome.cycle);
    if tx.send(outcome).is_err() {
        debug!("{surface} cycle {cycle} finished after the dashboard closed");
    }
}
