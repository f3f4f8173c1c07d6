use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::info;
use ratatui::{prelude::*, widgets::*};

use crate::error::Result;
use crate::fetch::TimeRange;
use crate::poll::PollLoop;
use crate::ui::components::banner::render_stats_banner;
use crate::ui::components::cards::{render_card_grid, GridCursor};
use crate::ui::components::chart::{render_chart_panel, ChartPanel};
use crate::ui::components::utils::split_vertical;
use crate::ui::styles::{badge_style, secondary_line};
use crate::ui::TerminalGuard;

const EVENT_POLL: Duration = Duration::from_millis(100);
const HELP: &str =
    "1-8 range • m metric • a top/all • arrows move • Enter detail • +/- zoom • r retry • Esc back • q quit";

/// What the loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Run the interactive dashboard until the user quits.
pub async fn run_dashboard(poll: &mut PollLoop) -> Result<()> {
    let mut guard = TerminalGuard::new()?;
    let mut cursor = GridCursor::default();
    poll.mount();

    loop {
        poll.drain();
        poll.tick(Instant::now());

        guard
            .terminal_mut()
            .draw(|f| draw_dashboard(f, poll, &mut cursor))?;
        mark_charts_drawn(poll);

        if event::poll(EVENT_POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && handle_key(poll, &mut cursor, key) == KeyOutcome::Quit
                {
                    break;
                }
            }
        }

        tokio::task::yield_now().await;
    }

    guard.restore()?;
    info!("Dashboard closed");
    Ok(())
}

/// Apply one key press to the poll loop and cursor.
pub fn handle_key(poll: &mut PollLoop, cursor: &mut GridCursor, key: KeyEvent) -> KeyOutcome {
    let total = poll.state().cards.cards().len();
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return KeyOutcome::Quit;
        }
        KeyCode::Char('q') => return KeyOutcome::Quit,
        KeyCode::Esc => poll.close_detail(),
        KeyCode::Char(digit @ '1'..='8') => {
            let idx = digit as usize - '1' as usize;
            poll.select_range(TimeRange::ALL[idx]);
        }
        KeyCode::Char('m') => poll.cycle_metric(),
        KeyCode::Char('a') => {
            *cursor = GridCursor::default();
            poll.toggle_list_view();
        }
        KeyCode::Char('r') => {
            poll.retry_coin_list();
        }
        KeyCode::Char('+') | KeyCode::Char('=') => zoom(poll, true),
        KeyCode::Char('-') | KeyCode::Char('_') => zoom(poll, false),
        KeyCode::Left | KeyCode::Char('h') => cursor.left(),
        KeyCode::Right | KeyCode::Char('l') => cursor.right(total),
        KeyCode::Up | KeyCode::Char('k') => cursor.up(),
        KeyCode::Down | KeyCode::Char('j') => cursor.down(total),
        KeyCode::Enter => {
            let symbol = poll
                .state()
                .cards
                .cards()
                .get(cursor.index)
                .map(|card| card.symbol.clone());
            if let Some(symbol) = symbol {
                poll.open_detail(&symbol);
            }
        }
        _ => {}
    }
    KeyOutcome::Continue
}

fn zoom(poll: &mut PollLoop, zoom_in: bool) {
    let state = poll.state_mut();
    let widget = match state.detail.as_mut() {
        Some(detail) => &mut detail.chart,
        None => &mut state.chart_widget,
    };
    if zoom_in {
        widget.zoom_in();
    } else {
        widget.zoom_out();
    }
}

fn mark_charts_drawn(poll: &mut PollLoop) {
    let state = poll.state_mut();
    state.chart_widget.mark_drawn();
    if let Some(detail) = state.detail.as_mut() {
        detail.chart.mark_drawn();
    }
}

fn draw_dashboard(f: &mut Frame<'_>, poll: &PollLoop, cursor: &mut GridCursor) {
    let state = poll.state();
    let segments = split_vertical(
        f.size(),
        &[
            Constraint::Length(4),
            Constraint::Percentage(45),
            Constraint::Min(6),
            Constraint::Length(1),
        ],
    );

    render_stats_banner(f, segments[0], state.banner.as_ref(), &state.stats);

    match state.detail.as_ref() {
        Some(detail) => {
            let parts = split_vertical(segments[1], &[Constraint::Length(1), Constraint::Min(5)]);
            let mut header = vec![Span::styled(
                format!("{}/USDT  ", detail.symbol),
                Style::default().bold(),
            )];
            if let Some(summary) = detail.summary.as_ref() {
                header.push(Span::raw(format!("{}  ", summary.current_price)));
                header.push(Span::styled(
                    summary.change.text.clone(),
                    badge_style(summary.change.badge),
                ));
            }
            f.render_widget(Paragraph::new(Line::from(header)), parts[0]);

            let title = format!("{} Price", detail.symbol);
            render_chart_panel(
                f,
                parts[1],
                &ChartPanel {
                    widget: &detail.chart,
                    surface: &detail.surface,
                    selected_range: detail.range,
                    placeholder_title: &title,
                },
            );
        }
        None => {
            let title = format!("Total Crypto {}", poll.selection().metric.label());
            render_chart_panel(
                f,
                segments[1],
                &ChartPanel {
                    widget: &state.chart_widget,
                    surface: &state.chart,
                    selected_range: poll.selection().range,
                    placeholder_title: &title,
                },
            );
        }
    }

    render_card_grid(
        f,
        segments[2],
        &state.cards,
        &state.coins,
        state.shown_view,
        cursor,
    );
    f.render_widget(Paragraph::new(secondary_line(HELP)), segments[3]);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::future::{BoxFuture, FutureExt};

    use super::*;
    use crate::config::Config;
    use crate::error::FetchError;
    use crate::fetch::{
        CoinSummary, DayCount, FetchResult, GlobalStats, MarketSource, Metric, PricePoint,
    };

    /// Serves a fixed coin list and a short rising series for every chart.
    struct StaticSource;

    impl MarketSource for StaticSource {
        fn top_coins(&self, _limit: usize) -> BoxFuture<'_, FetchResult<Vec<CoinSummary>>> {
            let coins = ["BTCUSDT", "ETHUSDT", "SOLUSDT", "XRPUSDT"]
                .iter()
                .map(|symbol| CoinSummary {
                    symbol: symbol.to_string(),
                    price: 1.0,
                    volume: 1.0,
                    price_change_percent: 0.5,
                })
                .collect();
            async move { Ok(coins) }.boxed()
        }

        fn all_coins(&self, _limit: usize) -> BoxFuture<'_, FetchResult<Vec<CoinSummary>>> {
            async { Err(FetchError::network("offline")) }.boxed()
        }

        fn global_stats(&self) -> BoxFuture<'_, FetchResult<GlobalStats>> {
            async { Err(FetchError::network("offline")) }.boxed()
        }

        fn market_chart(
            &self,
            _metric: Metric,
            _days: DayCount,
        ) -> BoxFuture<'_, FetchResult<Vec<PricePoint>>> {
            async { Ok((0..8).map(|i| PricePoint::new(i, i as f64)).collect()) }.boxed()
        }

        fn price_history(
            &self,
            _symbol: String,
            _days: DayCount,
        ) -> BoxFuture<'_, FetchResult<Vec<PricePoint>>> {
            async { Ok((0..8).map(|i| PricePoint::new(i, 10.0 + i as f64)).collect()) }.boxed()
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn poll_loop() -> PollLoop {
        PollLoop::from_config(Arc::new(StaticSource), &Config::default())
    }

    #[tokio::test]
    async fn quit_keys() {
        let mut poll = poll_loop();
        let mut cursor = GridCursor::default();
        assert_eq!(
            handle_key(&mut poll, &mut cursor, press(KeyCode::Char('q'))),
            KeyOutcome::Quit
        );
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&mut poll, &mut cursor, ctrl_c), KeyOutcome::Quit);
        assert_eq!(
            handle_key(&mut poll, &mut cursor, press(KeyCode::Char('c'))),
            KeyOutcome::Continue
        );
    }

    #[tokio::test]
    async fn digit_keys_select_range() {
        let mut poll = poll_loop();
        let mut cursor = GridCursor::default();
        handle_key(&mut poll, &mut cursor, press(KeyCode::Char('5')));
        assert_eq!(poll.selection().range, TimeRange::Quarter);
        handle_key(&mut poll, &mut cursor, press(KeyCode::Char('9')));
        assert_eq!(poll.selection().range, TimeRange::Quarter);
    }

    #[tokio::test]
    async fn enter_opens_selected_coin_and_esc_closes() {
        let mut poll = poll_loop();
        let mut cursor = GridCursor::default();
        poll.trigger(crate::poll::SurfaceKind::CoinList);
        poll.settle().await;

        handle_key(&mut poll, &mut cursor, press(KeyCode::Right));
        handle_key(&mut poll, &mut cursor, press(KeyCode::Enter));
        poll.settle().await;
        let detail = poll.state().detail.as_ref().unwrap();
        assert_eq!(detail.symbol, "ETH");
        assert_eq!(detail.summary.as_ref().unwrap().current_price, "$17.00");

        handle_key(&mut poll, &mut cursor, press(KeyCode::Char('+')));
        let zoomed = poll.state().detail.as_ref().unwrap().chart.instance().unwrap();
        assert_eq!(zoomed.zoom_level, 1);
        assert!(poll.state().chart_widget.instance().is_none());

        handle_key(&mut poll, &mut cursor, press(KeyCode::Esc));
        assert!(poll.state().detail.is_none());
    }

    #[tokio::test]
    async fn retry_key_is_ignored_unless_list_failed() {
        let mut poll = poll_loop();
        let mut cursor = GridCursor::default();
        handle_key(&mut poll, &mut cursor, press(KeyCode::Char('r')));
        assert!(!poll.state().coins.is_fetching());

        handle_key(&mut poll, &mut cursor, press(KeyCode::Char('a')));
        poll.settle().await;
        assert!(poll.state().coins.can_retry());

        handle_key(&mut poll, &mut cursor, press(KeyCode::Char('r')));
        assert!(poll.state().coins.is_fetching());
        poll.settle().await;
    }
}
