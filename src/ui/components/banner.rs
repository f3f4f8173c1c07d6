use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::poll::SurfaceState;
use crate::render::{BadgeText, StatsBanner};
use crate::ui::components::utils::equal_columns;
use crate::ui::styles::{badge_style, error_style, header_text};

pub fn render_stats_banner(
    f: &mut Frame<'_>,
    area: Rect,
    banner: Option<&StatsBanner>,
    surface: &SurfaceState,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Global Market");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if let Some(message) = surface.error_message() {
        f.render_widget(
            Paragraph::new(message.to_string())
                .style(error_style())
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let Some(banner) = banner else {
        f.render_widget(
            Paragraph::new("Loading market statistics…").alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let columns = equal_columns(inner, 3);
    let figures = [
        ("Market Cap", &banner.total_market_cap, &banner.market_cap_change),
        ("24h Volume", &banner.total_volume, &banner.volume_change),
        ("BTC Dominance", &banner.btc_dominance, &banner.dominance_change),
    ];
    for (area, (label, value, change)) in columns.into_iter().zip(figures) {
        f.render_widget(figure(label, value, change), area);
    }
}

fn figure<'a>(label: &'a str, value: &'a str, change: &'a BadgeText) -> Paragraph<'a> {
    let mut text = header_text(label);
    text.lines.push(Line::from(vec![
        Span::raw(value),
        Span::raw(" "),
        Span::styled(change.text.as_str(), badge_style(change.badge)),
    ]));
    Paragraph::new(text).alignment(Alignment::Center)
}
