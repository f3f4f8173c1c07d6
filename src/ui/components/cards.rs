use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::poll::{ListView, SurfaceState};
use crate::render::{CardContainer, CoinCard, ContainerContent};
use crate::ui::components::utils::{equal_columns, split_vertical, truncate_to_width};
use crate::ui::styles::{badge_style, error_style, secondary_line, secondary_span, selection_style};

pub const GRID_COLUMNS: usize = 3;
const CARD_HEIGHT: u16 = 5;

/// Cursor over the card grid, stored as a flat index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridCursor {
    pub index: usize,
    pub offset_rows: usize,
}

impl GridCursor {
    pub fn clamp(&mut self, total: usize) {
        if total == 0 {
            self.index = 0;
        } else if self.index >= total {
            self.index = total - 1;
        }
    }

    pub fn left(&mut self) {
        if self.index % GRID_COLUMNS > 0 {
            self.index -= 1;
        }
    }

    pub fn right(&mut self, total: usize) {
        if self.index % GRID_COLUMNS + 1 < GRID_COLUMNS && self.index + 1 < total {
            self.index += 1;
        }
    }

    pub fn up(&mut self) {
        self.index = self.index.saturating_sub(GRID_COLUMNS);
    }

    pub fn down(&mut self, total: usize) {
        if self.index + GRID_COLUMNS < total {
            self.index += GRID_COLUMNS;
        }
    }

    /// Scroll so the cursor row is inside a window of `visible_rows`.
    fn follow(&mut self, visible_rows: usize) {
        let row = self.index / GRID_COLUMNS;
        let visible_rows = visible_rows.max(1);
        if row < self.offset_rows {
            self.offset_rows = row;
        } else if row >= self.offset_rows + visible_rows {
            self.offset_rows = row + 1 - visible_rows;
        }
    }
}

pub fn render_card_grid(
    f: &mut Frame<'_>,
    area: Rect,
    container: &CardContainer,
    surface: &SurfaceState,
    view: ListView,
    cursor: &mut GridCursor,
) {
    let title = if surface.is_fetching() {
        format!("{} • refreshing", view.title())
    } else {
        view.title().to_string()
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let cards = match container.content() {
        ContainerContent::Cards(cards) => cards,
        ContainerContent::Blank => return,
        ContainerContent::Loading(message) => {
            render_message(f, inner, Line::from(message.as_str()));
            return;
        }
        ContainerContent::Empty(message) => {
            render_message(
                f,
                inner,
                Line::from(vec![
                    Span::raw(message.as_str()),
                    secondary_span("  (r to retry)"),
                ]),
            );
            return;
        }
        ContainerContent::Error { message, retry } => {
            let mut spans = vec![Span::styled(message.as_str(), error_style())];
            if *retry {
                spans.push(secondary_span("  (r to retry)"));
            }
            render_message(f, inner, Line::from(spans));
            return;
        }
    };

    cursor.clamp(cards.len());
    let visible_rows = usize::from(inner.height / CARD_HEIGHT).max(1);
    cursor.follow(visible_rows);

    let rows: Vec<&[CoinCard]> = cards
        .chunks(GRID_COLUMNS)
        .skip(cursor.offset_rows)
        .take(visible_rows)
        .collect();
    let constraints: Vec<Constraint> = rows
        .iter()
        .map(|_| Constraint::Length(CARD_HEIGHT))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let row_areas = split_vertical(inner, &constraints);

    for (row_idx, row) in rows.iter().enumerate() {
        let columns = equal_columns(row_areas[row_idx], GRID_COLUMNS);
        for (col_idx, card) in row.iter().enumerate() {
            let flat = (cursor.offset_rows + row_idx) * GRID_COLUMNS + col_idx;
            render_card(f, columns[col_idx], card, flat == cursor.index);
        }
    }
}

fn render_message(f: &mut Frame<'_>, area: Rect, line: Line<'_>) {
    f.render_widget(
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_card(f: &mut Frame<'_>, area: Rect, card: &CoinCard, selected: bool) {
    let border_style = if selected {
        selection_style()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(card.symbol.clone(), Style::default().bold()));
    let width = usize::from(block.inner(area).width);

    let lines = vec![
        Line::from(vec![
            Span::raw(truncate_to_width(&card.price, width.saturating_sub(10))),
            Span::raw("  "),
            Span::styled(card.change.text.clone(), badge_style(card.change.badge)),
        ]),
        Line::from(truncate_to_width(&card.volume, width)),
        secondary_line(truncate_to_width(
            &format!("{} • {}", card.pair_label, card.detail_path),
            width,
        )),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}
