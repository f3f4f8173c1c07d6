use std::borrow::Cow;

use ratatui::prelude::Stylize;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::render::Badge;

/// Accent color for titles, the card cursor and the active legend entry.
pub const ACCENT: Color = Color::Indexed(208);

/// Line color of chart series, `#4bc0c0`.
pub const SERIES: Color = Color::Rgb(0x4b, 0xc0, 0xc0);

pub const POSITIVE: Color = Color::Green;
pub const NEGATIVE: Color = Color::Red;
pub const ERROR: Color = Color::LightRed;

pub fn header_text<'a>(text: impl Into<Cow<'a, str>>) -> Text<'a> {
    let owned = text.into().into_owned();
    Text::from(owned.bold().fg(ACCENT))
}

/// Dimmed line for hints and footers.
pub fn secondary_line<'a>(text: impl Into<Cow<'a, str>>) -> Line<'a> {
    let owned = text.into().into_owned();
    Line::from(owned.dim())
}

pub fn secondary_span<'a>(text: impl Into<Cow<'a, str>>) -> Span<'a> {
    let owned = text.into().into_owned();
    Span::from(owned).dim()
}

pub fn selection_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn badge_style(badge: Badge) -> Style {
    match badge {
        Badge::Positive => Style::default().fg(POSITIVE),
        Badge::Negative => Style::default().fg(NEGATIVE),
        Badge::Neutral => Style::default().fg(Color::Gray),
    }
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}
