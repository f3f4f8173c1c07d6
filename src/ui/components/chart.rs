use ratatui::prelude::Stylize;
use ratatui::text::Line as TextLine;
use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders, Clear, Paragraph, Wrap,
    },
};
use unicode_width::UnicodeWidthStr;

use crate::fetch::{PricePoint, TimeRange};
use crate::poll::SurfaceState;
use crate::render::format::{format_price, tooltip_label};
use crate::render::{axis_label, format_usd_compact, ChartWidget, FormatContext, ValueAxis};
use crate::ui::components::utils::{centered_rect, split_vertical};
use crate::ui::styles::{error_style, secondary_line, ACCENT, SERIES};

const Y_TICKS: usize = 6;
const X_TICKS: usize = 6;

/// What a chart panel needs to draw one frame.
pub struct ChartPanel<'a> {
    pub widget: &'a ChartWidget,
    pub surface: &'a SurfaceState,
    /// Range highlighted in the legend; follows the latest request rather than the drawn data.
    pub selected_range: TimeRange,
    pub placeholder_title: &'a str,
}

pub fn render_chart_panel(f: &mut Frame<'_>, area: Rect, panel: &ChartPanel<'_>) {
    let segments = split_vertical(area, &[Constraint::Min(5), Constraint::Length(2)]);
    let chart_area = segments[0];
    let footer_area = segments[1];

    let legend = range_legend(panel.selected_range);
    let Some(instance) = panel.widget.instance() else {
        render_placeholder(f, chart_area, panel, &legend);
        f.render_widget(
            Paragraph::new(secondary_line("1-8 range • m metric • +/- zoom")),
            footer_area,
        );
        return;
    };

    let config = &instance.config;
    let visible = instance.visible_points();
    let series = compress_points(visible, chart_area.width.saturating_sub(2));
    let value_axis = config.value_axis;

    let (mut y_min, mut y_max) = value_bounds(&series);
    if (y_max - y_min).abs() < f64::EPSILON {
        y_min -= 1.0;
        y_max += 1.0;
    }
    let ticks: Vec<(f64, String)> = value_ticks(y_min, y_max, Y_TICKS)
        .into_iter()
        .map(|value| (value, value_label(value, value_axis)))
        .collect();
    let label_width = ticks
        .iter()
        .map(|(_, label)| UnicodeWidthStr::width(label.as_str()))
        .max()
        .unwrap_or(0) as f64;

    let width_px = chart_area.width.saturating_sub(2).max(1) as f64;
    let height_px = chart_area.height.saturating_sub(2).max(1) as f64;
    let axis_x = label_width + 1.0;
    let axis_y = 1.0;
    let available_width = (width_px - axis_x - 1.0).max(1.0);
    let available_height = (height_px - axis_y - 1.0).max(1.0);
    let x_scale = if series.len() > 1 {
        available_width / (series.len() - 1) as f64
    } else {
        0.0
    };
    let y_scale = available_height / (y_max - y_min);

    let time_ticks: Vec<(f64, String)> = time_ticks(&series, config.range, X_TICKS)
        .into_iter()
        .map(|(idx, label)| (axis_x + idx as f64 * x_scale, label))
        .collect();

    let zoom = if instance.zoom_level > 0 {
        format!(" • zoom x{}", 1u32 << instance.zoom_level)
    } else {
        String::new()
    };
    let title = format!("{} | {}{}", config.title, legend, zoom);

    let points = series.clone();
    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_style(Style::default().fg(ACCENT)),
        )
        .marker(Marker::Braille)
        .x_bounds([0.0, width_px])
        .y_bounds([-1.0, height_px])
        .paint(move |ctx| {
            let project = |idx: usize, point: &PricePoint| {
                (
                    axis_x + idx as f64 * x_scale,
                    axis_y + (point.price - y_min) * y_scale,
                )
            };
            for (idx, pair) in points.windows(2).enumerate() {
                let (x1, y1) = project(idx, &pair[0]);
                let (x2, y2) = project(idx + 1, &pair[1]);
                ctx.draw(&CanvasLine {
                    x1,
                    y1,
                    x2,
                    y2,
                    color: SERIES,
                });
            }

            ctx.layer();
            let axis_color = Color::DarkGray;
            ctx.draw(&CanvasLine {
                x1: axis_x,
                y1: axis_y,
                x2: axis_x + available_width,
                y2: axis_y,
                color: axis_color,
            });
            ctx.draw(&CanvasLine {
                x1: axis_x,
                y1: axis_y,
                x2: axis_x,
                y2: axis_y + available_height,
                color: axis_color,
            });
            for (value, label) in &ticks {
                let y = axis_y + (value - y_min) * y_scale;
                ctx.print(0.0, y, label.clone());
            }
            for (x, label) in &time_ticks {
                ctx.print(*x, -1.0, label.clone());
            }
        });
    f.render_widget(canvas, chart_area);

    if let Some(message) = panel.widget.loading_message() {
        render_overlay(f, chart_area, message);
    }

    let footer = match panel.surface.error_message() {
        Some(message) => TextLine::styled(message.to_string(), error_style()),
        None => match panel.surface.notice() {
            Some(notice) => TextLine::from(notice.to_string()).gray(),
            None => TextLine::from(series_summary(visible, &config.series_name, value_axis)).gray(),
        },
    };
    f.render_widget(Paragraph::new(footer).wrap(Wrap { trim: true }), footer_area);
}

fn render_placeholder(f: &mut Frame<'_>, area: Rect, panel: &ChartPanel<'_>, legend: &str) {
    let (message, style) = if let Some(message) = panel.surface.error_message() {
        (message.to_string(), error_style())
    } else if let Some(message) = panel.widget.loading_message() {
        (message.to_string(), Style::default())
    } else if panel.surface.is_fetching() {
        ("Loading chart data…".to_string(), Style::default())
    } else if let Some(notice) = panel.surface.notice() {
        (notice.to_string(), Style::default().fg(Color::Gray))
    } else {
        ("Waiting for data".to_string(), Style::default().fg(Color::Gray))
    };

    f.render_widget(
        Paragraph::new(message)
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("{} | {}", panel.placeholder_title, legend)),
            ),
        area,
    );
}

fn render_overlay(f: &mut Frame<'_>, area: Rect, message: &str) {
    let popup = centered_rect(50, 30, area);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(message.to_string())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        popup,
    );
}

/// `1D 7D [14D] 1M ...` with the active range bracketed.
pub fn range_legend(active: TimeRange) -> String {
    TimeRange::ALL
        .iter()
        .map(|range| {
            if *range == active {
                format!("[{}]", range.label())
            } else {
                range.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn value_label(value: f64, axis: ValueAxis) -> String {
    match axis {
        ValueAxis::CompactUsd => format_usd_compact(value, FormatContext::Axis),
        ValueAxis::Price => format_price(value),
    }
}

fn series_summary(points: &[PricePoint], name: &str, axis: ValueAxis) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return String::new();
    };
    let (low, high) = value_bounds(points);
    format!(
        "{} • {} points • {} -> {} • High {} • Low {}",
        name,
        points.len(),
        tooltip_label(first.timestamp_ms),
        tooltip_label(last.timestamp_ms),
        value_label(high, axis),
        value_label(low, axis),
    )
}

fn value_bounds(points: &[PricePoint]) -> (f64, f64) {
    points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.price), hi.max(p.price))
    })
}

/// Thin the series to two samples per column, keeping the last point of each bucket.
fn compress_points(points: &[PricePoint], width: u16) -> Vec<PricePoint> {
    let max_points = usize::from(width.max(1)) * 2;
    if points.len() <= max_points {
        return points.to_vec();
    }

    let stride = (points.len() + max_points - 1) / max_points;
    let mut reduced: Vec<PricePoint> = points
        .chunks(stride)
        .filter_map(|chunk| chunk.last().copied())
        .collect();
    if let (Some(first), Some(kept)) = (points.first(), reduced.first_mut()) {
        if kept.timestamp_ms != first.timestamp_ms && reduced.len() < max_points {
            reduced.insert(0, *first);
        }
    }
    reduced
}

fn value_ticks(min: f64, max: f64, desired: usize) -> Vec<f64> {
    let desired = desired.max(2);
    if !min.is_finite() || !max.is_finite() {
        return vec![0.0, 1.0];
    }
    let step = (max - min) / (desired - 1) as f64;
    (0..desired).map(|i| min + step * i as f64).collect()
}

fn time_ticks(points: &[PricePoint], range: TimeRange, desired: usize) -> Vec<(usize, String)> {
    let Some(last_index) = points.len().checked_sub(1) else {
        return Vec::new();
    };
    if last_index == 0 {
        return vec![(0, axis_label(points[0].timestamp_ms, range))];
    }

    let desired = desired.clamp(2, points.len());
    let step = last_index as f64 / (desired - 1) as f64;
    let mut indices: Vec<usize> = (0..desired)
        .map(|i| ((i as f64 * step).round() as usize).min(last_index))
        .collect();
    indices.dedup();

    indices
        .into_iter()
        .map(|idx| (idx, axis_label(points[idx].timestamp_ms, range)))
        .collect()
}
