use crate::fetch::{PricePoint, TimeRange};

use super::format::{format_price, BadgeText};

const MAX_ZOOM_LEVEL: u8 = 4;

/// How the y axis labels its ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueAxis {
    /// Compact USD with T/B suffixes, used for aggregate figures.
    CompactUsd,
    /// Plain price with two decimals.
    Price,
}

/// Complete description of one line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub title: String,
    pub series_name: String,
    pub y_axis_title: String,
    pub value_axis: ValueAxis,
    pub range: TimeRange,
    pub points: Vec<PricePoint>,
}

/// Widget contract of the charting surface.
pub trait ChartSurface {
    fn has_instance(&self) -> bool;
    fn construct(&mut self, config: ChartConfig);
    fn update(&mut self, config: ChartConfig, redraw: bool, one_to_one: bool);
    fn show_loading(&mut self, message: &str);
    fn hide_loading(&mut self);
}

/// Result of a chart render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartRender {
    Created,
    Updated,
    NoData,
}

/// Create the chart on first use, otherwise update it in place.
///
/// An empty series leaves whatever the surface shows untouched.
pub fn render_chart<S: ChartSurface + ?Sized>(surface: &mut S, config: ChartConfig) -> ChartRender {
    if config.points.is_empty() {
        return ChartRender::NoData;
    }

    surface.hide_loading();
    if surface.has_instance() {
        surface.update(config, true, true);
        ChartRender::Updated
    } else {
        surface.construct(config);
        ChartRender::Created
    }
}

/// Live chart plus the view state that survives updates.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartInstance {
    pub config: ChartConfig,
    pub zoom_level: u8,
    pub revision: u64,
    pub needs_redraw: bool,
}

impl ChartInstance {
    /// Points inside the zoom window; each level halves the visible span, anchored at the newest point.
    pub fn visible_points(&self) -> &[PricePoint] {
        let points = &self.config.points;
        let keep = (points.len() >> self.zoom_level).max(2).min(points.len());
        &points[points.len() - keep..]
    }
}

/// In-memory chart surface drawn by the terminal UI.
#[derive(Debug, Default)]
pub struct ChartWidget {
    instance: Option<ChartInstance>,
    loading: Option<String>,
}

impl ChartWidget {
    pub fn instance(&self) -> Option<&ChartInstance> {
        self.instance.as_ref()
    }

    pub fn loading_message(&self) -> Option<&str> {
        self.loading.as_deref()
    }

    pub fn zoom_in(&mut self) {
        if let Some(instance) = self.instance.as_mut() {
            instance.zoom_level = (instance.zoom_level + 1).min(MAX_ZOOM_LEVEL);
        }
    }

    pub fn zoom_out(&mut self) {
        if let Some(instance) = self.instance.as_mut() {
            instance.zoom_level = instance.zoom_level.saturating_sub(1);
        }
    }

    pub fn mark_drawn(&mut self) {
        if let Some(instance) = self.instance.as_mut() {
            instance.needs_redraw = false;
        }
    }
}

impl ChartSurface for ChartWidget {
    fn has_instance(&self) -> bool {
        self.instance.is_some()
    }

    fn construct(&mut self, config: ChartConfig) {
        self.instance = Some(ChartInstance {
            config,
            zoom_level: 0,
            revision: 0,
            needs_redraw: true,
        });
    }

    fn update(&mut self, config: ChartConfig, redraw: bool, one_to_one: bool) {
        let Some(instance) = self.instance.as_mut() else {
            self.construct(config);
            return;
        };

        if one_to_one {
            instance.config = config;
        } else {
            instance.config.points = config.points;
            instance.config.title = config.title;
            instance.config.range = config.range;
        }
        instance.revision += 1;
        instance.needs_redraw |= redraw;
    }

    fn show_loading(&mut self, message: &str) {
        self.loading = Some(message.to_string());
    }

    fn hide_loading(&mut self) {
        self.loading = None;
    }
}

/// Current price and change across the displayed series.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSummary {
    pub current_price: String,
    pub change: BadgeText,
}

pub fn price_summary(points: &[PricePoint]) -> Option<PriceSummary> {
    if points.len() < 2 {
        return None;
    }

    let initial = points.first()?.price;
    let current = points.last()?.price;
    let change = if initial.abs() > f64::EPSILON {
        (current - initial) / initial * 100.0
    } else {
        0.0
    };

    Some(PriceSummary {
        current_price: format_price(current),
        change: BadgeText::change(change),
    })
}
