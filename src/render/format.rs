use chrono::{TimeZone, Utc};

use crate::fetch::TimeRange;

pub const TRILLION: f64 = 1e12;
pub const BILLION: f64 = 1e9;
pub const MILLION: f64 = 1e6;

pub const PLACEHOLDER_PERCENT: &str = "--%";

const INTRADAY_LABEL_FMT: &str = "%H:%M";
const DAILY_LABEL_FMT: &str = "%b %e";
const TOOLTIP_FMT: &str = "%b %e, %Y %H:%M";

/// Where a figure is displayed; chart axes never use the million suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatContext {
    Axis,
    Summary,
}

/// Colour class of a percentage badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Positive,
    Negative,
    Neutral,
}

impl Badge {
    /// Non-negative changes, zero included, are positive.
    pub fn for_change(change: f64) -> Self {
        if change >= 0.0 {
            Badge::Positive
        } else {
            Badge::Negative
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Badge::Positive => "positive",
            Badge::Negative => "negative",
            Badge::Neutral => "",
        }
    }
}

/// Percentage text and its badge.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeText {
    pub text: String,
    pub badge: Badge,
}

impl BadgeText {
    pub fn change(change: f64) -> Self {
        Self {
            text: format_signed_percent(change),
            badge: Badge::for_change(change),
        }
    }

    pub fn optional_change(change: Option<f64>) -> Self {
        match change {
            Some(value) => Self::change(value),
            None => Self {
                text: PLACEHOLDER_PERCENT.to_string(),
                badge: Badge::Neutral,
            },
        }
    }
}

/// `$2.40T`, `$812.35B`, `$5.20M` or a grouped decimal such as `$999,999.5`.
pub fn format_usd_compact(value: f64, context: FormatContext) -> String {
    if value >= TRILLION {
        format!("${:.2}T", value / TRILLION)
    } else if value >= BILLION {
        format!("${:.2}B", value / BILLION)
    } else if value >= MILLION && context == FormatContext::Summary {
        format!("${:.2}M", value / MILLION)
    } else {
        format!("${}", group_digits(value, 0, 3))
    }
}

pub fn format_price(price: f64) -> String {
    format!("${}", group_digits(price, 2, 8))
}

pub fn format_volume(volume: f64) -> String {
    format!("${}", group_digits(volume, 0, 0))
}

pub fn format_signed_percent(change: f64) -> String {
    let change = if change == 0.0 { 0.0 } else { change };
    let sign = if change >= 0.0 { "+" } else { "" };
    format!("{sign}{change:.2}%")
}

/// Decimal with thousands separators and between `min_frac` and `max_frac` fraction digits.
pub fn group_digits(value: f64, min_frac: usize, max_frac: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let max_frac = max_frac.max(min_frac);
    let fixed = format!("{:.*}", max_frac, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (fixed.as_str(), ""),
    };

    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < min_frac {
        frac.push('0');
    }

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, digit) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let is_zero = int_part.chars().chain(frac.chars()).all(|c| c == '0');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

/// X-axis label: clock time for the intraday range, month and day otherwise.
pub fn axis_label(timestamp_ms: i64, range: TimeRange) -> String {
    let format = if range.is_intraday() {
        INTRADAY_LABEL_FMT
    } else {
        DAILY_LABEL_FMT
    };
    format_timestamp(timestamp_ms, format)
}

pub fn tooltip_label(timestamp_ms: i64) -> String {
    format_timestamp(timestamp_ms, TOOLTIP_FMT)
}

fn format_timestamp(timestamp_ms: i64, format: &str) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format(format).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trillion_boundary_is_exact() {
        assert_eq!(
            format_usd_compact(1_000_000_000_000.0, FormatContext::Summary),
            "$1.00T"
        );
        let below = format_usd_compact(999_999_999_999.0, FormatContext::Summary);
        assert!(below.ends_with('B'), "{below}");
        assert_eq!(
            format_usd_compact(999_999_999_999.0, FormatContext::Axis),
            below
        );
    }

    #[test]
    fn million_suffix_only_in_summary_context() {
        assert_eq!(format_usd_compact(5_200_000.0, FormatContext::Summary), "$5.20M");
        assert_eq!(format_usd_compact(5_200_000.0, FormatContext::Axis), "$5,200,000");
        assert_eq!(format_usd_compact(999_999.5, FormatContext::Summary), "$999,999.5");
        assert_eq!(format_usd_compact(812_350_000_000.0, FormatContext::Axis), "$812.35B");
    }

    #[test]
    fn badge_boundary_at_zero_is_positive() {
        assert_eq!(Badge::for_change(0.0), Badge::Positive);
        assert_eq!(Badge::for_change(-0.0), Badge::Positive);
        assert_eq!(Badge::for_change(-0.0001), Badge::Negative);
        assert_eq!(Badge::for_change(0.0).class(), "positive");
        assert_eq!(BadgeText::change(0.0).text, "+0.00%");
        assert_eq!(BadgeText::change(-0.0).text, "+0.00%");
        assert_eq!(BadgeText::change(-2.346).text, "-2.35%");
    }

    #[test]
    fn missing_optional_change_is_neutral_placeholder() {
        let badge = BadgeText::optional_change(None);
        assert_eq!(badge.text, "--%");
        assert_eq!(badge.badge, Badge::Neutral);
        assert_eq!(badge.badge.class(), "");
    }

    #[test]
    fn price_keeps_between_two_and_eight_fraction_digits() {
        assert_eq!(format_price(65000.0), "$65,000.00");
        assert_eq!(format_price(0.000012345678), "$0.00001235");
        assert_eq!(format_price(1234.5), "$1,234.50");
        assert_eq!(format_price(0.123456789), "$0.12345679");
    }

    #[test]
    fn volume_has_no_fraction_digits() {
        assert_eq!(format_volume(1_234_567.89), "$1,234,568");
        assert_eq!(format_volume(999.0), "$999");
    }

    #[test]
    fn groups_negative_values() {
        assert_eq!(group_digits(-1234567.0, 0, 0), "-1,234,567");
        assert_eq!(group_digits(-0.0001, 0, 3), "0");
    }

    #[test]
    fn axis_label_format_depends_on_range() {
        let ts = 1_700_000_000_000; // 2023-11-14 22:13:20 UTC
        assert_eq!(axis_label(ts, TimeRange::Day), "22:13");
        for range in TimeRange::ALL.into_iter().filter(|r| !r.is_intraday()) {
            assert_eq!(axis_label(ts, range), "Nov 14", "{range}");
        }
        assert_eq!(tooltip_label(ts), "Nov 14, 2023 22:13");
    }
}
