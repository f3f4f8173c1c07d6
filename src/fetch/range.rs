use std::fmt;

/// Chart time ranges offered by the dashboard, in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeRange {
    #[default]
    Day,
    Week,
    TwoWeeks,
    Month,
    Quarter,
    Year,
    ThreeYears,
    FiveYears,
}

/// Fallback spacing, in days, for day counts outside the enumerated set.
pub const DEFAULT_INTERVAL_MULTIPLIER: u32 = 1;

impl TimeRange {
    pub const ALL: [TimeRange; 8] = [
        TimeRange::Day,
        TimeRange::Week,
        TimeRange::TwoWeeks,
        TimeRange::Month,
        TimeRange::Quarter,
        TimeRange::Year,
        TimeRange::ThreeYears,
        TimeRange::FiveYears,
    ];

    pub fn days(self) -> u32 {
        match self {
            TimeRange::Day => 1,
            TimeRange::Week => 7,
            TimeRange::TwoWeeks => 14,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
            TimeRange::Year => 365,
            TimeRange::ThreeYears => 1095,
            TimeRange::FiveYears => 1825,
        }
    }

    pub fn from_days(days: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|range| range.days() == days)
    }

    /// Parse a day count as received from a UI control or query string.
    ///
    /// Unrecognised input is kept as a raw day count paired with the default
    /// multiplier instead of being rejected.
    pub fn parse_lenient(raw: &str) -> DayCount {
        match raw.trim().parse::<u32>() {
            Ok(days) => match Self::from_days(days) {
                Some(range) => DayCount::Known(range),
                None => DayCount::Other(days),
            },
            Err(_) => DayCount::Other(TimeRange::Day.days()),
        }
    }

    /// Spacing between synthesized chart points, in days.
    pub fn interval_multiplier(self) -> u32 {
        match self {
            TimeRange::Day | TimeRange::Week | TimeRange::TwoWeeks | TimeRange::Month => 1,
            TimeRange::Quarter => 3,
            TimeRange::Year => 12,
            TimeRange::ThreeYears => 36,
            TimeRange::FiveYears => 60,
        }
    }

    /// Binance kline interval whose resolution suits this range.
    pub fn kline_interval(self) -> &'static str {
        kline_interval_for_days(self.days())
    }

    pub fn is_intraday(self) -> bool {
        self == TimeRange::Day
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Day => "1D",
            TimeRange::Week => "7D",
            TimeRange::TwoWeeks => "14D",
            TimeRange::Month => "1M",
            TimeRange::Quarter => "3M",
            TimeRange::Year => "1Y",
            TimeRange::ThreeYears => "3Y",
            TimeRange::FiveYears => "5Y",
        }
    }

    pub fn title_suffix(self) -> String {
        if self.is_intraday() {
            "Today".to_string()
        } else {
            format!("Last {} Days", self.days())
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Day count accepted by the lenient parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCount {
    Known(TimeRange),
    Other(u32),
}

impl DayCount {
    pub fn days(self) -> u32 {
        match self {
            DayCount::Known(range) => range.days(),
            DayCount::Other(days) => days,
        }
    }

    pub fn interval_multiplier(self) -> u32 {
        match self {
            DayCount::Known(range) => range.interval_multiplier(),
            DayCount::Other(_) => DEFAULT_INTERVAL_MULTIPLIER,
        }
    }

    /// Window title; a day or less reads as `Today`, like the intraday range.
    pub fn title_suffix(self) -> String {
        match self {
            DayCount::Known(range) => range.title_suffix(),
            DayCount::Other(days) if days <= TimeRange::Day.days() => {
                TimeRange::Day.title_suffix()
            }
            DayCount::Other(days) => format!("Last {days} Days"),
        }
    }
}

const MINUTES_PER_DAY: u64 = 1440;

/// Longest window in days, Binance interval, interval length in minutes.
const KLINE_INTERVALS: [(u32, &str, u64); 5] = [
    (1, "1m", 1),
    (7, "15m", 15),
    (30, "1h", 60),
    (90, "4h", 240),
    (u32::MAX, "1d", MINUTES_PER_DAY),
];

fn kline_step(days: u32) -> (&'static str, u64) {
    KLINE_INTERVALS
        .iter()
        .find(|(max_days, ..)| days <= *max_days)
        .map(|(_, interval, minutes)| (*interval, *minutes))
        .unwrap_or(("1d", MINUTES_PER_DAY))
}

pub fn kline_interval_for_days(days: u32) -> &'static str {
    kline_step(days).0
}

/// Candles needed to cover `days` at the interval picked for that window.
pub fn kline_rows_for_days(days: u32) -> u64 {
    let (_, minutes) = kline_step(days);
    (u64::from(days) * MINUTES_PER_DAY + minutes - 1) / minutes
}
