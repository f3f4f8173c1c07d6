use super::model::PricePoint;
use super::range::DayCount;

const INTRADAY_POINTS: i64 = 144;
const INTRADAY_STEP_MS: i64 = 10 * 60 * 1000;
const DAY_MS: i64 = 86_400_000;
const INTRADAY_WAVE: f64 = 0.001;
const DAILY_SLOPE: f64 = 0.005;

/// Build a chart series around the latest aggregate figure.
///
/// The global endpoint only reports the current value, so the series is
/// synthesized: intraday ranges use 144 points ten minutes apart with a
/// small sinusoidal wave; longer ranges use one point every
/// `interval_multiplier` days with a linear slope.
pub fn synthesize_series(latest: f64, days: DayCount, now_ms: i64) -> Vec<PricePoint> {
    if days.days() <= 1 {
        return (0..INTRADAY_POINTS)
            .map(|i| {
                let timestamp_ms = now_ms - (INTRADAY_POINTS - 1 - i) * INTRADAY_STEP_MS;
                PricePoint::new(timestamp_ms, latest * (1.0 + INTRADAY_WAVE * (i as f64).sin()))
            })
            .collect();
    }

    let interval = i64::from(days.interval_multiplier().max(1));
    let count = i64::from(days.days()) / interval;

    (0..count)
        .map(|i| {
            let timestamp_ms = now_ms - (count - 1 - i) * interval * DAY_MS;
            PricePoint::new(timestamp_ms, latest * (1.0 - i as f64 * DAILY_SLOPE))
        })
        .collect()
}
