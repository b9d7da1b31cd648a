#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use prop_sniper::models::{Bar, BarSeries};

/// Bars from closes at a fixed spacing, with a 1-point range around each close.
pub fn make_series(closes: &[f64], spacing: Duration) -> BarSeries {
    let base = DateTime::parse_from_rfc3339("2024-01-17T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc);

    let bars: Vec<Bar> = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar {
            timestamp: base + spacing * i as i32,
            open: c,
            high: c + 1.0,
            low: c - 1.0,
            close: c,
        })
        .collect();

    BarSeries::new(bars).unwrap()
}

/// Closes climbing by `step` per bar from `start`.
pub fn rising_closes(n: usize, start: f64, step: f64) -> Vec<f64> {
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Closes dropping by `step` per bar from `start`.
pub fn falling_closes(n: usize, start: f64, step: f64) -> Vec<f64> {
    (0..n).map(|i| start - i as f64 * step).collect()
}
