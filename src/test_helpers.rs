use chrono::{DateTime, Duration, Utc};

use crate::config::Config;
use crate::core::risk::RiskSettings;
use crate::models::{Bar, BarSeries};

/// Base timestamp plus `minute` minutes.
pub fn ts(minute: i64) -> DateTime<Utc> {
    let base = DateTime::parse_from_rfc3339("2024-01-17T08:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    base + Duration::minutes(minute)
}

/// Bars from closes, one minute apart, with a 1-point range around each close.
pub fn make_bars(closes: &[f64]) -> BarSeries {
    let bars: Vec<Bar> = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar {
            timestamp: ts(i as i64),
            open: c,
            high: c + 1.0,
            low: c - 1.0,
            close: c,
        })
        .collect();
    BarSeries::new(bars).unwrap()
}

/// `n` bars whose close rises 10 points per bar, starting at `start + 8`.
pub fn make_rising(n: usize, start: f64) -> BarSeries {
    let closes: Vec<f64> = (0..n).map(|i| start + i as f64 * 10.0 + 8.0).collect();
    make_bars(&closes)
}

/// `n` bars whose close falls 10 points per bar, starting at `start - 8`.
pub fn make_falling(n: usize, start: f64) -> BarSeries {
    let closes: Vec<f64> = (0..n).map(|i| start - i as f64 * 10.0 - 8.0).collect();
    make_bars(&closes)
}

pub fn default_risk_settings() -> RiskSettings {
    RiskSettings {
        account_size: 5000.0,
        risk_per_trade_pct: 0.5,
        stop_distance_points: 4.0,
        target_distance_points: 7.5,
        point_value_per_lot: 10.0,
        daily_goal_pct: 1.5,
        daily_loss_limit_pct: 5.0,
    }
}

/// Defaults with no environment involved.
pub fn default_test_config() -> Config {
    Config::from_lookup(|_| None).unwrap()
}
