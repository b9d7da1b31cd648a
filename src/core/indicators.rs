use serde::{Deserialize, Serialize};

use crate::core::window::{deltas, TrailingWindow};
use crate::error::ConfigError;
use crate::models::BarSeries;

pub const MA_PERIOD: usize = 20;
pub const RSI_PERIOD: usize = 14;

/// Latest indicator readings of one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub moving_average: f64,
    pub oscillator: f64,
    pub last_close: f64,
}

/// Trailing simple moving average plus a simple-mean RSI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorEngine {
    ma_window: TrailingWindow,
    rsi_window: TrailingWindow,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self {
            ma_window: TrailingWindow::fixed(MA_PERIOD),
            rsi_window: TrailingWindow::fixed(RSI_PERIOD),
        }
    }
}

impl IndicatorEngine {
    pub fn with_periods(ma_period: usize, rsi_period: usize) -> Result<Self, ConfigError> {
        let ma_window = TrailingWindow::new(ma_period)
            .ok_or_else(|| ConfigError::invalid("ma_period", "must be > 0"))?;
        let rsi_window = TrailingWindow::new(rsi_period)
            .ok_or_else(|| ConfigError::invalid("rsi_period", "must be > 0"))?;
        Ok(Self {
            ma_window,
            rsi_window,
        })
    }

    /// Bars needed before a snapshot exists. The RSI consumes one extra bar
    /// because it works on close-to-close deltas.
    pub fn min_bars(&self) -> usize {
        self.ma_window.size().max(self.rsi_window.size() + 1)
    }

    /// `None` when the series is shorter than [`Self::min_bars`].
    pub fn snapshot(&self, series: &BarSeries) -> Option<IndicatorSnapshot> {
        if series.len() < self.min_bars() {
            return None;
        }
        let closes = series.closes();
        let last_close = *closes.last()?;
        let moving_average = self.ma_window.mean(&closes)?;
        let oscillator = self.oscillator(&closes)?;
        Some(IndicatorSnapshot {
            moving_average,
            oscillator,
            last_close,
        })
    }

    /// RSI over the trailing window of deltas, saturating to 100 when the
    /// mean loss is exactly zero.
    pub fn oscillator(&self, closes: &[f64]) -> Option<f64> {
        let d = deltas(closes);
        let gain = self.rsi_window.mean_by(&d, |x| x.max(0.0))?;
        let loss = self.rsi_window.mean_by(&d, |x| (-x).max(0.0))?;
        if loss == 0.0 {
            return Some(100.0);
        }
        Some(100.0 - 100.0 / (1.0 + gain / loss))
    }
}
