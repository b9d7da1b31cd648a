use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    fn is_finite(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }
}

/// Bars ordered by strictly increasing timestamp with finite prices.
///
/// The only way to obtain one is through [`BarSeries::new`] (or serde, which
/// routes through the same check), so every consumer can rely on the ordering.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Bar>", into = "Vec<Bar>")]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self, SeriesError> {
        for (index, bar) in bars.iter().enumerate() {
            if !bar.is_finite() {
                return Err(SeriesError::NonFinite { index });
            }
            if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
                return Err(SeriesError::NotIncreasing { index });
            }
        }
        Ok(Self { bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }

    pub fn as_slice(&self) -> &[Bar] {
        &self.bars
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Last `n` bars (or all of them when shorter).
    pub fn tail(&self, n: usize) -> BarSeries {
        let start = self.bars.len().saturating_sub(n);
        BarSeries {
            bars: self.bars[start..].to_vec(),
        }
    }
}

impl TryFrom<Vec<Bar>> for BarSeries {
    type Error = SeriesError;

    fn try_from(bars: Vec<Bar>) -> Result<Self, Self::Error> {
        BarSeries::new(bars)
    }
}

impl From<BarSeries> for Vec<Bar> {
    fn from(series: BarSeries) -> Self {
        series.bars
    }
}

impl<'a> IntoIterator for &'a BarSeries {
    type Item = &'a Bar;
    type IntoIter = std::slice::Iter<'a, Bar>;
    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}

/// What a provider hands to the core for one timeframe.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketData {
    Available(BarSeries),
    Unavailable { reason: String },
}

impl MarketData {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        MarketData::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn series(&self) -> Option<&BarSeries> {
        match self {
            MarketData::Available(series) => Some(series),
            MarketData::Unavailable { .. } => None,
        }
    }
}
