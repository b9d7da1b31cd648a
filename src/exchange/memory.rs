use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};

use crate::error::ProviderError;
use crate::exchange::{BarProvider, BarRequest};
use crate::models::{BarSeries, Timeframe};

/// A provider over pre-loaded series. A cursor (`now`) controls which bars
/// are visible: only bars at or before `now` and inside the request's
/// lookback are returned.
pub struct MemoryProvider {
    data: HashMap<Timeframe, BarSeries>,
    unavailable: HashSet<Timeframe>,
    now: Option<DateTime<Utc>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            unavailable: HashSet::new(),
            now: None,
        }
    }

    /// Parses `{ "1h": [bars...], "15m": [bars...] }`.
    pub fn from_json(raw: &str) -> Result<Self, ProviderError> {
        let parsed: HashMap<String, BarSeries> = serde_json::from_str(raw)?;
        let mut provider = Self::new();
        for (key, series) in parsed {
            let tf = Timeframe::from_str_loose(&key)
                .ok_or_else(|| ProviderError::Api(format!("unknown timeframe {key:?}")))?;
            provider.load(tf, series);
        }
        Ok(provider)
    }

    pub fn load(&mut self, tf: Timeframe, series: BarSeries) {
        self.data.insert(tf, series);
    }

    /// Make every fetch of `tf` fail, as a down upstream would.
    pub fn mark_unavailable(&mut self, tf: Timeframe) {
        self.unavailable.insert(tf);
    }

    /// Pin the replay clock. Without it, the last loaded bar is "now".
    pub fn set_time(&mut self, t: DateTime<Utc>) {
        self.now = Some(t);
    }

    pub fn latest_time(&self) -> Option<DateTime<Utc>> {
        self.data
            .values()
            .filter_map(|s| s.last().map(|b| b.timestamp))
            .max()
    }

    fn visible(&self, series: &BarSeries, lookback_days: u32) -> BarSeries {
        let Some(now) = self.now.or_else(|| series.last().map(|b| b.timestamp)) else {
            return BarSeries::default();
        };
        let bars = series.as_slice();
        let end = bars.partition_point(|b| b.timestamp <= now);
        // a lookback reaching past chrono's range keeps the whole history
        let start = match now.checked_sub_signed(Duration::days(i64::from(lookback_days))) {
            Some(from) => bars[..end].partition_point(|b| b.timestamp <= from),
            None => 0,
        };
        // a contiguous slice of a valid series is still valid
        BarSeries::new(bars[start..end].to_vec()).unwrap_or_default()
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BarProvider for MemoryProvider {
    async fn fetch_bars(&mut self, request: &BarRequest) -> Result<BarSeries, ProviderError> {
        if self.unavailable.contains(&request.interval) {
            return Err(ProviderError::Api(format!("{} marked unavailable", request.interval)));
        }
        let series = self
            .data
            .get(&request.interval)
            .ok_or_else(|| ProviderError::NotLoaded(request.interval.to_string()))?;
        Ok(self.visible(series, request.lookback_days))
    }
}
