pub mod memory;
pub mod yahoo;

pub use memory::MemoryProvider;
pub use yahoo::YahooClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{Config, FrameConfig};
use crate::error::ProviderError;
use crate::models::{BarSeries, MarketData, Timeframe};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarRequest {
    pub symbol: String,
    pub interval: Timeframe,
    pub lookback_days: u32,
}

impl BarRequest {
    pub fn for_frame(symbol: &str, frame: &FrameConfig) -> Self {
        Self {
            symbol: symbol.to_string(),
            interval: frame.timeframe,
            lookback_days: frame.lookback_days,
        }
    }
}

/// Source of bar series. Implementations either return a complete validated
/// series or an error; they never hand back partial data.
#[async_trait]
pub trait BarProvider: Send + Sync {
    async fn fetch_bars(&mut self, request: &BarRequest) -> Result<BarSeries, ProviderError>;
}

/// Fetch one frame and turn any provider failure into `MarketData::Unavailable`.
pub async fn fetch_market_data(provider: &mut dyn BarProvider, request: &BarRequest) -> MarketData {
    match provider.fetch_bars(request).await {
        Ok(series) if series.is_empty() => {
            warn!("{} {}: {}", request.symbol, request.interval, ProviderError::Empty);
            MarketData::unavailable(ProviderError::Empty.to_string())
        }
        Ok(series) => MarketData::Available(series),
        Err(e) => {
            warn!("{} {}: {}", request.symbol, request.interval, e);
            MarketData::unavailable(e.to_string())
        }
    }
}

/// Fetch every configured frame, trend first.
pub async fn fetch_frames(
    provider: &mut dyn BarProvider,
    cfg: &Config,
) -> Vec<(Timeframe, MarketData)> {
    let mut frames = Vec::with_capacity(2);
    for frame in cfg.frames() {
        let request = BarRequest::for_frame(&cfg.symbol, &frame);
        frames.push((frame.timeframe, fetch_market_data(provider, &request).await));
    }
    frames
}
