use serde::{Deserialize, Serialize};

use crate::core::indicators::IndicatorSnapshot;
use crate::models::{Direction, SignalState, Timeframe};

/// One timeframe's classification and the readings behind it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeframeSignal {
    pub timeframe: Timeframe,
    pub state: SignalState,
    /// Latest close; absent when the frame is insufficient.
    pub price: Option<f64>,
    pub moving_average: Option<f64>,
    pub oscillator: Option<f64>,
}

impl TimeframeSignal {
    pub fn new(timeframe: Timeframe, state: SignalState, snapshot: Option<&IndicatorSnapshot>) -> Self {
        Self {
            timeframe,
            state,
            price: snapshot.map(|s| s.last_close),
            moving_average: snapshot.map(|s| s.moving_average),
            oscillator: snapshot.map(|s| s.oscillator),
        }
    }

    pub fn insufficient(timeframe: Timeframe) -> Self {
        Self::new(timeframe, SignalState::Insufficient, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeParameters {
    pub direction: Direction,
    pub entry_price: f64,
    pub stop_price: f64,
    pub target_price: f64,
    pub position_size: f64,
    pub risk_amount: f64,
    pub reward_amount: f64,
}

impl TradeParameters {
    pub fn reward_to_risk(&self) -> f64 {
        self.reward_amount / self.risk_amount
    }
}
