use serde::{Deserialize, Serialize};

use crate::models::{Direction, SignalState};
use crate::strategies::signals::TimeframeSignal;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfluenceResult {
    pub aligned: bool,
    /// `None` unless aligned.
    pub direction: Option<Direction>,
    /// Latest close of the trigger (lowest) timeframe.
    pub reference_price: Option<f64>,
}

/// Unanimous agreement on a strong state across every frame.
///
/// `frames` runs from the highest timeframe to the trigger frame; the trigger
/// is the last entry and supplies the reference price. Returns `None` for an
/// empty slice.
pub fn resolve_frames(frames: &[TimeframeSignal]) -> Option<ConfluenceResult> {
    let trigger = frames.last()?;
    let first = frames.first()?.state;

    let direction = first
        .strong_direction()
        .filter(|_| frames.iter().all(|f| f.state == first));

    Some(ConfluenceResult {
        aligned: direction.is_some(),
        direction,
        reference_price: trigger.price,
    })
}

/// Two-frame form: a higher "trend" frame and a lower "trigger" frame.
pub fn resolve(trend: &TimeframeSignal, trigger: &TimeframeSignal) -> ConfluenceResult {
    let direction = match (trend.state, trigger.state) {
        (SignalState::StrongUp, SignalState::StrongUp) => Some(Direction::Up),
        (SignalState::StrongDown, SignalState::StrongDown) => Some(Direction::Down),
        _ => None,
    };
    ConfluenceResult {
        aligned: direction.is_some(),
        direction,
        reference_price: trigger.price,
    }
}
