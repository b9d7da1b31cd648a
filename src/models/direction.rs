use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// +1 for Up, -1 for Down. Offsets prices away from entry.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
        }
    }

    pub fn trade_label(&self) -> &'static str {
        match self {
            Direction::Up => "BUY",
            Direction::Down => "SELL",
        }
    }
}

/// Classification of one timeframe's latest snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalState {
    StrongUp,
    StrongDown,
    Neutral,
    /// Too few bars, or the provider had nothing to give.
    Insufficient,
}

impl SignalState {
    pub const ALL: [SignalState; 4] = [
        SignalState::StrongUp,
        SignalState::StrongDown,
        SignalState::Neutral,
        SignalState::Insufficient,
    ];

    pub fn strong_direction(self) -> Option<Direction> {
        match self {
            SignalState::StrongUp => Some(Direction::Up),
            SignalState::StrongDown => Some(Direction::Down),
            SignalState::Neutral | SignalState::Insufficient => None,
        }
    }

    pub fn is_insufficient(self) -> bool {
        self == SignalState::Insufficient
    }
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalState::StrongUp => write!(f, "strong_up"),
            SignalState::StrongDown => write!(f, "strong_down"),
            SignalState::Neutral => write!(f, "neutral"),
            SignalState::Insufficient => write!(f, "insufficient"),
        }
    }
}
