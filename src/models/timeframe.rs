use serde::{Deserialize, Serialize};
use std::fmt;

/// Bar interval. Ordered from shortest to longest so a trend frame can be
/// checked against its trigger frame with `>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "1d")]
    D1,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M1 => "1m",
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::M30 => "30m",
            Timeframe::H1 => "1h",
            Timeframe::D1 => "1d",
        }
    }

    pub const fn minutes(self) -> u32 {
        match self {
            Timeframe::M1 => 1,
            Timeframe::M5 => 5,
            Timeframe::M15 => 15,
            Timeframe::M30 => 30,
            Timeframe::H1 => 60,
            Timeframe::D1 => 1440,
        }
    }

    /// Yahoo chart API `interval` parameter
    pub fn yahoo_interval(&self) -> &'static str {
        match self {
            Timeframe::H1 => "60m",
            other => other.as_str(),
        }
    }

    /// Longest history Yahoo serves for this interval, in days.
    pub const fn max_lookback_days(self) -> u32 {
        match self {
            Timeframe::M1 => 7,
            Timeframe::M5 | Timeframe::M15 | Timeframe::M30 => 60,
            Timeframe::H1 => 730,
            Timeframe::D1 => 36_500,
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Timeframe> {
        match s.trim().to_lowercase().as_str() {
            "1m" => Some(Timeframe::M1),
            "5m" => Some(Timeframe::M5),
            "15m" => Some(Timeframe::M15),
            "30m" => Some(Timeframe::M30),
            "1h" | "60m" => Some(Timeframe::H1),
            "1d" => Some(Timeframe::D1),
            _ => None,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
