use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::indicators::IndicatorSnapshot;
use crate::error::ConfigError;
use crate::models::SignalState;

/// Named oscillator bounds used to call a timeframe strong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyPreset {
    Premium,
    Standard,
    Relaxed,
}

impl PolicyPreset {
    pub fn thresholds(self) -> ThresholdPolicy {
        let (upper, lower) = match self {
            PolicyPreset::Premium => (62.0, 38.0),
            PolicyPreset::Standard => (60.0, 40.0),
            PolicyPreset::Relaxed => (55.0, 45.0),
        };
        ThresholdPolicy { upper, lower }
    }

    pub fn from_str_loose(s: &str) -> Option<PolicyPreset> {
        match s.trim().to_lowercase().as_str() {
            "premium" => Some(PolicyPreset::Premium),
            "standard" => Some(PolicyPreset::Standard),
            "relaxed" => Some(PolicyPreset::Relaxed),
            _ => None,
        }
    }
}

impl fmt::Display for PolicyPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyPreset::Premium => write!(f, "premium"),
            PolicyPreset::Standard => write!(f, "standard"),
            PolicyPreset::Relaxed => write!(f, "relaxed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    pub upper: f64,
    pub lower: f64,
}

impl ThresholdPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, v) in [("upper_threshold", self.upper), ("lower_threshold", self.lower)] {
            if !(v > 0.0 && v < 100.0) {
                return Err(ConfigError::invalid(key, format!("{v} is outside (0, 100)")));
            }
        }
        if self.upper <= self.lower {
            return Err(ConfigError::invalid(
                "upper_threshold",
                format!("{} must be above lower threshold {}", self.upper, self.lower),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalClassifier {
    policy: ThresholdPolicy,
}

impl SignalClassifier {
    pub fn new(policy: ThresholdPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ThresholdPolicy {
        self.policy
    }

    /// Both trend (price vs. average) and momentum (oscillator beyond its
    /// bound) must agree for a strong call. Equality on either side is Neutral.
    pub fn classify(&self, snapshot: Option<&IndicatorSnapshot>) -> SignalState {
        let Some(s) = snapshot else {
            return SignalState::Insufficient;
        };
        if s.last_close > s.moving_average && s.oscillator > self.policy.upper {
            SignalState::StrongUp
        } else if s.last_close < s.moving_average && s.oscillator < self.policy.lower {
            SignalState::StrongDown
        } else {
            SignalState::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(close: f64, ma: f64, osc: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            moving_average: ma,
            oscillator: osc,
            last_close: close,
        }
    }

    fn premium() -> SignalClassifier {
        SignalClassifier::new(PolicyPreset::Premium.thresholds())
    }

    #[test]
    fn absent_snapshot_is_insufficient() {
        assert_eq!(premium().classify(None), SignalState::Insufficient);
    }

    #[test]
    fn strong_up_needs_price_and_momentum() {
        let c = premium();
        assert_eq!(c.classify(Some(&snap(2000.0, 1990.0, 65.0))), SignalState::StrongUp);
        // momentum without price
        assert_eq!(c.classify(Some(&snap(1980.0, 1990.0, 65.0))), SignalState::Neutral);
        // price without momentum
        assert_eq!(c.classify(Some(&snap(2000.0, 1990.0, 55.0))), SignalState::Neutral);
    }

    #[test]
    fn strong_down_needs_price_and_momentum() {
        let c = premium();
        assert_eq!(c.classify(Some(&snap(1980.0, 1990.0, 30.0))), SignalState::StrongDown);
        assert_eq!(c.classify(Some(&snap(1995.0, 1990.0, 30.0))), SignalState::Neutral);
    }

    #[test]
    fn boundaries_are_neutral() {
        let c = premium();
        assert_eq!(c.classify(Some(&snap(2000.0, 1990.0, 62.0))), SignalState::Neutral);
        assert_eq!(c.classify(Some(&snap(1980.0, 1990.0, 38.0))), SignalState::Neutral);
        assert_eq!(c.classify(Some(&snap(1990.0, 1990.0, 90.0))), SignalState::Neutral);
    }

    #[test]
    fn looser_policy_admits_more() {
        let s = snap(2000.0, 1990.0, 61.0);
        assert_eq!(premium().classify(Some(&s)), SignalState::Neutral);
        let standard = SignalClassifier::new(PolicyPreset::Standard.thresholds());
        assert_eq!(standard.classify(Some(&s)), SignalState::StrongUp);
    }

    #[test]
    fn threshold_validation() {
        assert!(PolicyPreset::Relaxed.thresholds().validate().is_ok());
        let inverted = ThresholdPolicy { upper: 40.0, lower: 60.0 };
        assert!(inverted.validate().is_err());
        let equal = ThresholdPolicy { upper: 50.0, lower: 50.0 };
        assert!(equal.validate().is_err());
        let out_of_range = ThresholdPolicy { upper: 100.0, lower: 40.0 };
        assert!(out_of_range.validate().is_err());
        let nan = ThresholdPolicy { upper: f64::NAN, lower: 40.0 };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn preset_parsing() {
        assert_eq!(PolicyPreset::from_str_loose("Premium"), Some(PolicyPreset::Premium));
        assert_eq!(PolicyPreset::from_str_loose("strict"), None);
    }
}
