use serde::{Deserialize, Serialize};

use crate::core::confluence::ConfluenceResult;
use crate::error::ConfigError;
use crate::strategies::signals::TradeParameters;

/// Fixed account and per-trade risk settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskSettings {
    pub account_size: f64,
    /// Percent of the account risked per trade (0.5 means 0.5%).
    pub risk_per_trade_pct: f64,
    pub stop_distance_points: f64,
    pub target_distance_points: f64,
    /// Currency value of one point for one lot.
    pub point_value_per_lot: f64,
    pub daily_goal_pct: f64,
    pub daily_loss_limit_pct: f64,
}

impl RiskSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("account_size", self.account_size),
            ("risk_per_trade_pct", self.risk_per_trade_pct),
            ("stop_distance_points", self.stop_distance_points),
            ("target_distance_points", self.target_distance_points),
            ("point_value_per_lot", self.point_value_per_lot),
            ("daily_goal_pct", self.daily_goal_pct),
            ("daily_loss_limit_pct", self.daily_loss_limit_pct),
        ];
        for (key, v) in checks {
            if !(v.is_finite() && v > 0.0) {
                return Err(ConfigError::invalid(key, format!("{v} must be a positive number")));
            }
        }
        if self.risk_per_trade_pct > 100.0 {
            return Err(ConfigError::invalid(
                "risk_per_trade_pct",
                format!("{} exceeds the whole account", self.risk_per_trade_pct),
            ));
        }
        Ok(())
    }

    /// Currency at risk on one trade before sizing.
    pub fn risk_budget(&self) -> f64 {
        self.account_size * (self.risk_per_trade_pct / 100.0)
    }

    pub fn daily_plan(&self) -> DailyPlan {
        DailyPlan {
            goal_amount: self.account_size * (self.daily_goal_pct / 100.0),
            loss_limit_amount: self.account_size * (self.daily_loss_limit_pct / 100.0),
            risk_per_trade: self.risk_budget(),
            reward_per_trade: self.risk_budget() * self.reward_multiple(),
        }
    }

    pub fn reward_multiple(&self) -> f64 {
        self.target_distance_points / self.stop_distance_points
    }
}

/// Day-level money targets derived from the risk settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPlan {
    pub goal_amount: f64,
    pub loss_limit_amount: f64,
    pub risk_per_trade: f64,
    pub reward_per_trade: f64,
}

/// Fixed-fractional position sizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskSizer {
    settings: RiskSettings,
}

impl RiskSizer {
    pub fn new(settings: RiskSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &RiskSettings {
        &self.settings
    }

    /// `None` unless the confluence is aligned with a direction and a price.
    ///
    /// `risk_amount` is computed from the position size with the same
    /// expression a caller would use to check it, so
    /// `position_size * stop_distance_points * point_value_per_lot == risk_amount`
    /// holds bit for bit.
    pub fn size(&self, confluence: &ConfluenceResult) -> Option<TradeParameters> {
        if !confluence.aligned {
            return None;
        }
        let direction = confluence.direction?;
        let entry_price = confluence.reference_price?;
        let s = &self.settings;

        let sign = direction.sign();
        let stop_price = entry_price - sign * s.stop_distance_points;
        let target_price = entry_price + sign * s.target_distance_points;

        let position_size = s.risk_budget() / (s.stop_distance_points * s.point_value_per_lot);
        let risk_amount = position_size * s.stop_distance_points * s.point_value_per_lot;
        let reward_amount = risk_amount * (s.target_distance_points / s.stop_distance_points);

        Some(TradeParameters {
            direction,
            entry_price,
            stop_price,
            target_price,
            position_size,
            risk_amount,
            reward_amount,
        })
    }
}
