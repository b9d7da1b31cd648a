use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::classifier::{PolicyPreset, ThresholdPolicy};
use crate::core::risk::RiskSettings;
use crate::core::sessions::{SessionClock, SessionWindow};
use crate::error::ConfigError;
use crate::models::Timeframe;

const DEFAULT_SESSIONS: &str = "sydney:22-7,tokyo:0-9,london:8-17,new_york:13-22";

/// Which bars to request for one timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameConfig {
    pub timeframe: Timeframe,
    pub lookback_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // Instrument
    pub symbol: String,

    // Classification policy
    pub policy: PolicyPreset,
    pub thresholds: ThresholdPolicy,

    // Account & risk
    pub risk: RiskSettings,

    // Timeframes: higher "trend" frame, lower "trigger" frame
    pub trend: FrameConfig,
    pub trigger: FrameConfig,

    // Sessions (whole UTC hours)
    pub sessions: Vec<SessionWindow>,

    // Refresh cadence and provider cache
    pub refresh_secs: u64,
    pub cache_ttl_secs: u64,

    // Offline evaluation from a JSON bar file
    pub replay_file: Option<String>,

    // Logging
    pub log_level: String,
}

impl Config {
    /// Reads `.env` and the process environment, then validates.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Missing keys take the documented defaults; a key that is present but
    /// does not parse is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let policy = match get("SNIPER_POLICY") {
            Some(raw) => PolicyPreset::from_str_loose(&raw).ok_or(ConfigError::Parse {
                key: "SNIPER_POLICY".to_string(),
                value: raw,
            })?,
            None => PolicyPreset::Premium,
        };
        let preset = policy.thresholds();
        let thresholds = ThresholdPolicy {
            upper: parse_or(&get, "SNIPER_UPPER_THRESHOLD", preset.upper)?,
            lower: parse_or(&get, "SNIPER_LOWER_THRESHOLD", preset.lower)?,
        };

        let risk = RiskSettings {
            account_size: parse_or(&get, "ACCOUNT_SIZE", 5000.0)?,
            risk_per_trade_pct: parse_or(&get, "RISK_PER_TRADE_PCT", 0.5)?,
            stop_distance_points: parse_or(&get, "STOP_DISTANCE_POINTS", 4.0)?,
            target_distance_points: parse_or(&get, "TARGET_DISTANCE_POINTS", 7.5)?,
            point_value_per_lot: parse_or(&get, "POINT_VALUE_PER_LOT", 10.0)?,
            daily_goal_pct: parse_or(&get, "DAILY_GOAL_PCT", 1.5)?,
            daily_loss_limit_pct: parse_or(&get, "DAILY_LOSS_LIMIT_PCT", 5.0)?,
        };

        let trend = FrameConfig {
            timeframe: timeframe_or(&get, "TREND_TIMEFRAME", Timeframe::H1)?,
            lookback_days: parse_or(&get, "TREND_LOOKBACK_DAYS", 5)?,
        };
        let trigger = FrameConfig {
            timeframe: timeframe_or(&get, "TRIGGER_TIMEFRAME", Timeframe::M15)?,
            lookback_days: parse_or(&get, "TRIGGER_LOOKBACK_DAYS", 2)?,
        };

        let sessions = SessionWindow::parse_table(
            &get("SESSIONS").unwrap_or_else(|| DEFAULT_SESSIONS.to_string()),
        )?;

        let cfg = Config {
            symbol: get("SNIPER_SYMBOL").unwrap_or_else(|| "GC=F".to_string()),
            policy,
            thresholds,
            risk,
            trend,
            trigger,
            sessions,
            refresh_secs: parse_or(&get, "REFRESH_SECS", 60)?,
            cache_ttl_secs: parse_or(&get, "CACHE_TTL_SECS", 60)?,
            replay_file: get("SNIPER_REPLAY_FILE"),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol.is_empty() {
            return Err(ConfigError::invalid("SNIPER_SYMBOL", "is empty"));
        }
        self.thresholds.validate()?;
        self.risk.validate()?;
        SessionClock::new(self.sessions.clone())?;

        if self.trend.timeframe <= self.trigger.timeframe {
            return Err(ConfigError::invalid(
                "TREND_TIMEFRAME",
                format!(
                    "trend frame {} must be higher than trigger frame {}",
                    self.trend.timeframe, self.trigger.timeframe
                ),
            ));
        }
        for (key, frame) in [
            ("TREND_LOOKBACK_DAYS", self.trend),
            ("TRIGGER_LOOKBACK_DAYS", self.trigger),
        ] {
            let max = frame.timeframe.max_lookback_days();
            if frame.lookback_days == 0 || frame.lookback_days > max {
                return Err(ConfigError::invalid(
                    key,
                    format!("must be 1..={max} days for {} bars", frame.timeframe),
                ));
            }
        }
        if self.refresh_secs == 0 {
            return Err(ConfigError::invalid("REFRESH_SECS", "must be > 0"));
        }
        Ok(())
    }

    /// Frames in evaluation order: trend first, trigger last.
    pub fn frames(&self) -> [FrameConfig; 2] {
        [self.trend, self.trigger]
    }
}

fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match get(key) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Parse {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

fn timeframe_or(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Timeframe,
) -> Result<Timeframe, ConfigError> {
    match get(key) {
        Some(raw) => Timeframe::from_str_loose(&raw).ok_or(ConfigError::Parse {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}
