use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::Config;
use crate::core::classifier::SignalClassifier;
use crate::core::confluence::{self, ConfluenceResult};
use crate::core::indicators::IndicatorEngine;
use crate::core::risk::RiskSizer;
use crate::core::sessions::{SessionClock, SessionStatus};
use crate::error::ConfigError;
use crate::models::{MarketData, Timeframe};
use crate::strategies::signals::{TimeframeSignal, TradeParameters};

/// Outcome of one evaluation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// At least one frame could not be classified; confluence was not evaluated.
    AwaitingData,
    /// Every frame classified, but they do not agree on a strong state.
    Standby,
    Opportunity(TradeParameters),
}

impl Verdict {
    pub fn trade(&self) -> Option<&TradeParameters> {
        match self {
            Verdict::Opportunity(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Highest timeframe first, trigger frame last.
    pub signals: Vec<TimeframeSignal>,
    pub confluence: Option<ConfluenceResult>,
    pub verdict: Verdict,
}

/// Everything the presentation layer renders for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarReport {
    pub evaluated_at: DateTime<Utc>,
    pub symbol: String,
    pub evaluation: Evaluation,
    pub sessions: Vec<SessionStatus>,
}

/// Indicator -> classifier -> confluence -> sizing, for any number of frames.
///
/// Holds only immutable settings, so one engine can serve concurrent cycles.
#[derive(Debug, Clone)]
pub struct ConfluenceEngine {
    indicators: IndicatorEngine,
    classifier: SignalClassifier,
    sizer: RiskSizer,
    sessions: SessionClock,
}

impl ConfluenceEngine {
    pub fn new(
        indicators: IndicatorEngine,
        classifier: SignalClassifier,
        sizer: RiskSizer,
        sessions: SessionClock,
    ) -> Self {
        Self {
            indicators,
            classifier,
            sizer,
            sessions,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        cfg.thresholds.validate()?;
        Ok(Self::new(
            IndicatorEngine::default(),
            SignalClassifier::new(cfg.thresholds),
            RiskSizer::new(cfg.risk)?,
            SessionClock::new(cfg.sessions.clone())?,
        ))
    }

    pub fn sizer(&self) -> &RiskSizer {
        &self.sizer
    }

    pub fn sessions(&self) -> &SessionClock {
        &self.sessions
    }

    pub fn classify_frame(&self, timeframe: Timeframe, data: &MarketData) -> TimeframeSignal {
        let series = match data {
            MarketData::Available(series) => series,
            MarketData::Unavailable { reason } => {
                debug!("{} unavailable: {}", timeframe, reason);
                return TimeframeSignal::insufficient(timeframe);
            }
        };

        let snapshot = self.indicators.snapshot(series);
        if snapshot.is_none() {
            debug!(
                "{} has {} bars, needs {}",
                timeframe,
                series.len(),
                self.indicators.min_bars()
            );
        }
        let state = self.classifier.classify(snapshot.as_ref());
        trace!("{} -> {} {:?}", timeframe, state, snapshot);
        TimeframeSignal::new(timeframe, state, snapshot.as_ref())
    }

    /// Resolve already-classified frames into a verdict.
    pub fn decide(&self, signals: Vec<TimeframeSignal>) -> Evaluation {
        if signals.is_empty() || signals.iter().any(|s| s.state.is_insufficient()) {
            return Evaluation {
                signals,
                confluence: None,
                verdict: Verdict::AwaitingData,
            };
        }

        let confluence = confluence::resolve_frames(&signals);
        let verdict = match confluence.as_ref().and_then(|c| self.sizer.size(c)) {
            Some(trade) => Verdict::Opportunity(trade),
            None => Verdict::Standby,
        };

        Evaluation {
            signals,
            confluence,
            verdict,
        }
    }

    /// `frames` runs from the highest timeframe down to the trigger frame.
    pub fn evaluate(&self, frames: &[(Timeframe, MarketData)]) -> Evaluation {
        let signals = frames
            .iter()
            .map(|(tf, data)| self.classify_frame(*tf, data))
            .collect();
        self.decide(signals)
    }

    pub fn report(
        &self,
        symbol: &str,
        frames: &[(Timeframe, MarketData)],
        utc_now: DateTime<Utc>,
    ) -> RadarReport {
        RadarReport {
            evaluated_at: utc_now,
            symbol: symbol.to_string(),
            evaluation: self.evaluate(frames),
            sessions: self.sessions.statuses(utc_now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, SignalState};
    use crate::test_helpers::{default_test_config, make_falling, make_rising};

    fn engine() -> ConfluenceEngine {
        ConfluenceEngine::from_config(&default_test_config()).unwrap()
    }

    fn signal(tf: Timeframe, state: SignalState, close: f64, ma: f64, osc: f64) -> TimeframeSignal {
        TimeframeSignal {
            timeframe: tf,
            state,
            price: Some(close),
            moving_average: Some(ma),
            oscillator: Some(osc),
        }
    }

    #[test]
    fn scenario_both_frames_strong_up() {
        let e = engine();
        let classifier = SignalClassifier::new(default_test_config().thresholds);
        let trend_snap = crate::core::indicators::IndicatorSnapshot {
            moving_average: 1990.0,
            oscillator: 65.0,
            last_close: 2000.0,
        };
        let trigger_snap = crate::core::indicators::IndicatorSnapshot {
            moving_average: 1995.0,
            oscillator: 63.0,
            last_close: 2001.0,
        };
        let trend = TimeframeSignal::new(
            Timeframe::H1,
            classifier.classify(Some(&trend_snap)),
            Some(&trend_snap),
        );
        let trigger = TimeframeSignal::new(
            Timeframe::M15,
            classifier.classify(Some(&trigger_snap)),
            Some(&trigger_snap),
        );
        assert_eq!(trend.state, SignalState::StrongUp);
        assert_eq!(trigger.state, SignalState::StrongUp);

        let eval = e.decide(vec![trend, trigger]);
        let c = eval.confluence.unwrap();
        assert!(c.aligned);
        assert_eq!(c.direction, Some(Direction::Up));

        let t = eval.verdict.trade().unwrap();
        assert!((t.entry_price - 2001.0).abs() < 1e-9);
        assert!((t.risk_amount - 25.0).abs() < 1e-9);
        assert!((t.position_size - 0.625).abs() < 1e-9);
        assert!((t.reward_amount - 46.9).abs() < 0.05);
    }

    #[test]
    fn scenario_opposite_frames_stand_by() {
        let eval = engine().decide(vec![
            signal(Timeframe::H1, SignalState::StrongUp, 2000.0, 1990.0, 65.0),
            signal(Timeframe::M15, SignalState::StrongDown, 1980.0, 1990.0, 30.0),
        ]);
        let c = eval.confluence.unwrap();
        assert!(!c.aligned);
        assert_eq!(c.direction, None);
        assert_eq!(eval.verdict, Verdict::Standby);
        assert!(eval.verdict.trade().is_none());
    }

    #[test]
    fn scenario_short_series_awaits_data() {
        let frames = [
            (Timeframe::H1, MarketData::Available(make_rising(10, 2000.0))),
            (Timeframe::M15, MarketData::Available(make_rising(10, 2000.0))),
        ];
        let eval = engine().evaluate(&frames);
        assert!(eval.signals.iter().all(|s| s.state == SignalState::Insufficient));
        assert!(eval.confluence.is_none());
        assert_eq!(eval.verdict, Verdict::AwaitingData);
    }

    #[test]
    fn unavailable_frame_treated_as_insufficient() {
        let frames = [
            (Timeframe::H1, MarketData::Available(make_rising(30, 2000.0))),
            (Timeframe::M15, MarketData::unavailable("timeout")),
        ];
        let eval = engine().evaluate(&frames);
        assert_eq!(eval.signals[0].state, SignalState::StrongUp);
        assert_eq!(eval.signals[1].state, SignalState::Insufficient);
        assert_eq!(eval.signals[1].price, None);
        assert_eq!(eval.verdict, Verdict::AwaitingData);
    }

    #[test]
    fn falling_series_on_both_frames_goes_short() {
        let frames = [
            (Timeframe::H1, MarketData::Available(make_falling(30, 2100.0))),
            (Timeframe::M15, MarketData::Available(make_falling(40, 2050.0))),
        ];
        let eval = engine().evaluate(&frames);
        let t = eval.verdict.trade().unwrap();
        assert_eq!(t.direction, Direction::Down);
        let trigger_close = eval.signals[1].price.unwrap();
        assert!((t.entry_price - trigger_close).abs() < 1e-9);
        assert!(t.stop_price > t.entry_price);
        assert!(t.target_price < t.entry_price);
    }

    #[test]
    fn report_carries_sessions() {
        use chrono::TimeZone;
        let now = Utc.with_ymd_and_hms(2024, 1, 17, 9, 0, 0).unwrap();
        let frames = [(Timeframe::H1, MarketData::unavailable("down"))];
        let r = engine().report("GC=F", &frames, now);
        assert_eq!(r.symbol, "GC=F");
        assert!(r.sessions.iter().any(|s| s.name == "london" && s.open));
        assert_eq!(r.evaluation.verdict, Verdict::AwaitingData);
    }

    #[test]
    fn no_frames_awaits_data() {
        assert_eq!(engine().decide(Vec::new()).verdict, Verdict::AwaitingData);
    }
}
