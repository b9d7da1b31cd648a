use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ConfigError;

/// A named market session in whole UTC hours. `start > end` wraps midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionWindow {
    pub name: String,
    pub start_hour_utc: u32,
    pub end_hour_utc: u32,
}

impl SessionWindow {
    pub fn new(name: &str, start_hour_utc: u32, end_hour_utc: u32) -> Self {
        Self {
            name: name.to_string(),
            start_hour_utc,
            end_hour_utc,
        }
    }

    pub fn wraps(&self) -> bool {
        self.start_hour_utc > self.end_hour_utc
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        if self.wraps() {
            hour >= self.start_hour_utc || hour < self.end_hour_utc
        } else {
            hour >= self.start_hour_utc && hour < self.end_hour_utc
        }
    }

    /// Parses `name:start-end[,name:start-end...]`.
    pub fn parse_table(raw: &str) -> Result<Vec<SessionWindow>, ConfigError> {
        let parse_err = || ConfigError::Parse {
            key: "SESSIONS".to_string(),
            value: raw.to_string(),
        };
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (name, hours) = entry.split_once(':').ok_or_else(parse_err)?;
                let (start, end) = hours.split_once('-').ok_or_else(parse_err)?;
                let start = start.trim().parse().map_err(|_| parse_err())?;
                let end = end.trim().parse().map_err(|_| parse_err())?;
                Ok(SessionWindow::new(name.trim(), start, end))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub name: String,
    pub open: bool,
}

/// Reports which sessions are open at a given instant. Holds only the
/// window table; every query is recomputed from the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClock {
    windows: Vec<SessionWindow>,
}

impl SessionClock {
    pub fn new(windows: Vec<SessionWindow>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for w in &windows {
            if w.name.is_empty() {
                return Err(ConfigError::invalid("sessions", "session name is empty"));
            }
            if !seen.insert(w.name.as_str()) {
                return Err(ConfigError::invalid(
                    "sessions",
                    format!("duplicate session {}", w.name),
                ));
            }
            if w.start_hour_utc > 23 || w.end_hour_utc > 23 {
                return Err(ConfigError::invalid(
                    "sessions",
                    format!("{}: hours must be within 0..=23", w.name),
                ));
            }
            if w.start_hour_utc == w.end_hour_utc {
                return Err(ConfigError::invalid(
                    "sessions",
                    format!("{}: start and end hour are equal", w.name),
                ));
            }
        }
        Ok(Self { windows })
    }

    pub fn windows(&self) -> &[SessionWindow] {
        &self.windows
    }

    /// Status of every window, in table order.
    pub fn statuses(&self, utc_now: DateTime<Utc>) -> Vec<SessionStatus> {
        let hour = utc_now.hour();
        self.windows
            .iter()
            .map(|w| SessionStatus {
                name: w.name.clone(),
                open: w.contains_hour(hour),
            })
            .collect()
    }

    pub fn is_open(&self, name: &str, utc_now: DateTime<Utc>) -> Option<bool> {
        self.windows
            .iter()
            .find(|w| w.name == name)
            .map(|w| w.contains_hour(utc_now.hour()))
    }

    pub fn open_sessions(&self, utc_now: DateTime<Utc>) -> Vec<&str> {
        let hour = utc_now.hour();
        self.windows
            .iter()
            .filter(|w| w.contains_hour(hour))
            .map(|w| w.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_hour(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 17, hour, 30, 0).unwrap()
    }

    fn clock() -> SessionClock {
        SessionClock::new(vec![
            SessionWindow::new("sydney", 22, 7),
            SessionWindow::new("london", 8, 17),
        ])
        .unwrap()
    }

    #[test]
    fn wrapping_window() {
        let w = SessionWindow::new("sydney", 22, 7);
        assert!(w.wraps());
        assert!(w.contains_hour(23));
        assert!(w.contains_hour(3));
        assert!(w.contains_hour(0));
        assert!(!w.contains_hour(10));
        assert!(!w.contains_hour(21));
        assert!(w.contains_hour(22));
        assert!(!w.contains_hour(7));
    }

    #[test]
    fn plain_window_is_half_open() {
        let w = SessionWindow::new("london", 8, 17);
        assert!(!w.wraps());
        assert!(!w.contains_hour(7));
        assert!(w.contains_hour(8));
        assert!(w.contains_hour(16));
        assert!(!w.contains_hour(17));
    }

    #[test]
    fn statuses_in_table_order() {
        let s = clock().statuses(at_hour(9));
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].name, "sydney");
        assert!(!s[0].open);
        assert_eq!(s[1].name, "london");
        assert!(s[1].open);
    }

    #[test]
    fn overlapping_sessions_both_open() {
        let c = SessionClock::new(vec![
            SessionWindow::new("london", 8, 17),
            SessionWindow::new("new_york", 13, 22),
        ])
        .unwrap();
        assert_eq!(c.open_sessions(at_hour(14)), vec!["london", "new_york"]);
        assert!(c.open_sessions(at_hour(23)).is_empty());
    }

    #[test]
    fn lookup_by_name() {
        let c = clock();
        assert_eq!(c.is_open("sydney", at_hour(2)), Some(true));
        assert_eq!(c.is_open("tokyo", at_hour(2)), None);
    }

    #[test]
    fn invalid_tables_rejected() {
        assert!(SessionClock::new(vec![SessionWindow::new("x", 5, 5)]).is_err());
        assert!(SessionClock::new(vec![SessionWindow::new("x", 24, 5)]).is_err());
        assert!(SessionClock::new(vec![
            SessionWindow::new("x", 1, 5),
            SessionWindow::new("x", 6, 9),
        ])
        .is_err());
        assert!(SessionClock::new(vec![SessionWindow::new("", 1, 5)]).is_err());
    }

    #[test]
    fn parse_table_round() {
        let t = SessionWindow::parse_table("sydney:22-7, london:8-17").unwrap();
        assert_eq!(t, vec![SessionWindow::new("sydney", 22, 7), SessionWindow::new("london", 8, 17)]);
        assert!(SessionWindow::parse_table("london8-17").is_err());
        assert!(SessionWindow::parse_table("london:8-x").is_err());
    }
}
