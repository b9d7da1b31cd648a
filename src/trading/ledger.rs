use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::risk::DailyPlan;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub at: DateTime<Utc>,
    /// Positive for a win, negative for a loss.
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerStatus {
    Trading,
    GoalReached,
    LossLimitHit,
}

impl fmt::Display for LedgerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerStatus::Trading => write!(f, "trading"),
            LedgerStatus::GoalReached => write!(f, "goal reached"),
            LedgerStatus::LossLimitHit => write!(f, "loss limit hit"),
        }
    }
}

/// Manual win/loss tally for the current UTC day.
///
/// Owned by whoever presents results; the evaluation pipeline never sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLedger {
    day: NaiveDate,
    entries: Vec<LedgerEntry>,
}

impl DailyLedger {
    pub fn new(utc_now: DateTime<Utc>) -> Self {
        Self {
            day: utc_now.date_naive(),
            entries: Vec::new(),
        }
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Start a fresh tally once the UTC date changes. Returns true if it did.
    pub fn roll_day(&mut self, utc_now: DateTime<Utc>) -> bool {
        let today = utc_now.date_naive();
        if today == self.day {
            return false;
        }
        self.day = today;
        self.entries.clear();
        true
    }

    pub fn record(&mut self, amount: f64, utc_now: DateTime<Utc>) {
        self.roll_day(utc_now);
        self.entries.push(LedgerEntry { at: utc_now, amount });
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn wins(&self) -> usize {
        self.entries.iter().filter(|e| e.amount > 0.0).count()
    }

    pub fn losses(&self) -> usize {
        self.entries.iter().filter(|e| e.amount < 0.0).count()
    }

    pub fn net(&self) -> f64 {
        self.entries.iter().map(|e| e.amount).sum()
    }

    pub fn status(&self, plan: &DailyPlan) -> LedgerStatus {
        let net = self.net();
        if net <= -plan.loss_limit_amount {
            LedgerStatus::LossLimitHit
        } else if net >= plan.goal_amount {
            LedgerStatus::GoalReached
        } else {
            LedgerStatus::Trading
        }
    }
}

/// Operator input on stdin: `win`, `loss`, `win 30`, `loss 12.5`, `reset`.
/// Explicit amounts must be non-zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LedgerCommand {
    Record(f64),
    Reset,
}

impl LedgerCommand {
    /// Bare `win`/`loss` use the planned reward/risk of one trade.
    pub fn parse(line: &str, plan: &DailyPlan) -> Option<LedgerCommand> {
        let mut parts = line.split_whitespace();
        let verb = parts.next()?.to_lowercase();
        let amount = match parts.next() {
            Some(raw) => {
                let v = raw.trim_start_matches('$').parse::<f64>().ok()?;
                if !v.is_finite() || v == 0.0 {
                    return None;
                }
                Some(v.abs())
            }
            None => None,
        };
        if parts.next().is_some() {
            return None;
        }
        match (verb.as_str(), amount) {
            ("win" | "w", a) => Some(LedgerCommand::Record(a.unwrap_or(plan.reward_per_trade))),
            ("loss" | "l", a) => Some(LedgerCommand::Record(-a.unwrap_or(plan.risk_per_trade))),
            ("reset", None) => Some(LedgerCommand::Reset),
            _ => None,
        }
    }
}
