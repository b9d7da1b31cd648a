pub mod ledger;

pub use ledger::{DailyLedger, LedgerCommand, LedgerStatus};
