pub mod confluence_engine;
pub mod signals;

pub use confluence_engine::{ConfluenceEngine, Evaluation, RadarReport, Verdict};
pub use signals::{TimeframeSignal, TradeParameters};
