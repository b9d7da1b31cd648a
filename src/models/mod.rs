pub mod bar;
pub mod direction;
pub mod timeframe;

pub use bar::{Bar, BarSeries, MarketData};
pub use direction::{Direction, SignalState};
pub use timeframe::Timeframe;
