//! Shared data models spanning the engine and service layers.

pub mod levels;
pub mod ohlc;
pub mod scan;

pub use levels::{LevelKind, PricePosition, SrCheckResult, SrLevel, TradeInfo};
pub use ohlc::OhlcSeries;
pub use scan::{ChartPeriod, ScanMatch};
