//! OHLC price series as parallel arrays, ordered oldest to newest.

use serde::{Deserialize, Serialize};

/// Candle series in the column-oriented shape the NSE charting API returns:
/// parallel arrays of timestamps, opens, highs, lows, closes and volumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OhlcSeries {
    pub t: Vec<i64>,
    pub o: Vec<f64>,
    pub h: Vec<f64>,
    pub l: Vec<f64>,
    pub c: Vec<f64>,
    #[serde(default)]
    pub v: Vec<f64>,
}

impl OhlcSeries {
    pub fn len(&self) -> usize {
        self.c.len()
    }

    pub fn is_empty(&self) -> bool {
        self.c.is_empty()
    }

    /// A series is usable when it has candles and the price arrays are
    /// parallel. Inconsistent series degrade to empty results, never
    /// errors. Volume is not checked; the engine never reads it.
    pub fn is_consistent(&self) -> bool {
        !self.t.is_empty()
            && self.t.len() == self.c.len()
            && self.o.len() == self.c.len()
            && self.h.len() == self.c.len()
            && self.l.len() == self.c.len()
    }

    /// Last close of the series, the default reference price for level
    /// classification.
    pub fn last_close(&self) -> Option<f64> {
        self.c.last().copied()
    }
}
