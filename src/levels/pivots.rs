//! Pivot high/low detection
//!
//! A pivot high is a bar whose high is the maximum over a symmetric
//! window around it; a pivot low is the minimum of its window. A single
//! bar can contribute both. Pivot values are collected flat, in bar
//! order with the high checked before the low, because band construction
//! downstream is order-sensitive.

/// Collect pivot highs and lows from parallel high/low arrays.
///
/// Only interior bars with a full `pivot_period` margin on each side are
/// considered. Returns an empty vector when the series is too short.
pub fn find_pivot_values(highs: &[f64], lows: &[f64], pivot_period: usize) -> Vec<f64> {
    let mut pivots = Vec::new();
    if highs.len() != lows.len() || highs.len() < 2 * pivot_period + 1 {
        return pivots;
    }

    for x in pivot_period..highs.len() - pivot_period {
        let window = (x - pivot_period)..=(x + pivot_period);

        let window_max = highs[window.clone()]
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        if highs[x] >= window_max {
            pivots.push(highs[x]);
        }

        let window_min = lows[window].iter().cloned().fold(f64::INFINITY, f64::min);
        if lows[x] <= window_min {
            pivots.push(lows[x]);
        }
    }

    pivots
}

/// Maximum band width derived from the full pivot range.
///
/// Returns `None` when no pivots exist (no channel can be formed).
pub fn channel_width(pivots: &[f64], width_percent: f64) -> Option<f64> {
    if pivots.is_empty() {
        return None;
    }
    let highest = pivots.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let lowest = pivots.iter().cloned().fold(f64::INFINITY, f64::min);
    Some((highest - lowest) * width_percent / 100.0)
}
