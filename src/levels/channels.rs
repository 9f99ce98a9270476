//! Candidate band construction, revisit scoring and greedy selection
//!
//! Band construction is a single-pass greedy absorption per anchor pivot:
//! the order in which pivots are visited affects membership. Selection is
//! iterative max-extraction with overlap invalidation. Both are kept
//! exactly as the charting heuristic defines them; a globally optimal
//! clustering would produce different levels.

use crate::levels::config::{EngineConfig, PIVOT_WEIGHT, REVISIT_WINDOW};
use crate::models::ohlc::OhlcSeries;

/// A candidate price band with its accumulated strength score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub high: f64,
    pub low: f64,
    pub strength: i64,
    pub valid: bool,
}

/// Build one candidate band per pivot by absorbing every pivot within
/// `channel_width` of the growing band.
///
/// The anchor pivot absorbs itself, so every band starts at
/// `PIVOT_WEIGHT` strength.
pub fn build_candidate_bands(pivots: &[f64], channel_width: f64) -> Vec<Band> {
    pivots
        .iter()
        .map(|&anchor| {
            let mut low = anchor;
            let mut high = anchor;
            let mut strength = 0;
            for &candidate in pivots {
                let width = if candidate <= high {
                    high - candidate
                } else {
                    candidate - low
                };
                if width <= channel_width {
                    if candidate <= high {
                        low = low.min(candidate);
                    } else {
                        high = high.max(candidate);
                    }
                    strength += PIVOT_WEIGHT;
                }
            }
            Band {
                high,
                low,
                strength,
                valid: true,
            }
        })
        .collect()
}

/// Count candles whose open, high, low or close falls inside the band,
/// over the `REVISIT_WINDOW` most recent candles.
pub fn count_revisits(series: &OhlcSeries, high: f64, low: f64) -> i64 {
    let len = series.len();
    let start = len.saturating_sub(REVISIT_WINDOW);
    let inside = |value: f64| value <= high && value >= low;

    let mut count = 0;
    for i in start..len {
        if inside(series.h[i]) || inside(series.l[i]) || inside(series.o[i]) || inside(series.c[i])
        {
            count += 1;
        }
    }
    count
}

/// Add historical revisit counts to every band's provisional strength.
pub fn score_revisits(bands: &mut [Band], series: &OhlcSeries) {
    for band in bands.iter_mut() {
        band.strength += count_revisits(series, band.high, band.low);
    }
}

/// Greedily extract up to `config.level_cap()` non-overlapping bands in
/// descending strength order.
///
/// Each extraction invalidates every remaining band whose bounds fall
/// inside the winner, so weaker overlapping bands are never reselected.
pub fn select_bands(mut bands: Vec<Band>, config: &EngineConfig) -> Vec<Band> {
    let min_score = config.min_strength_score();
    let cap = config.level_cap();
    let mut selected = Vec::new();

    for _ in 0..bands.len() {
        let mut best: Option<usize> = None;
        let mut best_strength = -1;
        for (i, band) in bands.iter().enumerate() {
            if band.valid && band.strength > best_strength && band.strength >= min_score {
                best_strength = band.strength;
                best = Some(i);
            }
        }

        let Some(winner) = best else {
            break;
        };
        let picked = bands[winner];
        selected.push(picked);

        for band in bands.iter_mut() {
            let overlaps = (band.high <= picked.high && band.high >= picked.low)
                || (band.low <= picked.high && band.low >= picked.low);
            if overlaps {
                band.valid = false;
            }
        }

        if selected.len() >= cap {
            break;
        }
    }

    selected
}
