//! Engine configuration

/// Hard cap on selected bands. The ranking step never yields more than
/// this many levels, regardless of `max_levels`.
pub const SELECTION_CAP: usize = 9;

/// Strength contribution of each pivot absorbed into a band.
pub const PIVOT_WEIGHT: i64 = 20;

/// Number of most-recent candles inspected when counting how often price
/// revisited a candidate band.
pub const REVISIT_WINDOW: usize = 500;

/// Tuning knobs for level detection. Immutable once the engine is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Half-width of the symmetric window used to detect a pivot high/low.
    pub pivot_period: usize,
    /// Number of most-recent candles searched for pivots.
    pub loopback_period: usize,
    /// Maximum band width as a percentage of the full pivot range.
    pub channel_width_percent: f64,
    /// Minimum clustering count (scaled by `PIVOT_WEIGHT`) for a band to
    /// qualify as a level.
    pub min_strength: u32,
    /// Advisory upper bound on returned levels; the effective cap is
    /// `min(max_levels, SELECTION_CAP)`.
    pub max_levels: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pivot_period: 5,
            loopback_period: 250,
            channel_width_percent: 4.0,
            min_strength: 2,
            max_levels: 12,
        }
    }
}

impl EngineConfig {
    /// Minimum strength score a band must reach to be selectable.
    pub fn min_strength_score(&self) -> i64 {
        self.min_strength as i64 * PIVOT_WEIGHT
    }

    /// Effective cap on returned levels.
    pub fn level_cap(&self) -> usize {
        self.max_levels.min(SELECTION_CAP)
    }
}
