//! Support/resistance level engine
//!
//! Derives ranked horizontal price channels from an OHLC series by
//! clustering pivot highs/lows, classifies a reference price against the
//! resulting levels, and derives a stop-loss/target suggestion.
//!
//! The engine is a pure, synchronous computation over a borrowed series:
//! no I/O, no shared state, safe to run per-request or across a parallel
//! scan.

pub mod channels;
pub mod config;
pub mod error;
pub mod pivots;

pub use config::{EngineConfig, PIVOT_WEIGHT, REVISIT_WINDOW, SELECTION_CAP};
pub use error::LevelError;

use crate::models::levels::{LevelKind, PricePosition, SrCheckResult, SrLevel, TradeInfo};
use crate::models::ohlc::OhlcSeries;
use channels::{build_candidate_bands, score_revisits, select_bands};
use pivots::{channel_width, find_pivot_values};

/// Stop-loss fallback (2% under price) when no previous level exists.
const FALLBACK_STOP_PCT: f64 = 0.98;
/// Target fallback (4% over price) when no previous level exists.
const FALLBACK_TARGET_PCT: f64 = 1.04;

pub struct SupportResistanceEngine<'a> {
    series: &'a OhlcSeries,
    reference_price: f64,
    config: EngineConfig,
}

impl<'a> SupportResistanceEngine<'a> {
    /// Build an engine over a series.
    ///
    /// When no reference price is supplied the last close is used; an
    /// empty close array is the single hard error in the engine.
    pub fn new(
        series: &'a OhlcSeries,
        reference_price: Option<f64>,
        config: EngineConfig,
    ) -> Result<Self, LevelError> {
        let reference_price = match reference_price {
            Some(price) => price,
            None => series.last_close().ok_or(LevelError::MissingCloseData)?,
        };
        Ok(Self {
            series,
            reference_price,
            config,
        })
    }

    /// Engine with default configuration.
    pub fn with_defaults(
        series: &'a OhlcSeries,
        reference_price: Option<f64>,
    ) -> Result<Self, LevelError> {
        Self::new(series, reference_price, EngineConfig::default())
    }

    pub fn reference_price(&self) -> f64 {
        self.reference_price
    }

    /// Compute ranked support/resistance levels.
    ///
    /// Returns an empty vector for empty or length-mismatched series and
    /// when no band reaches the minimum strength.
    pub fn calculate_levels(&self) -> Vec<SrLevel> {
        if !self.series.is_consistent() {
            return Vec::new();
        }

        let window = self.config.loopback_period.min(self.series.len());
        let start = self.series.len() - window;
        let highs = &self.series.h[start..];
        let lows = &self.series.l[start..];

        let pivot_values = find_pivot_values(highs, lows, self.config.pivot_period);
        let Some(cwidth) = channel_width(&pivot_values, self.config.channel_width_percent)
        else {
            return Vec::new();
        };

        let mut bands = build_candidate_bands(&pivot_values, cwidth);
        score_revisits(&mut bands, self.series);
        let selected = select_bands(bands, &self.config);

        selected
            .into_iter()
            .map(|band| SrLevel {
                kind: self.classify(band.high, band.low),
                upper: band.high,
                lower: band.low,
            })
            .collect()
    }

    /// Resistance when both bounds sit above the reference price, support
    /// when both sit below; a straddling band is resistance only when the
    /// price has cleared its lower bound.
    fn classify(&self, upper: f64, lower: f64) -> LevelKind {
        if upper > self.reference_price && lower > self.reference_price {
            LevelKind::Resistance
        } else if upper < self.reference_price && lower < self.reference_price {
            LevelKind::Support
        } else if self.reference_price > lower {
            LevelKind::Resistance
        } else {
            LevelKind::Support
        }
    }

    /// Classify the reference price against a level set.
    ///
    /// With an empty level set the result is the neutral degenerate value:
    /// not near, infinite distance, position `Within`.
    pub fn check_near_support_or_resistance(
        &self,
        threshold: f64,
        levels: &[SrLevel],
    ) -> SrCheckResult {
        let price = self.reference_price;
        let mut nearest_level: Option<SrLevel> = None;
        let mut smallest_distance = f64::INFINITY;
        let mut next_support: Option<f64> = None;
        let mut next_resistance: Option<f64> = None;

        for level in levels {
            let distance_upper = (price - level.upper).abs() / price;
            let distance_lower = (price - level.lower).abs() / price;
            let distance = distance_upper.min(distance_lower);

            if distance < smallest_distance {
                smallest_distance = distance;
                nearest_level = Some(*level);
            }

            match level.kind {
                LevelKind::Support if level.upper < price => {
                    if next_support.map_or(true, |s| level.upper > s) {
                        next_support = Some(level.upper);
                    }
                }
                LevelKind::Resistance if level.lower > price => {
                    if next_resistance.map_or(true, |r| level.lower < r) {
                        next_resistance = Some(level.lower);
                    }
                }
                _ => {}
            }
        }

        let is_near = smallest_distance <= threshold;
        let price_position = match nearest_level {
            Some(level) if price > level.upper => PricePosition::Above,
            Some(level) if price < level.lower => PricePosition::Below,
            _ => PricePosition::Within,
        };

        SrCheckResult {
            is_near,
            nearest_level: if is_near { nearest_level } else { None },
            distance_percentage: smallest_distance * 100.0,
            price_position,
            next_support,
            next_resistance,
        }
    }

    /// Derive a stop-loss/target suggestion from the level structure.
    ///
    /// Closer to support reads bullish (stop under the support, target at
    /// the next resistance), closer to resistance reads bearish. With no
    /// surrounding levels a flat 2%/4% band applies.
    pub fn calculate_trade_info(&self) -> TradeInfo {
        let levels = self.calculate_levels();
        let price = self.reference_price;

        let mut prev_support: Option<f64> = None;
        let mut prev_resistance: Option<f64> = None;
        let mut next_support: Option<f64> = None;
        let mut next_resistance: Option<f64> = None;

        for level in &levels {
            match level.kind {
                LevelKind::Support => {
                    if level.upper < price {
                        prev_support = Some(match prev_support {
                            Some(s) => s.max(level.upper),
                            None => level.upper,
                        });
                    } else {
                        next_support = Some(match next_support {
                            Some(s) => s.min(level.lower),
                            None => level.lower,
                        });
                    }
                }
                LevelKind::Resistance => {
                    if level.lower > price {
                        next_resistance = Some(match next_resistance {
                            Some(r) => r.min(level.lower),
                            None => level.lower,
                        });
                    } else {
                        prev_resistance = Some(match prev_resistance {
                            Some(r) => r.max(level.upper),
                            None => level.upper,
                        });
                    }
                }
            }
        }

        let (stop_loss, ideal_target) = match (prev_support, prev_resistance) {
            (Some(support), Some(resistance)) => {
                if price - support < resistance - price {
                    bullish_trade(price, support, next_resistance)
                } else {
                    bearish_trade(price, resistance, next_support)
                }
            }
            (Some(support), None) => bullish_trade(price, support, next_resistance),
            (None, Some(resistance)) => bearish_trade(price, resistance, next_support),
            (None, None) => (price * FALLBACK_STOP_PCT, price * FALLBACK_TARGET_PCT),
        };

        let risk_reward_ratio = ((ideal_target - price) / (stop_loss - price)).abs();

        TradeInfo {
            ideal_target,
            stop_loss,
            risk_reward_ratio,
        }
    }
}

fn bullish_trade(price: f64, prev_support: f64, next_resistance: Option<f64>) -> (f64, f64) {
    let stop_loss = prev_support * 0.99;
    let ideal_target = next_resistance.unwrap_or(price + (price - prev_support) * 2.0);
    (stop_loss, ideal_target)
}

fn bearish_trade(price: f64, prev_resistance: f64, next_support: Option<f64>) -> (f64, f64) {
    let stop_loss = prev_resistance * 1.01;
    let ideal_target = next_support.unwrap_or(price - (prev_resistance - price) * 2.0);
    (stop_loss, ideal_target)
}
