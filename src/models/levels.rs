//! Support/resistance level types produced by the engine.

use serde::{Deserialize, Serialize};

/// Whether a band sits above (resistance) or below (support) the
/// reference price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelKind {
    #[serde(rename = "R")]
    Resistance,
    #[serde(rename = "S")]
    Support,
}

/// A resolved horizontal price band. Serialized with the original wire
/// keys (`type`, `UB`, `LB`) so chart-rendering clients keep working.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SrLevel {
    #[serde(rename = "type")]
    pub kind: LevelKind,
    #[serde(rename = "UB")]
    pub upper: f64,
    #[serde(rename = "LB")]
    pub lower: f64,
}

/// Position of the reference price relative to the nearest band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricePosition {
    Above,
    Below,
    Within,
}

/// Point-in-time classification of a price against a level set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrCheckResult {
    pub is_near: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearest_level: Option<SrLevel>,
    pub distance_percentage: f64,
    pub price_position: PricePosition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_support: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_resistance: Option<f64>,
}

/// Suggested stop-loss/target pair derived from the level structure.
///
/// `risk_reward_ratio` is infinite when the stop-loss equals the price;
/// consumers must guard before dividing or displaying.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeInfo {
    pub ideal_target: f64,
    pub stop_loss: f64,
    pub risk_reward_ratio: f64,
}
