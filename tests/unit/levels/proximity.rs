//! Unit tests for proximity classification

use tradelens::levels::SupportResistanceEngine;
use tradelens::models::levels::{LevelKind, PricePosition, SrLevel};
use tradelens::models::ohlc::OhlcSeries;

fn single_candle(close: f64) -> OhlcSeries {
    OhlcSeries {
        t: vec![0],
        o: vec![close],
        h: vec![close],
        l: vec![close],
        c: vec![close],
        v: vec![0.0],
    }
}

fn support_band(lower: f64, upper: f64) -> SrLevel {
    SrLevel {
        kind: LevelKind::Support,
        upper,
        lower,
    }
}

#[test]
fn price_near_support_within_threshold() {
    let series = single_candle(101.0);
    let engine = SupportResistanceEngine::with_defaults(&series, None).unwrap();
    let levels = [support_band(95.0, 100.0)];

    let check = engine.check_near_support_or_resistance(0.02, &levels);
    assert!(check.is_near);
    // |101 - 100| / 101 * 100 ≈ 0.9901
    assert!((check.distance_percentage - 100.0 / 101.0).abs() < 1e-9);
    assert_eq!(check.nearest_level, Some(levels[0]));
    assert_eq!(check.price_position, PricePosition::Above);
    assert_eq!(check.next_support, Some(100.0));
    assert_eq!(check.next_resistance, None);
}

#[test]
fn tighter_threshold_rejects_same_distance() {
    let series = single_candle(101.0);
    let engine = SupportResistanceEngine::with_defaults(&series, None).unwrap();
    let levels = [support_band(95.0, 100.0)];

    let check = engine.check_near_support_or_resistance(0.005, &levels);
    assert!(!check.is_near);
    assert_eq!(check.nearest_level, None);
    // Distance is reported even when not near.
    assert!((check.distance_percentage - 100.0 / 101.0).abs() < 1e-9);
}

#[test]
fn nearest_level_picks_smallest_distance() {
    let series = single_candle(100.0);
    let engine = SupportResistanceEngine::with_defaults(&series, None).unwrap();
    let levels = [
        support_band(90.0, 92.0),
        SrLevel {
            kind: LevelKind::Resistance,
            upper: 103.0,
            lower: 101.0,
        },
    ];

    let check = engine.check_near_support_or_resistance(0.05, &levels);
    assert_eq!(check.nearest_level.unwrap().lower, 101.0);
    assert_eq!(check.price_position, PricePosition::Below);
    assert_eq!(check.next_support, Some(92.0));
    assert_eq!(check.next_resistance, Some(101.0));
}

#[test]
fn price_inside_band_reports_within() {
    let series = single_candle(100.0);
    let engine = SupportResistanceEngine::with_defaults(&series, None).unwrap();
    let levels = [SrLevel {
        kind: LevelKind::Resistance,
        upper: 101.0,
        lower: 99.0,
    }];

    let check = engine.check_near_support_or_resistance(0.05, &levels);
    assert_eq!(check.price_position, PricePosition::Within);
}

#[test]
fn empty_levels_degenerate_result() {
    let series = single_candle(100.0);
    let engine = SupportResistanceEngine::with_defaults(&series, None).unwrap();

    let check = engine.check_near_support_or_resistance(0.02, &[]);
    assert!(!check.is_near);
    assert_eq!(check.nearest_level, None);
    assert!(check.distance_percentage.is_infinite());
    assert_eq!(check.price_position, PricePosition::Within);
    assert_eq!(check.next_support, None);
    assert_eq!(check.next_resistance, None);
}
