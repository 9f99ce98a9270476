//! TradeLens: support/resistance level engine and stock scanner
//!
//! Computes ranked horizontal price channels from OHLC chart data, serves
//! them over an HTTP API and periodically scans a symbol universe for
//! prices sitting near a level.

pub mod config;
pub mod core;
pub mod levels;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
