//! Core engine types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod signal;
pub mod strategy;
pub mod ensemble;
pub mod portfolio;
pub mod metrics;
pub mod backtest;
pub mod config_validation;
pub mod error;
