//! tradesignal: technical-indicator signal and backtest engine.
//!
//! Hexagonal architecture: pure engine logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
