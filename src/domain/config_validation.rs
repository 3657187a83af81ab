//! Build a validated [`BacktestConfig`] from a [`ConfigPort`].
//!
//! Sections and keys, all optional:
//!
//! ```ini
//! [ensemble]
//! strategies = macd, ma, cci, psar
//! threshold = unanimous        ; or "majority", or a fraction such as 0.5
//!
//! [macd]
//! fast = 12
//! slow = 26
//! signal = 9
//!
//! [ma]
//! short_window = 40
//! long_window = 100
//!
//! [cci]
//! window = 20
//! constant = 0.015
//!
//! [psar]
//! initial_af = 0.02
//! max_af = 0.2
//!
//! [portfolio]
//! shares_per_position = 100
//! initial_capital = 100000
//!
//! [metrics]
//! drawdown_window = 252
//! ```

use crate::domain::backtest::BacktestConfig;
use crate::domain::ensemble::ThresholdMode;
use crate::domain::error::TradeSignalError;
use crate::domain::strategy::{StrategyKind, StrategySet};
use crate::ports::config_port::ConfigPort;
use std::collections::HashSet;

pub fn build_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, TradeSignalError> {
    let defaults = BacktestConfig::default();
    let mut strategies = StrategySet::with_active(read_strategies(config)?);

    let macd = &mut strategies.macd;
    macd.fast = read_window(config, "macd", "fast", macd.fast)?;
    macd.slow = read_window(config, "macd", "slow", macd.slow)?;
    macd.signal = read_window(config, "macd", "signal", macd.signal)?;

    let ma = &mut strategies.moving_average;
    ma.short_window = read_window(config, "ma", "short_window", ma.short_window)?;
    ma.long_window = read_window(config, "ma", "long_window", ma.long_window)?;

    let cci = &mut strategies.cci;
    cci.window = read_window(config, "cci", "window", cci.window)?;
    cci.constant = config.get_double("cci", "constant", cci.constant)?;

    let psar = &mut strategies.psar;
    psar.initial_af = config.get_double("psar", "initial_af", psar.initial_af)?;
    psar.max_af = config.get_double("psar", "max_af", psar.max_af)?;

    let mut portfolio = defaults.portfolio;
    portfolio.shares_per_position =
        config.get_double("portfolio", "shares_per_position", portfolio.shares_per_position)?;
    portfolio.initial_capital =
        config.get_double("portfolio", "initial_capital", portfolio.initial_capital)?;

    let built = BacktestConfig {
        strategies,
        threshold: read_threshold(config)?,
        portfolio,
        drawdown_window: read_window(config, "metrics", "drawdown_window", defaults.drawdown_window)?,
    };
    built.validate()?;
    Ok(built)
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> TradeSignalError {
    TradeSignalError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn read_window(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, TradeSignalError> {
    let default = i64::try_from(default).map_err(|_| invalid(section, key, "default out of range"))?;
    let value = config.get_int(section, key, default)?;
    usize::try_from(value).map_err(|_| invalid(section, key, format!("{key} must not be negative")))
}

fn read_strategies(config: &dyn ConfigPort) -> Result<Vec<StrategyKind>, TradeSignalError> {
    let Some(raw) = config.get_string("ensemble", "strategies") else {
        return Ok(StrategyKind::ALL.to_vec());
    };

    let mut seen = HashSet::new();
    let mut active = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let kind: StrategyKind = name
            .parse()
            .map_err(|reason: String| invalid("ensemble", "strategies", reason))?;
        if !seen.insert(kind) {
            return Err(invalid(
                "ensemble",
                "strategies",
                format!("strategy '{kind}' listed twice"),
            ));
        }
        active.push(kind);
    }
    if active.is_empty() {
        return Err(invalid("ensemble", "strategies", "at least one strategy is required"));
    }
    Ok(active)
}

fn read_threshold(config: &dyn ConfigPort) -> Result<ThresholdMode, TradeSignalError> {
    match config.get_string("ensemble", "threshold") {
        None => Ok(ThresholdMode::default()),
        Some(raw) if raw.trim().is_empty() => Err(TradeSignalError::ConfigMissing {
            section: "ensemble".to_string(),
            key: "threshold".to_string(),
        }),
        Some(raw) => raw
            .parse()
            .map_err(|reason: String| invalid("ensemble", "threshold", reason)),
    }
}
