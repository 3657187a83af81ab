//! End-to-end backtest: bars → indicators → ensemble → portfolio → metrics.
//!
//! [`BacktestConfig`] gathers every parameter of a run. The whole config is
//! validated before any indicator is computed, so a run either fails up
//! front or completes.

use crate::domain::ensemble::{self, ThresholdMode};
use crate::domain::error::{require_positive_window, TradeSignalError};
use crate::domain::indicator::IndicatorSeries;
use crate::domain::metrics::{Metrics, DEFAULT_DRAWDOWN_WINDOW};
use crate::domain::ohlcv::{ensure_ascending, OhlcvBar};
use crate::domain::portfolio::{self, PortfolioParams, PortfolioRow};
use crate::domain::signal::SignalSeries;
use crate::domain::strategy::StrategySet;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub strategies: StrategySet,
    pub threshold: ThresholdMode,
    pub portfolio: PortfolioParams,
    pub drawdown_window: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            strategies: StrategySet::default(),
            threshold: ThresholdMode::default(),
            portfolio: PortfolioParams::default(),
            drawdown_window: DEFAULT_DRAWDOWN_WINDOW,
        }
    }
}

impl BacktestConfig {
    pub fn validate(&self) -> Result<(), TradeSignalError> {
        self.strategies.validate()?;
        self.threshold.validate()?;
        self.portfolio.validate()?;
        require_positive_window("drawdown_window", self.drawdown_window)?;
        Ok(())
    }

    /// Fewest bars every active strategy accepts, and at least one.
    pub fn minimum_bars(&self) -> usize {
        self.strategies
            .indicators()
            .iter()
            .map(|i| i.minimum_bars())
            .max()
            .unwrap_or(0)
            .max(1)
    }
}

/// Everything a run produced, stage by stage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BacktestResult {
    pub indicators: Vec<IndicatorSeries>,
    pub signals: Vec<SignalSeries>,
    pub ensemble: SignalSeries,
    pub portfolio: Vec<PortfolioRow>,
    pub metrics: Metrics,
}

pub fn run_backtest(
    bars: &[OhlcvBar],
    config: &BacktestConfig,
) -> Result<BacktestResult, TradeSignalError> {
    config.validate()?;
    ensure_ascending(bars)?;

    let indicator_types = config.strategies.indicators();
    if bars.is_empty() {
        return Err(TradeSignalError::InsufficientData {
            strategy: "backtest".to_string(),
            bars: 0,
            minimum: 1,
        });
    }
    for indicator in &indicator_types {
        let minimum = indicator.minimum_bars();
        if bars.len() < minimum {
            return Err(TradeSignalError::InsufficientData {
                strategy: indicator.to_string(),
                bars: bars.len(),
                minimum,
            });
        }
    }

    let mut indicators = Vec::with_capacity(indicator_types.len());
    for indicator in &indicator_types {
        let series = indicator.compute(bars)?;
        tracing::debug!(strategy = %indicator, bars = series.len(), "computed indicator");
        indicators.push(series);
    }

    let signals: Vec<SignalSeries> = indicators.iter().map(IndicatorSeries::signal).collect();
    let ensemble = ensemble::aggregate(&signals, config.threshold)?;
    let portfolio = portfolio::simulate(bars, &ensemble, &config.portfolio)?;
    let metrics = Metrics::compute(&portfolio, bars, &ensemble, config.drawdown_window)?;

    tracing::info!(
        bars = bars.len(),
        strategies = signals.len(),
        mode = %config.threshold,
        total_return = metrics.total_return,
        sharpe = metrics.sharpe_ratio,
        cagr = metrics.cagr,
        trades = metrics.trade_count,
        "backtest complete"
    );

    Ok(BacktestResult {
        indicators,
        signals,
        ensemble,
        portfolio,
        metrics,
    })
}
