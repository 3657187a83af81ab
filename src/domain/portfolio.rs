//! Fixed-share portfolio simulation driven by an ensemble signal.
//!
//! Each bar either holds `shares_per_position` shares (signal true) or
//! nothing. Position changes settle at that bar's close with no costs, so
//! cash can go negative when the position is worth more than the capital.

use chrono::NaiveDate;

use crate::domain::error::{require_positive, TradeSignalError};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::SignalSeries;

pub const DEFAULT_SHARES_PER_POSITION: f64 = 100.0;
pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;
/// Bar-to-bar changes in total within this many ulps of the cash and
/// holdings magnitudes are rounding, not profit.
const ROUNDING_ULPS: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PortfolioParams {
    pub shares_per_position: f64,
    pub initial_capital: f64,
}

impl Default for PortfolioParams {
    fn default() -> Self {
        Self {
            shares_per_position: DEFAULT_SHARES_PER_POSITION,
            initial_capital: DEFAULT_INITIAL_CAPITAL,
        }
    }
}

impl PortfolioParams {
    pub fn validate(&self) -> Result<(), TradeSignalError> {
        require_positive("shares_per_position", self.shares_per_position)?;
        require_positive("initial_capital", self.initial_capital)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PortfolioRow {
    pub date: NaiveDate,
    pub position: f64,
    pub position_change: f64,
    pub holdings: f64,
    pub cash: f64,
    /// Always `cash + holdings`.
    pub total: f64,
    pub period_return: f64,
}

/// Walk the bars, holding a position while the ensemble says buy.
pub fn simulate(
    bars: &[OhlcvBar],
    ensemble: &SignalSeries,
    params: &PortfolioParams,
) -> Result<Vec<PortfolioRow>, TradeSignalError> {
    params.validate()?;
    if ensemble.len() != bars.len() {
        return Err(TradeSignalError::SeriesMismatch {
            expected: bars.len(),
            actual: ensemble.len(),
        });
    }

    let mut rows: Vec<PortfolioRow> = Vec::with_capacity(bars.len());
    let mut cash = params.initial_capital;

    for (i, (bar, point)) in bars.iter().zip(&ensemble.points).enumerate() {
        if point.date != bar.date {
            return Err(TradeSignalError::Data {
                reason: format!(
                    "ensemble date {} does not match bar date {} at index {i}",
                    point.date, bar.date
                ),
            });
        }

        let position = if point.buy {
            params.shares_per_position
        } else {
            0.0
        };
        // The first row holds its position without a trade.
        let position_change = rows.last().map_or(0.0, |prev| position - prev.position);
        cash -= position_change * bar.close;
        let holdings = position * bar.close;
        let total = cash + holdings;
        let period_return = match rows.last() {
            Some(prev) if prev.total != 0.0 => {
                let scale = cash.abs() + holdings.abs() + prev.total.abs();
                if (total - prev.total).abs() <= ROUNDING_ULPS * f64::EPSILON * scale {
                    0.0
                } else {
                    total / prev.total - 1.0
                }
            }
            _ => 0.0,
        };

        rows.push(PortfolioRow {
            date: bar.date,
            position,
            position_change,
            holdings,
            cash,
            total,
            period_return,
        });
    }

    tracing::debug!(rows = rows.len(), "simulated portfolio");
    Ok(rows)
}
