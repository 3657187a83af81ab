//! Ensemble vote over per-strategy signal series.
//!
//! Each bar counts the strategies voting buy; the ensemble buys when the
//! count reaches the threshold set by [`ThresholdMode`].

use crate::domain::error::TradeSignalError;
use crate::domain::signal::{SignalPoint, SignalSeries};
use std::fmt;
use std::str::FromStr;

pub const ENSEMBLE_LABEL: &str = "ENSEMBLE";
pub const MAJORITY_FRACTION: f64 = 2.0 / 3.0;
/// Slack absorbing rounding in `fraction * n`, far below one vote.
const VOTE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ThresholdMode {
    /// Every strategy must vote buy.
    #[default]
    Unanimous,
    /// At least `fraction * n` strategies must vote buy, `0 < fraction <= 1`.
    Fraction(f64),
}

impl ThresholdMode {
    /// Two thirds of the active strategies.
    pub fn majority() -> Self {
        ThresholdMode::Fraction(MAJORITY_FRACTION)
    }

    pub fn validate(&self) -> Result<(), TradeSignalError> {
        if let ThresholdMode::Fraction(f) = *self {
            if !(f > 0.0 && f <= 1.0) {
                return Err(TradeSignalError::invalid(
                    "threshold",
                    format!("fraction {f} must be in (0, 1]"),
                ));
            }
        }
        Ok(())
    }

    fn is_met(&self, votes: usize, strategies: usize) -> bool {
        match *self {
            ThresholdMode::Unanimous => votes == strategies,
            ThresholdMode::Fraction(f) => votes as f64 >= f * strategies as f64 - VOTE_TOLERANCE,
        }
    }
}

impl fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdMode::Unanimous => write!(f, "unanimous"),
            ThresholdMode::Fraction(x) => write!(f, "{x}"),
        }
    }
}

impl FromStr for ThresholdMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unanimous" | "all" => Ok(ThresholdMode::Unanimous),
            "majority" => Ok(ThresholdMode::majority()),
            other => other
                .parse::<f64>()
                .map(ThresholdMode::Fraction)
                .map_err(|_| format!("unknown threshold mode '{other}'")),
        }
    }
}

/// Combine aligned strategy signals into one ensemble series.
///
/// All series must share the same length and dates.
pub fn aggregate(
    signals: &[SignalSeries],
    mode: ThresholdMode,
) -> Result<SignalSeries, TradeSignalError> {
    mode.validate()?;
    let Some(first) = signals.first() else {
        return Err(TradeSignalError::NoStrategies);
    };

    for series in &signals[1..] {
        if series.len() != first.len() {
            return Err(TradeSignalError::SeriesMismatch {
                expected: first.len(),
                actual: series.len(),
            });
        }
        if let Some(i) = first
            .points
            .iter()
            .zip(&series.points)
            .position(|(a, b)| a.date != b.date)
        {
            return Err(TradeSignalError::Data {
                reason: format!(
                    "{} is not aligned with {} at index {i}",
                    series.label, first.label
                ),
            });
        }
    }

    let points = first
        .points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let votes = signals.iter().filter(|s| s.points[i].buy).count();
            SignalPoint {
                date: point.date,
                buy: mode.is_met(votes, signals.len()),
            }
        })
        .collect();

    tracing::debug!(strategies = signals.len(), mode = %mode, "aggregated ensemble");
    Ok(SignalSeries::new(ENSEMBLE_LABEL, points))
}
