//! Daily OHLCV bar representation.

use chrono::NaiveDate;

use crate::domain::error::TradeSignalError;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

/// Close prices of `bars`, in order.
pub fn closes(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Dates must be strictly increasing: no duplicates, no reordering.
pub fn ensure_ascending(bars: &[OhlcvBar]) -> Result<(), TradeSignalError> {
    match bars.windows(2).position(|w| w[1].date <= w[0].date) {
        Some(i) => Err(TradeSignalError::Data {
            reason: format!(
                "bar dates not strictly increasing: {} follows {}",
                bars[i + 1].date,
                bars[i].date
            ),
        }),
        None => Ok(()),
    }
}
