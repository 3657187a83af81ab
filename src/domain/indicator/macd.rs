//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Buy while MACD Line > Signal Line.
//!
//! Default parameters: fast=12, slow=26, signal=9

use crate::domain::error::{require_positive_window, TradeSignalError};
use crate::domain::indicator::ema::ema;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::{closes, OhlcvBar};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: DEFAULT_FAST,
            slow: DEFAULT_SLOW,
            signal: DEFAULT_SIGNAL,
        }
    }
}

impl MacdParams {
    pub fn validate(&self) -> Result<(), TradeSignalError> {
        require_positive_window("fast", self.fast)?;
        require_positive_window("slow", self.slow)?;
        require_positive_window("signal", self.signal)?;
        Ok(())
    }
}

pub fn calculate_macd(
    bars: &[OhlcvBar],
    params: &MacdParams,
) -> Result<IndicatorSeries, TradeSignalError> {
    params.validate()?;

    let close = closes(bars);
    let ema_fast = ema(&close, params.fast);
    let ema_slow = ema(&close, params.slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(fast, slow)| fast - slow)
        .collect();
    let signal_line = ema(&macd_line, params.signal);

    let values = bars
        .iter()
        .zip(macd_line.iter().zip(&signal_line))
        .map(|(bar, (&line, &signal))| IndicatorPoint {
            date: bar.date,
            buy: Some(line > signal),
            value: IndicatorValue::Macd { line, signal },
        })
        .collect();

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Macd(*params),
        values,
    })
}
