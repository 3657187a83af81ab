//! Simple moving-average crossover.
//!
//! Short_MA / Long_MA are trailing means of close; buy while
//! Short_MA > Long_MA. Default windows: short=40, long=100.

use crate::domain::error::{require_positive_window, TradeSignalError};
use crate::domain::indicator::rolling::rolling_mean;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::{closes, OhlcvBar};

pub const DEFAULT_SHORT_WINDOW: usize = 40;
pub const DEFAULT_LONG_WINDOW: usize = 100;

/// Windows are not required to be ordered; a "short" window longer than the
/// "long" one simply inverts the crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MovingAverageParams {
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for MovingAverageParams {
    fn default() -> Self {
        Self {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
        }
    }
}

impl MovingAverageParams {
    pub fn validate(&self) -> Result<(), TradeSignalError> {
        require_positive_window("short_window", self.short_window)?;
        require_positive_window("long_window", self.long_window)?;
        Ok(())
    }
}

pub fn calculate_crossover(
    bars: &[OhlcvBar],
    params: &MovingAverageParams,
) -> Result<IndicatorSeries, TradeSignalError> {
    params.validate()?;

    let close = closes(bars);
    let short_ma = rolling_mean(&close, params.short_window);
    let long_ma = rolling_mean(&close, params.long_window);

    let values = bars
        .iter()
        .zip(short_ma.iter().zip(&long_ma))
        .map(|(bar, (&short, &long))| IndicatorPoint {
            date: bar.date,
            buy: Some(short > long),
            value: IndicatorValue::MovingAverage { short, long },
        })
        .collect();

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::MovingAverage(*params),
        values,
    })
}
