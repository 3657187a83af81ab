//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: one bar of indicator output plus its buy classification
//! - `IndicatorValue`: enum for the intermediate columns of each indicator
//! - `IndicatorType`: enum for indicator identity + parameters
//! - `IndicatorSeries`: a time series of indicator points

pub mod ema;
pub mod rolling;
pub mod macd;
pub mod moving_average;
pub mod cci;
pub mod psar;

use crate::domain::error::TradeSignalError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::{SignalPoint, SignalSeries};
use chrono::NaiveDate;
use std::fmt;

pub use cci::CciParams;
pub use macd::MacdParams;
pub use moving_average::MovingAverageParams;
pub use psar::PsarParams;

/// `buy` is `None` while the indicator has not classified the bar yet
/// (PSAR warm-up). Unclassified bars resolve to hold-long in [`IndicatorSeries::signal`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub buy: Option<bool>,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum IndicatorValue {
    Macd {
        line: f64,
        signal: f64,
    },
    MovingAverage {
        short: f64,
        long: f64,
    },
    Cci {
        typical_price: f64,
        sma: f64,
        mean_deviation: Option<f64>,
        cci: Option<f64>,
    },
    Psar {
        sar: f64,
        bull: Option<f64>,
        bear: Option<f64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum IndicatorType {
    Macd(MacdParams),
    MovingAverage(MovingAverageParams),
    Cci(CciParams),
    Psar(PsarParams),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorType {
    pub fn validate(&self) -> Result<(), TradeSignalError> {
        match self {
            IndicatorType::Macd(p) => p.validate(),
            IndicatorType::MovingAverage(p) => p.validate(),
            IndicatorType::Cci(p) => p.validate(),
            IndicatorType::Psar(p) => p.validate(),
        }
    }

    /// Fewest bars the indicator accepts. Windowed indicators shrink their
    /// window instead of failing, so only PSAR has a floor.
    pub fn minimum_bars(&self) -> usize {
        match self {
            IndicatorType::Psar(_) => psar::MIN_BARS,
            _ => 0,
        }
    }

    pub fn compute(&self, bars: &[OhlcvBar]) -> Result<IndicatorSeries, TradeSignalError> {
        match self {
            IndicatorType::Macd(p) => macd::calculate_macd(bars, p),
            IndicatorType::MovingAverage(p) => moving_average::calculate_crossover(bars, p),
            IndicatorType::Cci(p) => cci::calculate_cci(bars, p),
            IndicatorType::Psar(p) => psar::calculate_psar(bars, p),
        }
    }
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Buy/sell decisions, with unclassified bars treated as hold-long.
    pub fn signal(&self) -> SignalSeries {
        let points = self
            .values
            .iter()
            .map(|p| SignalPoint {
                date: p.date,
                buy: p.buy.unwrap_or(true),
            })
            .collect();
        SignalSeries::new(self.indicator_type.to_string(), points)
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Macd(p) => write!(f, "MACD({},{},{})", p.fast, p.slow, p.signal),
            IndicatorType::MovingAverage(p) => {
                write!(f, "MA({},{})", p.short_window, p.long_window)
            }
            IndicatorType::Cci(p) => write!(f, "CCI({},{})", p.window, p.constant),
            IndicatorType::Psar(p) => write!(f, "PSAR({},{})", p.initial_af, p.max_af),
        }
    }
}
