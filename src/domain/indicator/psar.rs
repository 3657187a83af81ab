//! Parabolic SAR (stop and reverse).
//!
//! Inherently sequential: each bar's SAR depends on the previous SAR and on
//! the trend, acceleration factor (AF) and extreme point (EP) carried in
//! [`PsarState`].
//!
//! The first two bars are a warm-up prefix: their SAR is the close, they
//! belong to neither line and their signal is unclassified. Stepping starts
//! at index 2.

use crate::domain::error::{require_positive, TradeSignalError};
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_INITIAL_AF: f64 = 0.02;
pub const DEFAULT_MAX_AF: f64 = 0.2;
pub const MIN_BARS: usize = 3;
const WARMUP_BARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PsarParams {
    pub initial_af: f64,
    pub max_af: f64,
}

impl Default for PsarParams {
    fn default() -> Self {
        Self {
            initial_af: DEFAULT_INITIAL_AF,
            max_af: DEFAULT_MAX_AF,
        }
    }
}

impl PsarParams {
    pub fn validate(&self) -> Result<(), TradeSignalError> {
        require_positive("initial_af", self.initial_af)?;
        require_positive("max_af", self.max_af)?;
        if self.max_af < self.initial_af {
            return Err(TradeSignalError::invalid(
                "max_af",
                "must be greater than or equal to initial_af",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Trend {
    Bull,
    Bear,
}

/// Carried state of the SAR recurrence.
///
/// `extreme_point` is the highest high seen in a bull run and the lowest low
/// in a bear run. Only [`calculate_psar`] advances the state:
///
/// ```compile_fail
/// use tradesignal::domain::indicator::psar::PsarState;
/// use tradesignal::domain::ohlcv::OhlcvBar;
///
/// fn advance(state: &mut PsarState, bars: &[OhlcvBar]) {
///     state.step(bars, 2, 0.0);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PsarState {
    pub trend: Trend,
    pub af: f64,
    pub extreme_point: f64,
    params: PsarParams,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PsarStep {
    pub sar: f64,
    pub reversed: bool,
}

impl PsarState {
    /// Bull trend, seeded from the first bar's high.
    pub fn new(first: &OhlcvBar, params: PsarParams) -> Self {
        Self {
            trend: Trend::Bull,
            af: params.initial_af,
            extreme_point: first.high,
            params,
        }
    }

    /// Advance the recurrence to `bars[i]` given the SAR at `i - 1`.
    ///
    /// Requires `2 <= i < bars.len()`: the clamp looks back two bars.
    pub(crate) fn step(&mut self, bars: &[OhlcvBar], i: usize, prev_sar: f64) -> PsarStep {
        debug_assert!(i >= WARMUP_BARS);
        let bar = &bars[i];
        let mut sar = prev_sar + self.af * (self.extreme_point - prev_sar);

        let reversal = match self.trend {
            Trend::Bull => bar.low < sar,
            Trend::Bear => bar.high > sar,
        };

        if reversal {
            sar = self.extreme_point;
            let (trend, extreme_point) = match self.trend {
                Trend::Bull => (Trend::Bear, bar.low),
                Trend::Bear => (Trend::Bull, bar.high),
            };
            self.trend = trend;
            self.extreme_point = extreme_point;
            self.af = self.params.initial_af;
            return PsarStep {
                sar,
                reversed: true,
            };
        }

        match self.trend {
            Trend::Bull => {
                if bar.high > self.extreme_point {
                    self.extreme_point = bar.high;
                    self.accelerate();
                }
                sar = sar.min(bars[i - 1].low).min(bars[i - 2].low);
            }
            Trend::Bear => {
                if bar.low < self.extreme_point {
                    self.extreme_point = bar.low;
                    self.accelerate();
                }
                sar = sar.max(bars[i - 1].high).max(bars[i - 2].high);
            }
        }

        PsarStep {
            sar,
            reversed: false,
        }
    }

    fn accelerate(&mut self) {
        self.af = (self.af + self.params.initial_af).min(self.params.max_af);
    }
}

pub fn calculate_psar(
    bars: &[OhlcvBar],
    params: &PsarParams,
) -> Result<IndicatorSeries, TradeSignalError> {
    params.validate()?;
    let indicator_type = IndicatorType::Psar(*params);

    if bars.len() < MIN_BARS {
        return Err(TradeSignalError::InsufficientData {
            strategy: indicator_type.to_string(),
            bars: bars.len(),
            minimum: MIN_BARS,
        });
    }

    let mut values = Vec::with_capacity(bars.len());
    for bar in &bars[..WARMUP_BARS] {
        values.push(IndicatorPoint {
            date: bar.date,
            buy: None,
            value: IndicatorValue::Psar {
                sar: bar.close,
                bull: None,
                bear: None,
            },
        });
    }

    let mut state = PsarState::new(&bars[0], *params);
    let mut sar = bars[WARMUP_BARS - 1].close;

    for i in WARMUP_BARS..bars.len() {
        sar = state.step(bars, i, sar).sar;
        let bull = state.trend == Trend::Bull;
        values.push(IndicatorPoint {
            date: bars[i].date,
            buy: Some(bull),
            value: IndicatorValue::Psar {
                sar,
                bull: bull.then_some(sar),
                bear: (!bull).then_some(sar),
            },
        });
    }

    Ok(IndicatorSeries {
        indicator_type,
        values,
    })
}
