//! Strategy selection: which indicators vote in the ensemble, and with which
//! parameters.

use crate::domain::error::TradeSignalError;
use crate::domain::indicator::{
    CciParams, IndicatorType, MacdParams, MovingAverageParams, PsarParams,
};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Macd,
    MovingAverage,
    Cci,
    Psar,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Macd,
        StrategyKind::MovingAverage,
        StrategyKind::Cci,
        StrategyKind::Psar,
    ];

    /// Config key and section name.
    pub fn key(&self) -> &'static str {
        match self {
            StrategyKind::Macd => "macd",
            StrategyKind::MovingAverage => "ma",
            StrategyKind::Cci => "cci",
            StrategyKind::Psar => "psar",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "macd" => Ok(StrategyKind::Macd),
            "ma" | "moving_average" => Ok(StrategyKind::MovingAverage),
            "cci" => Ok(StrategyKind::Cci),
            "psar" | "parabolic_sar" => Ok(StrategyKind::Psar),
            other => Err(format!("unknown strategy '{other}'")),
        }
    }
}

/// Parameters for every strategy; only those named in `active` run.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategySet {
    pub active: Vec<StrategyKind>,
    pub macd: MacdParams,
    pub moving_average: MovingAverageParams,
    pub cci: CciParams,
    pub psar: PsarParams,
}

impl Default for StrategySet {
    fn default() -> Self {
        Self::with_active(StrategyKind::ALL.to_vec())
    }
}

impl StrategySet {
    /// Default parameters for the given strategies.
    pub fn with_active(active: Vec<StrategyKind>) -> Self {
        Self {
            active,
            macd: MacdParams::default(),
            moving_average: MovingAverageParams::default(),
            cci: CciParams::default(),
            psar: PsarParams::default(),
        }
    }

    pub fn indicator(&self, kind: StrategyKind) -> IndicatorType {
        match kind {
            StrategyKind::Macd => IndicatorType::Macd(self.macd),
            StrategyKind::MovingAverage => IndicatorType::MovingAverage(self.moving_average),
            StrategyKind::Cci => IndicatorType::Cci(self.cci),
            StrategyKind::Psar => IndicatorType::Psar(self.psar),
        }
    }

    /// Indicators for the active strategies, in selection order.
    pub fn indicators(&self) -> Vec<IndicatorType> {
        self.active.iter().map(|&k| self.indicator(k)).collect()
    }

    pub fn validate(&self) -> Result<(), TradeSignalError> {
        if self.active.is_empty() {
            return Err(TradeSignalError::NoStrategies);
        }
        let mut seen = HashSet::new();
        for kind in &self.active {
            if !seen.insert(*kind) {
                return Err(TradeSignalError::invalid(
                    "strategies",
                    format!("duplicate strategy '{kind}'"),
                ));
            }
            self.indicator(*kind).validate()?;
        }
        Ok(())
    }
}
