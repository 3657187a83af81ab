//! Commodity Channel Index.
//!
//! TP = (H + L + C) / 3
//! SMA = trailing mean of TP, MeanDev = trailing sample std of TP
//! CCI = (TP - SMA) / (constant * MeanDev)
//!
//! Buy while CCI > 100. Bars where MeanDev is undefined (one point, or a flat
//! window) have no CCI and never buy.

use crate::domain::error::{require_positive, require_positive_window, TradeSignalError};
use crate::domain::indicator::rolling::{rolling_mean, rolling_sample_std};
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_WINDOW: usize = 20;
pub const DEFAULT_CONSTANT: f64 = 0.015;
pub const BUY_LEVEL: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CciParams {
    pub window: usize,
    pub constant: f64,
}

impl Default for CciParams {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            constant: DEFAULT_CONSTANT,
        }
    }
}

impl CciParams {
    pub fn validate(&self) -> Result<(), TradeSignalError> {
        require_positive_window("window", self.window)?;
        require_positive("constant", self.constant)?;
        Ok(())
    }
}

pub fn calculate_cci(
    bars: &[OhlcvBar],
    params: &CciParams,
) -> Result<IndicatorSeries, TradeSignalError> {
    params.validate()?;

    let typical: Vec<f64> = bars.iter().map(OhlcvBar::typical_price).collect();
    let sma = rolling_mean(&typical, params.window);
    let deviation = rolling_sample_std(&typical, params.window);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let cci = deviation[i]
                .map(|md| (typical[i] - sma[i]) / (params.constant * md))
                .filter(|v| v.is_finite());
            IndicatorPoint {
                date: bar.date,
                buy: Some(cci.is_some_and(|v| v > BUY_LEVEL)),
                value: IndicatorValue::Cci {
                    typical_price: typical[i],
                    sma: sma[i],
                    mean_deviation: deviation[i],
                    cci,
                },
            }
        })
        .collect();

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Cci(*params),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_bars::{from_closes, from_hlc};
    use approx::assert_relative_eq;

    fn cci_values(series: &IndicatorSeries) -> Vec<Option<f64>> {
        series
            .values
            .iter()
            .map(|p| match p.value {
                IndicatorValue::Cci { cci, .. } => cci,
                _ => panic!("Expected Cci value"),
            })
            .collect()
    }

    #[test]
    fn flat_prices_never_buy() {
        let bars = from_closes(&[10.0, 10.0, 10.0, 10.0, 10.0]);
        let series = calculate_cci(
            &bars,
            &CciParams {
                window: 3,
                constant: 0.015,
            },
        )
        .unwrap();

        assert!(series.values.iter().all(|p| p.buy == Some(false)));
        assert!(cci_values(&series).iter().all(Option::is_none));
    }

    #[test]
    fn first_bar_has_no_deviation() {
        let bars = from_closes(&[10.0, 12.0]);
        let series = calculate_cci(&bars, &CciParams::default()).unwrap();
        match series.values[0].value {
            IndicatorValue::Cci { mean_deviation, .. } => assert_eq!(mean_deviation, None),
            _ => panic!("Expected Cci value"),
        }
        assert_eq!(series.values[0].buy, Some(false));
    }

    #[test]
    fn cci_formula() {
        let bars = from_hlc(&[(11.0, 9.0, 10.0), (12.0, 10.0, 11.0), (16.0, 12.0, 14.0)]);
        let series = calculate_cci(
            &bars,
            &CciParams {
                window: 3,
                constant: 0.015,
            },
        )
        .unwrap();

        // TP = [10, 11, 14], SMA = 35/3, sample std = sqrt(((-5/3)^2 + (-2/3)^2 + (7/3)^2) / 2)
        let sma: f64 = 35.0 / 3.0;
        let md = ((25.0 + 4.0 + 49.0) / 9.0 / 2.0_f64).sqrt();
        let expected = (14.0 - sma) / (0.015 * md);

        let cci = cci_values(&series);
        assert_relative_eq!(cci[2].unwrap(), expected, epsilon = 1e-9);
        assert_eq!(series.values[2].buy, Some(expected > 100.0));
    }

    #[test]
    fn breakout_buys() {
        let bars = from_closes(&[10.0, 10.1, 9.9, 10.0, 10.05, 9.95, 14.0]);
        let series = calculate_cci(
            &bars,
            &CciParams {
                window: 7,
                constant: 0.015,
            },
        )
        .unwrap();
        assert_eq!(series.values[6].buy, Some(true));
    }

    #[test]
    fn invalid_constant_rejected() {
        let bars = from_closes(&[10.0, 11.0]);
        for constant in [0.0, -0.015, f64::NAN] {
            let err = calculate_cci(&bars, &CciParams { window: 3, constant }).unwrap_err();
            assert!(
                matches!(err, TradeSignalError::InvalidParameter { name, .. } if name == "constant")
            );
        }
    }
}
