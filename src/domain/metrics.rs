//! Performance metrics over a simulated portfolio.

use crate::domain::error::{require_positive_window, TradeSignalError};
use crate::domain::indicator::rolling::{rolling_max, rolling_min};
use crate::domain::ohlcv::{closes, OhlcvBar};
use crate::domain::portfolio::PortfolioRow;
use crate::domain::signal::{SignalEventKind, SignalSeries};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
/// Deviations within this many ulps of the mean are summation rounding.
const ROUNDING_ULPS: f64 = 16.0;
pub const DEFAULT_DRAWDOWN_WINDOW: usize = 252;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Metrics {
    /// Mean per-bar return.
    pub simple_return: f64,
    pub sharpe_ratio: f64,
    pub cagr: f64,
    /// Rolling minimum of `daily_drawdown`, one value per bar.
    pub max_drawdown: Vec<f64>,
    /// Close relative to its rolling peak, minus one.
    pub daily_drawdown: Vec<f64>,
    pub standard_deviation: f64,
    pub total_return: f64,
    pub trade_count: usize,
}

impl Metrics {
    pub fn compute(
        rows: &[PortfolioRow],
        bars: &[OhlcvBar],
        ensemble: &SignalSeries,
        drawdown_window: usize,
    ) -> Result<Self, TradeSignalError> {
        if rows.len() != bars.len() {
            return Err(TradeSignalError::SeriesMismatch {
                expected: bars.len(),
                actual: rows.len(),
            });
        }

        let returns: Vec<f64> = rows.iter().map(|r| r.period_return).collect();
        let (max_drawdown, daily_drawdown) = max_drawdown(&closes(bars), drawdown_window)?;

        Ok(Metrics {
            simple_return: simple_return(&returns),
            sharpe_ratio: sharpe_ratio(&returns),
            cagr: cagr(rows),
            max_drawdown,
            daily_drawdown,
            standard_deviation: standard_deviation(&returns),
            total_return: total_return(rows),
            trade_count: trade_count(ensemble),
        })
    }

    /// Worst drawdown seen anywhere in the run, `0.0` for an empty run.
    pub fn worst_drawdown(&self) -> f64 {
        self.max_drawdown.iter().copied().fold(0.0, f64::min)
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn simple_return(returns: &[f64]) -> f64 {
    mean(returns)
}

/// Sample standard deviation, `0.0` with fewer than two returns or when
/// the returns differ only by rounding.
pub fn standard_deviation(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let avg = mean(returns);
    let sum_sq: f64 = returns.iter().map(|r| (r - avg) * (r - avg)).sum();
    let std = (sum_sq / (returns.len() - 1) as f64).sqrt();
    if std <= ROUNDING_ULPS * f64::EPSILON * avg.abs() {
        return 0.0;
    }
    std
}

/// Annualised Sharpe ratio with a zero risk-free rate.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    let std = standard_deviation(returns);
    if std == 0.0 {
        return 0.0;
    }
    TRADING_DAYS_PER_YEAR.sqrt() * mean(returns) / std
}

/// Returns `(max_drawdown, daily_drawdown)` over `window` trailing bars.
pub fn max_drawdown(
    prices: &[f64],
    window: usize,
) -> Result<(Vec<f64>, Vec<f64>), TradeSignalError> {
    require_positive_window("drawdown_window", window)?;

    let peaks = rolling_max(prices, window);
    let daily: Vec<f64> = prices
        .iter()
        .zip(&peaks)
        .map(|(&p, &peak)| if peak > 0.0 { p / peak - 1.0 } else { 0.0 })
        .collect();
    let worst = rolling_min(&daily, window);
    Ok((worst, daily))
}

/// Compound growth annualised on a 252-day year over the calendar span.
///
/// `0.0` when the span is empty or the starting value is not positive;
/// `-1.0` when the run ends at or below zero.
pub fn cagr(rows: &[PortfolioRow]) -> f64 {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return 0.0;
    };
    let days = (last.date - first.date).num_days();
    if days <= 0 || first.total <= 0.0 {
        return 0.0;
    }
    let ratio = last.total / first.total;
    if ratio <= 0.0 {
        return -1.0;
    }
    ratio.powf(TRADING_DAYS_PER_YEAR / days as f64) - 1.0
}

pub fn total_return(rows: &[PortfolioRow]) -> f64 {
    match (rows.first(), rows.last()) {
        (Some(first), Some(last)) if first.total != 0.0 => last.total / first.total - 1.0,
        _ => 0.0,
    }
}

/// Number of flat-to-long entries.
pub fn trade_count(ensemble: &SignalSeries) -> usize {
    ensemble
        .events()
        .iter()
        .filter(|e| e.kind == SignalEventKind::Buy)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_bars::from_closes;
    use crate::domain::signal::SignalPoint;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn row(date: NaiveDate, total: f64, period_return: f64) -> PortfolioRow {
        PortfolioRow {
            date,
            position: 0.0,
            position_change: 0.0,
            holdings: 0.0,
            cash: total,
            total,
            period_return,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn simple_return_is_mean() {
        assert_relative_eq!(simple_return(&[0.0, 0.01, -0.02, 0.03]), 0.005, epsilon = 1e-12);
        assert_eq!(simple_return(&[]), 0.0);
    }

    #[test]
    fn standard_deviation_uses_sample_divisor() {
        // mean 5, squared deviations sum to 32, n-1 = 7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(standard_deviation(&values), (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
        assert_eq!(standard_deviation(&[0.5]), 0.0);
    }

    #[test]
    fn sharpe_ratio_formula() {
        let returns = [0.01, 0.02, -0.01, 0.03];
        let expected = 252.0_f64.sqrt() * mean(&returns) / standard_deviation(&returns);
        assert_relative_eq!(sharpe_ratio(&returns), expected, epsilon = 1e-12);
        assert!(sharpe_ratio(&returns) > 0.0);
    }

    #[test]
    fn constant_returns_have_no_deviation() {
        // the mean of three 0.1s is 0.10000000000000002
        assert_eq!(standard_deviation(&[0.1, 0.1, 0.1]), 0.0);
        assert_eq!(sharpe_ratio(&[0.1, 0.1, 0.1]), 0.0);
    }

    #[test]
    fn sharpe_ratio_zero_without_variance() {
        assert_eq!(sharpe_ratio(&[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(sharpe_ratio(&[0.01, 0.01]), 0.0);
        assert_eq!(sharpe_ratio(&[]), 0.0);
    }

    #[test]
    fn drawdown_tracks_rolling_peak() {
        let (worst, daily) = max_drawdown(&[100.0, 110.0, 88.0, 99.0, 120.0], 10).unwrap();
        assert_relative_eq!(daily[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(daily[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(daily[2], -0.2, epsilon = 1e-12);
        assert_relative_eq!(daily[3], -0.1, epsilon = 1e-12);
        assert_relative_eq!(daily[4], 0.0, epsilon = 1e-12);
        assert_relative_eq!(worst[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(worst[2], -0.2, epsilon = 1e-12);
        assert_relative_eq!(worst[4], -0.2, epsilon = 1e-12);
    }

    #[test]
    fn drawdown_window_forgets_old_peaks() {
        let (worst, daily) = max_drawdown(&[100.0, 50.0, 60.0, 70.0], 2).unwrap();
        assert_relative_eq!(daily[1], -0.5, epsilon = 1e-12);
        assert_relative_eq!(daily[2], 0.0, epsilon = 1e-12);
        assert_relative_eq!(worst[2], -0.5, epsilon = 1e-12);
        assert_relative_eq!(worst[3], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_drawdown_window_rejected() {
        assert!(max_drawdown(&[1.0, 2.0], 0).is_err());
    }

    #[test]
    fn cagr_over_calendar_days() {
        let rows = vec![
            row(date(2024, 1, 1), 1000.0, 0.0),
            row(date(2024, 1, 2), 1050.0, 0.05),
            row(date(2024, 9, 8), 1100.0, 0.047_619),
        ];
        let days = (date(2024, 9, 8) - date(2024, 1, 1)).num_days() as f64;
        assert_relative_eq!(cagr(&rows), 1.1_f64.powf(252.0 / days) - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn cagr_sentinels() {
        assert_eq!(cagr(&[]), 0.0);
        assert_eq!(cagr(&[row(date(2024, 1, 1), 1000.0, 0.0)]), 0.0);

        let wiped = vec![
            row(date(2024, 1, 1), 1000.0, 0.0),
            row(date(2024, 3, 1), -10.0, -1.01),
        ];
        assert_eq!(cagr(&wiped), -1.0);
    }

    #[test]
    fn total_return_first_to_last() {
        let rows = vec![
            row(date(2024, 1, 1), 1000.0, 0.0),
            row(date(2024, 1, 2), 900.0, -0.1),
            row(date(2024, 1, 3), 1200.0, 1.0 / 3.0),
        ];
        assert_relative_eq!(total_return(&rows), 0.2, epsilon = 1e-12);
        assert_eq!(total_return(&[]), 0.0);
    }

    #[test]
    fn trade_count_counts_entries() {
        let bars = from_closes(&[1.0; 7]);
        let buys = [true, false, true, true, false, true, false];
        let points = bars
            .iter()
            .zip(buys)
            .map(|(b, buy)| SignalPoint { date: b.date, buy })
            .collect();
        let ensemble = SignalSeries::new("ENSEMBLE", points);
        assert_eq!(trade_count(&ensemble), 2);
    }

    #[test]
    fn flat_prices_have_no_risk() {
        let bars = from_closes(&[10.0; 6]);
        let rows: Vec<PortfolioRow> = bars.iter().map(|b| row(b.date, 1000.0, 0.0)).collect();
        let ensemble = SignalSeries::new(
            "ENSEMBLE",
            bars.iter()
                .map(|b| SignalPoint {
                    date: b.date,
                    buy: false,
                })
                .collect(),
        );

        let metrics = Metrics::compute(&rows, &bars, &ensemble, DEFAULT_DRAWDOWN_WINDOW).unwrap();
        assert_eq!(metrics.sharpe_ratio, 0.0);
        assert_eq!(metrics.standard_deviation, 0.0);
        assert_eq!(metrics.simple_return, 0.0);
        assert!(metrics.max_drawdown.iter().all(|&d| d == 0.0));
        assert!(metrics.daily_drawdown.iter().all(|&d| d == 0.0));
        assert_eq!(metrics.worst_drawdown(), 0.0);
        assert_eq!(metrics.trade_count, 0);
    }

    #[test]
    fn compute_rejects_misaligned_rows() {
        let bars = from_closes(&[10.0, 11.0]);
        let rows = vec![row(bars[0].date, 1000.0, 0.0)];
        let ensemble = SignalSeries::new("ENSEMBLE", vec![]);
        let err = Metrics::compute(&rows, &bars, &ensemble, 5).unwrap_err();
        assert!(matches!(err, TradeSignalError::SeriesMismatch { .. }));
    }
}
