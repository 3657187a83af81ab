#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use tradesignal::domain::error::TradeSignalError;
pub use tradesignal::domain::ohlcv::OhlcvBar;
use tradesignal::domain::signal::{SignalPoint, SignalSeries};
use tradesignal::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, TradeSignalError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TradeSignalError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, TradeSignalError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Bar with a one-unit range around `close`.
pub fn make_bar(date: NaiveDate, close: f64) -> OhlcvBar {
    OhlcvBar {
        date,
        open: close,
        high: close + 0.5,
        low: close - 0.5,
        close,
        volume: 1000.0,
    }
}

/// Consecutive daily bars starting 2024-01-01.
pub fn bars_from_closes(closes: &[f64]) -> Vec<OhlcvBar> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(start + chrono::Duration::days(i as i64), c))
        .collect()
}

/// Rise, fall, rise again: enough movement for every strategy to switch.
pub fn generate_bars(n: usize) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64;
            100.0 + 20.0 * (t / 15.0).sin() + 0.1 * t
        })
        .collect();
    bars_from_closes(&closes)
}

pub fn signal_from(bars: &[OhlcvBar], buys: &[bool]) -> SignalSeries {
    let points = bars
        .iter()
        .zip(buys)
        .map(|(b, &buy)| SignalPoint { date: b.date, buy })
        .collect();
    SignalSeries::new("TEST", points)
}
