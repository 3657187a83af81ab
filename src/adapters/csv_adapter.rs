//! CSV file data adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with a header row naming at
//! least `date, open, high, low, close, volume` in any order and case. Extra
//! columns such as `Adj Close` are ignored. Rows with blank or `null` fields
//! are skipped with a warning.

use crate::domain::error::TradeSignalError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

const COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv"))
    }
}

fn data_error(reason: String) -> TradeSignalError {
    TradeSignalError::Data { reason }
}

/// Positions of [`COLUMNS`] in the header row.
fn column_indices(headers: &csv::StringRecord) -> Result<[usize; 6], TradeSignalError> {
    let mut indices = [0usize; 6];
    for (slot, name) in indices.iter_mut().zip(COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| data_error(format!("missing {name} column")))?;
    }
    Ok(indices)
}

fn is_blank(field: &str) -> bool {
    let field = field.trim();
    field.is_empty() || field.eq_ignore_ascii_case("null") || field.eq_ignore_ascii_case("nan")
}

fn parse_price(field: &str, name: &str, date: NaiveDate) -> Result<f64, TradeSignalError> {
    field
        .trim()
        .parse()
        .map_err(|e| data_error(format!("invalid {name} value on {date}: {e}")))
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, TradeSignalError> {
        let path = self.csv_path(symbol);
        let mut rdr = csv::Reader::from_path(&path)
            .map_err(|e| data_error(format!("failed to read {}: {}", path.display(), e)))?;
        let headers = rdr
            .headers()
            .map_err(|e| data_error(format!("CSV parse error: {e}")))?
            .clone();
        let [date_col, open_col, high_col, low_col, close_col, volume_col] =
            column_indices(&headers)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| data_error(format!("CSV parse error: {e}")))?;
            let field = |i: usize| record.get(i).unwrap_or("");

            let date = NaiveDate::parse_from_str(field(date_col).trim(), "%Y-%m-%d")
                .map_err(|e| data_error(format!("invalid date format: {e}")))?;
            if date < start_date || date > end_date {
                continue;
            }

            let cols = [open_col, high_col, low_col, close_col, volume_col];
            if cols.iter().any(|&i| is_blank(field(i))) {
                tracing::warn!(symbol, %date, "skipping row with missing values");
                continue;
            }

            bars.push(OhlcvBar {
                date,
                open: parse_price(field(open_col), "open", date)?,
                high: parse_price(field(high_col), "high", date)?,
                low: parse_price(field(low_col), "low", date)?,
                close: parse_price(field(close_col), "close", date)?,
                volume: parse_price(field(volume_col), "volume", date)?,
            });
        }

        bars.sort_by_key(|b| b.date);
        if let Some(w) = bars.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(data_error(format!(
                "duplicate bar for {} on {}",
                symbol, w[0].date
            )));
        }

        tracing::debug!(symbol, bars = bars.len(), "loaded bars from csv");
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TradeSignalError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            data_error(format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| data_error(format!("directory entry error: {e}")))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                symbols.push(stem.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
