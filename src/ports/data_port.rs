//! Data access port trait.

use crate::domain::error::TradeSignalError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

/// Source of daily bars.
///
/// Implementations return bars inside `[start_date, end_date]`, sorted by
/// date with no duplicates.
pub trait DataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, TradeSignalError>;

    fn list_symbols(&self) -> Result<Vec<String>, TradeSignalError>;
}
