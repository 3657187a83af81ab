//! Configuration access port trait.

use crate::domain::error::TradeSignalError;

/// Keyed access to sectioned configuration.
///
/// Numeric getters fall back to `default` when the key is absent and fail
/// with `ConfigInvalid` when it is present but not a number.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, TradeSignalError>;
    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, TradeSignalError>;
}
