//! Engine error types.

/// Top-level error type for tradesignal.
#[derive(Debug, thiserror::Error)]
pub enum TradeSignalError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("insufficient data for {strategy}: have {bars} bars, need {minimum}")]
    InsufficientData {
        strategy: String,
        bars: usize,
        minimum: usize,
    },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("series length mismatch: expected {expected}, got {actual}")]
    SeriesMismatch { expected: usize, actual: usize },

    #[error("no strategies selected")]
    NoStrategies,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TradeSignalError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        TradeSignalError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Reject zero-length windows and spans.
pub(crate) fn require_positive_window(name: &str, value: usize) -> Result<(), TradeSignalError> {
    if value == 0 {
        return Err(TradeSignalError::invalid(name, "must be at least 1"));
    }
    Ok(())
}

/// Reject non-finite and non-positive amounts.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<(), TradeSignalError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(TradeSignalError::invalid(name, "must be a positive number"));
    }
    Ok(())
}
