//! INI file configuration adapter.

use crate::domain::error::TradeSignalError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TradeSignalError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| TradeSignalError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, TradeSignalError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| TradeSignalError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn not_a_number(section: &str, key: &str, reason: String) -> TradeSignalError {
        TradeSignalError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, TradeSignalError> {
        self.config
            .getint(section, key)
            .map(|v| v.unwrap_or(default))
            .map_err(|e| Self::not_a_number(section, key, e))
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, TradeSignalError> {
        self.config
            .getfloat(section, key)
            .map(|v| v.unwrap_or(default))
            .map_err(|e| Self::not_a_number(section, key, e))
    }
}
