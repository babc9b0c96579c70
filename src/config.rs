//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields the stock calculator. Partial documents override only what they name.
//!
//! ```json
//! {
//!   "historyCapacity": 50,
//!   "dcf": { "projectionYears": 7 },
//!   "memory": { "wacc": 9.0 },
//!   "rates": { "USD": 1.0, "EUR": 0.92 }
//! }
//! ```
use crate::error::{CalcError, Result};
use crate::fx::RateTable;
use crate::store::history::DEFAULT_HISTORY_CAPACITY;
use crate::store::MemoryParameters;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Growth schedule for the explicit DCF projection.
///
/// Year `n` grows at `max(initial_growth - growth_decline * (n - 1), g)`,
/// where `g` is the terminal growth rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DcfAssumptions {
    pub projection_years: u32,
    pub initial_growth: f64,
    pub growth_decline: f64,
}

impl Default for DcfAssumptions {
    fn default() -> Self {
        Self { projection_years: 5, initial_growth: 0.15, growth_decline: 0.02 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub history_capacity: usize,
    pub dcf: DcfAssumptions,
    pub memory: MemoryParameters,
    pub rates: RateTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            dcf: DcfAssumptions::default(),
            memory: MemoryParameters::default(),
            rates: RateTable::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(CalcError::config("historyCapacity must be at least 1"));
        }
        if self.dcf.projection_years == 0 {
            return Err(CalcError::config("dcf.projectionYears must be at least 1"));
        }
        self.rates.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_is_default() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_json_str(
            r#"{"historyCapacity": 5, "dcf": {"projectionYears": 7}, "memory": {"wacc": 9.0}}"#,
        )
        .unwrap();
        assert_eq!(config.history_capacity, 5);
        assert_eq!(config.dcf.projection_years, 7);
        assert_eq!(config.dcf.initial_growth, 0.15);
        assert_eq!(config.memory.wacc, 9.0);
        assert_eq!(config.memory.terminal_growth, 2.5);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = EngineConfig::from_json_str(r#"{"historyCapacity": 0}"#).unwrap_err();
        assert!(matches!(err, CalcError::Config(_)));
    }

    #[test]
    fn test_bad_rate_rejected() {
        let err = EngineConfig::from_json_str(r#"{"rates": {"EUR": -1.0}}"#).unwrap_err();
        assert!(matches!(err, CalcError::InvalidRate { .. }));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"memory": {{"terminalGrowth": 3.0}}}}"#).unwrap();
        let config = EngineConfig::from_path(file.path()).unwrap();
        assert_eq!(config.memory.terminal_growth, 3.0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::from_path(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CalcError::Io(_)));
    }
}
