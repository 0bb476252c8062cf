//! Engine configuration.
//!
//! Defaults cover the common case; a JSON file can override any subset of
//! fields, and the CLI applies its flags on top of that.

use crate::columns::ColumnMap;
use crate::error::{EpiError, Result};
use serde::Deserialize;
use std::path::Path;

/// Region key that marks national-total rows in the source data.
pub const DEFAULT_NATIONAL_KEY: &str = "ALL";

/// Display name used in national chart titles.
pub const DEFAULT_NATIONAL_LABEL: &str = "National";

/// Number of regions shown in the ranking chart.
pub const DEFAULT_TOP_N: usize = 10;

/// How faithfully to follow the source dashboard's known chart defects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatMode {
    /// Recovered diff plots the diff; ranking bars plot each metric's own value.
    #[default]
    Corrected,
    /// Recovered diff plots the raw cumulative series; ranking is ordered by
    /// and (for "all") valued at the confirmed count.
    Reference,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub columns: ColumnMap,
    pub national_key: String,
    pub national_label: String,
    pub top_n: usize,
    pub compat: CompatMode,
    /// Whether national-key rows count towards national series and totals.
    pub include_national_rows: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMap::default(),
            national_key: DEFAULT_NATIONAL_KEY.to_string(),
            national_label: DEFAULT_NATIONAL_LABEL.to_string(),
            top_n: DEFAULT_TOP_N,
            compat: CompatMode::default(),
            include_national_rows: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| EpiError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        log::info!("[EPI] config: loaded {}", path.display());
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(EpiError::Config("top_n must be at least 1".to_string()));
        }
        if self.national_key.trim().is_empty() {
            return Err(EpiError::Config("national_key must not be empty".to_string()));
        }
        Ok(())
    }
}
