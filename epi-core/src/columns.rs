//! Source column names for the five required input fields.

use crate::error::{EpiError, Result};
use csv::StringRecord;
use serde::Deserialize;

/// Maps each required field to its column header in the source CSV.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub date: String,
    pub region: String,
    pub confirmed_cum: String,
    pub deceased_cum: String,
    pub active_cum: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            date: "date".to_string(),
            region: "region".to_string(),
            confirmed_cum: "confirmed_cum".to_string(),
            deceased_cum: "deceased_cum".to_string(),
            active_cum: "active_cum".to_string(),
        }
    }
}

/// Header positions of the required columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndexes {
    pub date: usize,
    pub region: usize,
    pub confirmed_cum: usize,
    pub deceased_cum: usize,
    pub active_cum: usize,
}

impl ColumnMap {
    /// Column names of the Indonesian provincial dataset
    /// (`Tanggal`, `Provinsi`, `Kasus_*_Akumulatif`).
    pub fn indonesia() -> Self {
        Self {
            date: "Tanggal".to_string(),
            region: "Provinsi".to_string(),
            confirmed_cum: "Kasus_Terkonfirmasi_Akumulatif".to_string(),
            deceased_cum: "Kasus_Meninggal_Akumulatif".to_string(),
            active_cum: "Kasus_Aktif_Akumulatif".to_string(),
        }
    }

    /// Look up a preset by name ("default" or "indonesia").
    pub fn preset(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "default" => Ok(Self::default()),
            "indonesia" => Ok(Self::indonesia()),
            other => Err(EpiError::Config(format!("unknown column preset '{}'", other))),
        }
    }

    /// Find every required column in the header row.
    ///
    /// All missing columns are reported together.
    pub fn resolve(&self, headers: &StringRecord) -> Result<ColumnIndexes> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let wanted = [
            &self.date,
            &self.region,
            &self.confirmed_cum,
            &self.deceased_cum,
            &self.active_cum,
        ];
        let missing: Vec<&str> = wanted
            .iter()
            .filter(|name| find(name).is_none())
            .map(|name| name.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(EpiError::Schema(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }
        let at = |name: &str| find(name).unwrap_or_default();
        Ok(ColumnIndexes {
            date: at(&self.date),
            region: at(&self.region),
            confirmed_cum: at(&self.confirmed_cum),
            deceased_cum: at(&self.deceased_cum),
            active_cum: at(&self.active_cum),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_out_of_order_headers() {
        let headers = StringRecord::from(vec![
            "region",
            "recovered_cum",
            "active_cum",
            "date",
            "deceased_cum",
            "confirmed_cum",
        ]);
        let idx = ColumnMap::default().resolve(&headers).unwrap();
        assert_eq!(idx.region, 0);
        assert_eq!(idx.active_cum, 2);
        assert_eq!(idx.date, 3);
        assert_eq!(idx.deceased_cum, 4);
        assert_eq!(idx.confirmed_cum, 5);
    }

    #[test]
    fn reports_all_missing_columns() {
        let headers = StringRecord::from(vec!["date", "region", "confirmed_cum"]);
        match ColumnMap::default().resolve(&headers) {
            Err(EpiError::Schema(msg)) => {
                assert!(msg.contains("deceased_cum"));
                assert!(msg.contains("active_cum"));
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn presets_by_name() {
        assert_eq!(ColumnMap::preset("Indonesia").unwrap().region, "Provinsi");
        assert_eq!(ColumnMap::preset("default").unwrap(), ColumnMap::default());
        assert!(matches!(ColumnMap::preset("xx"), Err(EpiError::Config(_))));
    }
}
