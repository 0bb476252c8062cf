//! Store construction from raw rows or CSV.
//!
//! # CSV Format
//!
//! One header row naming at least the five columns of the active
//! [`ColumnMap`]; other columns (including any upstream recovered count)
//! are ignored.
//!
//! ```text
//! date,region,confirmed_cum,deceased_cum,active_cum
//! 2021-01-01,A,10,1,5
//! ```
//!
//! Loading is all-or-nothing: the first bad row aborts with
//! [`EpiError::Schema`] and no store is returned.

use crate::RecordStore;
use epi_core::columns::ColumnMap;
use epi_core::error::{EpiError, Result};
use epi_core::record::{RawRow, Record};
use std::io::Read;
use std::path::Path;

impl RecordStore {
    /// Build a store from already-split rows.
    ///
    /// Recovered counts are derived per row; rows whose derived recovered
    /// count is negative are kept and counted in the log.
    pub fn load(rows: Vec<RawRow>, national_key: &str) -> Result<RecordStore> {
        let mut records: Vec<Record> = Vec::with_capacity(rows.len());
        let mut inconsistent = 0u32;
        for (idx, row) in rows.iter().enumerate() {
            let record = row.parse(idx + 1)?;
            if record.recovered_cum < 0 {
                inconsistent += 1;
            }
            records.push(record);
        }
        if inconsistent > 0 {
            log::warn!(
                "[EPI] loader: {} rows have deceased + active above confirmed",
                inconsistent
            );
        }
        let store = RecordStore::from_records(records, national_key);
        log::info!(
            "[EPI] loader: Loaded {} records, {} regions, {} dates",
            store.len(),
            store.regions().len(),
            store.all_dates().len()
        );
        Ok(store)
    }

    /// Build a store from CSV with a header row.
    pub fn from_csv<R: Read>(
        reader: R,
        columns: &ColumnMap,
        national_key: &str,
    ) -> Result<RecordStore> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let idx = columns.resolve(rdr.headers()?)?;

        let mut rows = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let r = result?;
            let field = |i: usize, name: &str| -> Result<String> {
                r.get(i).map(|s| s.trim().to_string()).ok_or_else(|| {
                    EpiError::Schema(format!("row {}: missing value for '{}'", line + 1, name))
                })
            };
            rows.push(RawRow {
                date: field(idx.date, columns.date.as_str())?,
                region: field(idx.region, columns.region.as_str())?,
                confirmed_cum: field(idx.confirmed_cum, columns.confirmed_cum.as_str())?,
                deceased_cum: field(idx.deceased_cum, columns.deceased_cum.as_str())?,
                active_cum: field(idx.active_cum, columns.active_cum.as_str())?,
            });
        }
        RecordStore::load(rows, national_key)
    }

    pub fn from_csv_str(
        csv_data: &str,
        columns: &ColumnMap,
        national_key: &str,
    ) -> Result<RecordStore> {
        RecordStore::from_csv(csv_data.as_bytes(), columns, national_key)
    }

    pub fn from_csv_path(
        path: &Path,
        columns: &ColumnMap,
        national_key: &str,
    ) -> Result<RecordStore> {
        log::info!("[EPI] loader: reading {}", path.display());
        let file = std::fs::File::open(path)?;
        RecordStore::from_csv(file, columns, national_key)
    }
}

#[cfg(test)]
mod tests {
    use crate::{RecordStore, RegionScope};
    use epi_core::columns::ColumnMap;
    use epi_core::error::EpiError;
    use epi_core::record::RawRow;

    fn raw(date: &str, region: &str, c: &str, d: &str, a: &str) -> RawRow {
        RawRow {
            date: date.to_string(),
            region: region.to_string(),
            confirmed_cum: c.to_string(),
            deceased_cum: d.to_string(),
            active_cum: a.to_string(),
        }
    }

    #[test]
    fn load_derives_recovered() {
        let store = RecordStore::load(
            vec![
                raw("2021-01-01", "A", "10", "1", "5"),
                raw("2021-01-02", "A", "15", "2", "6"),
            ],
            "ALL",
        )
        .unwrap();
        let recovered: Vec<i64> = store
            .rows_for(&RegionScope::region("A"))
            .unwrap()
            .iter()
            .map(|r| r.recovered_cum)
            .collect();
        assert_eq!(recovered, vec![4, 7]);
    }

    #[test]
    fn load_sorts_rows_by_date() {
        let store = RecordStore::load(
            vec![
                raw("2021-01-03", "A", "3", "0", "0"),
                raw("2021-01-01", "A", "1", "0", "0"),
                raw("2021-01-02", "A", "2", "0", "0"),
            ],
            "ALL",
        )
        .unwrap();
        let confirmed: Vec<i64> = store.records().iter().map(|r| r.confirmed_cum).collect();
        assert_eq!(confirmed, vec![1, 2, 3]);
    }

    #[test]
    fn load_aborts_on_bad_date() {
        let result = RecordStore::load(
            vec![
                raw("2021-01-01", "A", "10", "1", "5"),
                raw("yesterday", "A", "15", "2", "6"),
            ],
            "ALL",
        );
        assert!(matches!(result, Err(EpiError::Schema(msg)) if msg.contains("row 2")));
    }

    #[test]
    fn load_empty_rows_gives_empty_store() {
        let store = RecordStore::load(Vec::new(), "ALL").unwrap();
        assert!(store.is_empty());
        assert!(store.regions().is_empty());
        assert!(store.max_date().is_none());
    }

    #[test]
    fn csv_ignores_upstream_recovered_column() {
        let csv = "\
date,region,confirmed_cum,recovered_cum,deceased_cum,active_cum
2021-01-01,A,10,999,1,5
";
        let store = RecordStore::from_csv_str(csv, &ColumnMap::default(), "ALL").unwrap();
        assert_eq!(store.records()[0].recovered_cum, 4);
    }

    #[test]
    fn csv_missing_column_is_schema_error() {
        let csv = "\
date,region,confirmed_cum,deceased_cum
2021-01-01,A,10,1
";
        let result = RecordStore::from_csv_str(csv, &ColumnMap::default(), "ALL");
        assert!(matches!(result, Err(EpiError::Schema(msg)) if msg.contains("active_cum")));
    }

    #[test]
    fn csv_short_row_is_schema_error() {
        let csv = "\
date,region,confirmed_cum,deceased_cum,active_cum
2021-01-01,A,10
";
        let result = RecordStore::from_csv_str(csv, &ColumnMap::default(), "ALL");
        assert!(matches!(result, Err(EpiError::Schema(_))));
    }

    #[test]
    fn csv_with_indonesian_headers() {
        let csv = "\
Tanggal,Provinsi,Kasus_Terkonfirmasi_Akumulatif,Kasus_Sembuh_Akumulatif,Kasus_Meninggal_Akumulatif,Kasus_Aktif_Akumulatif
2020-03-01T00:00:00,DKI Jakarta,10,0,1,5
2020-03-01T00:00:00,Indonesia,10,0,1,5
";
        let store =
            RecordStore::from_csv_str(csv, &ColumnMap::indonesia(), "Indonesia").unwrap();
        assert_eq!(store.regions(), &["DKI Jakarta"]);
        assert_eq!(store.records()[0].recovered_cum, 4);
        assert_eq!(store.national_rows().len(), 1);
    }
}
