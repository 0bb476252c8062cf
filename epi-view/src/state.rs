//! Selector values and per-view recompute state.

use epi_core::error::{EpiError, Result};
use epi_core::metric::CaseType;
use epi_store::RecordStore;
use serde::Serialize;
use std::fmt;

/// The two independent user selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    CaseType,
    Region,
}

/// Every output view of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewId {
    NationalTimeSeries,
    NationalDiff,
    NationalRanking,
    RegionTimeSeries,
    RegionDiff,
    RegionPercentage,
    RegionConfirmedCard,
    RegionDeceasedCard,
    RegionRecoveredCard,
    RegionActiveCard,
}

impl ViewId {
    pub const ALL: [ViewId; 10] = [
        ViewId::NationalTimeSeries,
        ViewId::NationalDiff,
        ViewId::NationalRanking,
        ViewId::RegionTimeSeries,
        ViewId::RegionDiff,
        ViewId::RegionPercentage,
        ViewId::RegionConfirmedCard,
        ViewId::RegionDeceasedCard,
        ViewId::RegionRecoveredCard,
        ViewId::RegionActiveCard,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewId::NationalTimeSeries => "national_time_series",
            ViewId::NationalDiff => "national_diff",
            ViewId::NationalRanking => "national_ranking",
            ViewId::RegionTimeSeries => "region_time_series",
            ViewId::RegionDiff => "region_diff",
            ViewId::RegionPercentage => "region_percentage",
            ViewId::RegionConfirmedCard => "region_confirmed_card",
            ViewId::RegionDeceasedCard => "region_deceased_card",
            ViewId::RegionRecoveredCard => "region_recovered_card",
            ViewId::RegionActiveCard => "region_active_card",
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recompute state of one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Idle,
    Recomputing,
}

/// Current selector values. The region is always one of the store's regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    pub case_type: CaseType,
    pub region: String,
}

impl SelectionState {
    /// `All` cases and the alphabetically first region.
    pub fn initial(store: &RecordStore) -> Result<Self> {
        let region = store.regions().first().cloned().ok_or(EpiError::EmptyStore)?;
        Ok(Self {
            case_type: CaseType::All,
            region,
        })
    }

    /// Copy of this selection with another case type.
    pub fn with_case_type(&self, case_type: CaseType) -> Self {
        Self {
            case_type,
            region: self.region.clone(),
        }
    }

    /// Copy of this selection with another region, checked against the store.
    pub fn with_region(&self, store: &RecordStore, region: &str) -> Result<Self> {
        if !store.contains_region(region) {
            return Err(EpiError::UnknownRegion(region.to_string()));
        }
        Ok(Self {
            case_type: self.case_type,
            region: region.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epi_core::columns::ColumnMap;

    const SAMPLE_CSV: &str = include_str!("../../fixtures/sample_cases.csv");

    fn sample_store() -> RecordStore {
        RecordStore::from_csv_str(SAMPLE_CSV, &ColumnMap::default(), "ALL").unwrap()
    }

    #[test]
    fn initial_selection_is_all_and_first_region() {
        let state = SelectionState::initial(&sample_store()).unwrap();
        assert_eq!(state.case_type, CaseType::All);
        assert_eq!(state.region, "Aceh");
    }

    #[test]
    fn initial_selection_on_empty_store_fails() {
        let store = RecordStore::load(Vec::new(), "ALL").unwrap();
        assert!(matches!(SelectionState::initial(&store), Err(EpiError::EmptyStore)));
    }

    #[test]
    fn with_region_validates_against_store() {
        let store = sample_store();
        let state = SelectionState::initial(&store).unwrap();
        assert_eq!(state.with_region(&store, "Bali").unwrap().region, "Bali");
        assert!(matches!(
            state.with_region(&store, "ALL"),
            Err(EpiError::UnknownRegion(_))
        ));
    }

    #[test]
    fn view_ids_are_unique_strings() {
        let mut names: Vec<&str> = ViewId::ALL.iter().map(|v| v.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ViewId::ALL.len());
    }
}
