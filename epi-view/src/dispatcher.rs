//! Selection-driven recomputation of dashboard views.
//!
//! The dispatcher owns a typed registry mapping each selector to the views
//! that depend on it. A case-type change rebuilds the three national charts;
//! a region change rebuilds the region charts and the four region cards.
//! Each event is handled to completion (payloads emitted) before the call
//! returns, so recomputations never overlap.

use crate::payload::Payload;
use crate::state::{SelectionState, Selector, ViewId, ViewState};
use crate::views::{self, ViewBuilder, ViewContext};
use epi_core::config::EngineConfig;
use epi_core::error::Result;
use epi_core::metric::CaseType;
use epi_store::RecordStore;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Receives every payload the dispatcher emits.
pub trait PayloadSink {
    fn emit(&mut self, view: ViewId, payload: &Payload);
}

/// Collects emitted payloads in order.
impl PayloadSink for Vec<(ViewId, Payload)> {
    fn emit(&mut self, view: ViewId, payload: &Payload) {
        self.push((view, payload.clone()));
    }
}

/// A user selection change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    CaseType(CaseType),
    Region(String),
}

impl SelectionEvent {
    pub fn selector(&self) -> Selector {
        match self {
            SelectionEvent::CaseType(_) => Selector::CaseType,
            SelectionEvent::Region(_) => Selector::Region,
        }
    }
}

#[derive(Clone, Copy)]
struct RegistryEntry {
    selector: Selector,
    view: ViewId,
    build: ViewBuilder,
}

const fn entry(selector: Selector, view: ViewId, build: ViewBuilder) -> RegistryEntry {
    RegistryEntry {
        selector,
        view,
        build,
    }
}

fn default_registry() -> Vec<RegistryEntry> {
    vec![
        entry(Selector::CaseType, ViewId::NationalTimeSeries, views::national_time_series),
        entry(Selector::CaseType, ViewId::NationalDiff, views::national_diff),
        entry(Selector::CaseType, ViewId::NationalRanking, views::national_ranking),
        entry(Selector::Region, ViewId::RegionTimeSeries, views::region_time_series),
        entry(Selector::Region, ViewId::RegionDiff, views::region_diff),
        entry(Selector::Region, ViewId::RegionPercentage, views::region_percentage),
        entry(Selector::Region, ViewId::RegionConfirmedCard, views::region_confirmed_card),
        entry(Selector::Region, ViewId::RegionDeceasedCard, views::region_deceased_card),
        entry(Selector::Region, ViewId::RegionRecoveredCard, views::region_recovered_card),
        entry(Selector::Region, ViewId::RegionActiveCard, views::region_active_card),
    ]
}

pub struct ViewDispatcher {
    store: Arc<RecordStore>,
    config: EngineConfig,
    selection: SelectionState,
    registry: Vec<RegistryEntry>,
    states: BTreeMap<ViewId, ViewState>,
    payloads: BTreeMap<ViewId, Payload>,
}

impl ViewDispatcher {
    /// Build the dispatcher and compute every view for the initial
    /// selection (`All`, first region).
    pub fn new(
        store: Arc<RecordStore>,
        config: EngineConfig,
        sink: &mut dyn PayloadSink,
    ) -> Result<Self> {
        let selection = SelectionState::initial(&store)?;
        let registry = default_registry();
        let states = registry.iter().map(|e| (e.view, ViewState::Idle)).collect();
        let mut dispatcher = Self {
            store,
            config,
            selection,
            registry,
            states,
            payloads: BTreeMap::new(),
        };
        let selection = dispatcher.selection.clone();
        dispatcher.recompute(selection, None, sink)?;
        log::info!(
            "[EPI] dispatcher: initialised with case type '{}' and region '{}'",
            dispatcher.selection.case_type.value(),
            dispatcher.selection.region
        );
        Ok(dispatcher)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Latest emitted payload of a view.
    pub fn payload(&self, view: ViewId) -> Option<&Payload> {
        self.payloads.get(&view)
    }

    pub fn payloads(&self) -> &BTreeMap<ViewId, Payload> {
        &self.payloads
    }

    pub fn view_state(&self, view: ViewId) -> ViewState {
        self.states.get(&view).copied().unwrap_or_default()
    }

    /// Views rebuilt when `selector` changes, in registry order.
    pub fn dependents(&self, selector: Selector) -> Vec<ViewId> {
        self.registry
            .iter()
            .filter(|e| e.selector == selector)
            .map(|e| e.view)
            .collect()
    }

    /// Apply a selection change and return the views that were rebuilt.
    ///
    /// Selecting the current value is a no-op. An unknown region fails with
    /// `UnknownRegion` and leaves the selection and all payloads untouched.
    pub fn apply(&mut self, event: SelectionEvent, sink: &mut dyn PayloadSink) -> Result<Vec<ViewId>> {
        let selector = event.selector();
        let next = match event {
            SelectionEvent::CaseType(case_type) => self.selection.with_case_type(case_type),
            SelectionEvent::Region(region) => {
                match self.selection.with_region(&self.store, &region) {
                    Ok(next) => next,
                    Err(e) => {
                        log::warn!("[EPI] dispatcher: {}; keeping previous views", e);
                        return Err(e);
                    }
                }
            }
        };
        if next == self.selection {
            log::debug!("[EPI] dispatcher: {:?} unchanged, nothing to do", selector);
            return Ok(Vec::new());
        }
        self.recompute(next, Some(selector), sink)
    }

    pub fn select_case_type(
        &mut self,
        case_type: CaseType,
        sink: &mut dyn PayloadSink,
    ) -> Result<Vec<ViewId>> {
        self.apply(SelectionEvent::CaseType(case_type), sink)
    }

    pub fn select_region(&mut self, region: &str, sink: &mut dyn PayloadSink) -> Result<Vec<ViewId>> {
        self.apply(SelectionEvent::Region(region.to_string()), sink)
    }

    /// Rebuild every view for the current selection.
    pub fn refresh_all(&mut self, sink: &mut dyn PayloadSink) -> Result<Vec<ViewId>> {
        let selection = self.selection.clone();
        self.recompute(selection, None, sink)
    }

    /// Build the affected views for `next`; commit and emit only if all succeed.
    fn recompute(
        &mut self,
        next: SelectionState,
        selector: Option<Selector>,
        sink: &mut dyn PayloadSink,
    ) -> Result<Vec<ViewId>> {
        let affected: Vec<RegistryEntry> = self
            .registry
            .iter()
            .filter(|e| selector.map_or(true, |s| e.selector == s))
            .copied()
            .collect();

        for e in &affected {
            self.states.insert(e.view, ViewState::Recomputing);
        }

        let ctx = ViewContext::new(&self.store, &self.config);
        let built: Result<Vec<(ViewId, Payload)>> = affected
            .iter()
            .map(|e| (e.build)(&ctx, &next).map(|p| (e.view, p)))
            .collect();
        let built = match built {
            Ok(built) => built,
            Err(e) => {
                for entry in &affected {
                    self.states.insert(entry.view, ViewState::Idle);
                }
                log::warn!("[EPI] dispatcher: recompute failed: {}", e);
                return Err(e);
            }
        };

        self.selection = next;
        let mut emitted = Vec::with_capacity(built.len());
        for (view, payload) in built {
            sink.emit(view, &payload);
            self.payloads.insert(view, payload);
            self.states.insert(view, ViewState::Idle);
            emitted.push(view);
        }
        log::debug!(
            "[EPI] dispatcher: emitted {} views for case type '{}', region '{}'",
            emitted.len(),
            self.selection.case_type.value(),
            self.selection.region
        );
        Ok(emitted)
    }
}
