//! `views`: compute every view for one selection and print them as JSON.

use epi_core::config::EngineConfig;
use epi_core::metric::CaseType;
use epi_store::RecordStore;
use epi_view::dispatcher::ViewDispatcher;
use epi_view::payload::Payload;
use epi_view::state::ViewId;
use epi_view::views::{case_type_options, national_cards, region_options, ViewContext};
use serde_json::{json, Map, Value};
use std::io::Write;
use std::sync::Arc;

pub fn run_views<W: Write>(
    store: Arc<RecordStore>,
    config: EngineConfig,
    case_type: &str,
    region: Option<&str>,
    pretty: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let case_type: CaseType = case_type.parse()?;
    let mut sink: Vec<(ViewId, Payload)> = Vec::new();
    let mut dispatcher = ViewDispatcher::new(store, config, &mut sink)?;
    dispatcher.select_case_type(case_type, &mut sink)?;
    if let Some(region) = region {
        dispatcher.select_region(region, &mut sink)?;
    }

    let document = dashboard_document(&dispatcher)?;
    if pretty {
        serde_json::to_writer_pretty(&mut *out, &document)?;
    } else {
        serde_json::to_writer(&mut *out, &document)?;
    }
    writeln!(out)?;
    Ok(())
}

/// The whole dashboard for the dispatcher's current selection: selector
/// options, national cards and the latest payload of every view.
pub fn dashboard_document(dispatcher: &ViewDispatcher) -> anyhow::Result<Value> {
    let ctx = ViewContext::new(dispatcher.store(), dispatcher.config());
    let mut views = Map::new();
    for (view, payload) in dispatcher.payloads() {
        views.insert(view.as_str().to_string(), serde_json::to_value(payload)?);
    }
    Ok(json!({
        "selection": dispatcher.selection(),
        "case_types": case_type_options(),
        "regions": region_options(dispatcher.store()),
        "cards": national_cards(&ctx)?,
        "views": views,
    }))
}
