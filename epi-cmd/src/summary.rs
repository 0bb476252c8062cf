//! `summary`: national summary cards and the covered date span.

use epi_core::config::EngineConfig;
use epi_core::error::EpiError;
use epi_store::RecordStore;
use epi_utils::dates::format_date;
use epi_view::views::{national_cards, ViewContext};
use std::io::Write;

pub fn run_summary<W: Write>(
    store: &RecordStore,
    config: &EngineConfig,
    out: &mut W,
) -> anyhow::Result<()> {
    let (first, last) = match (store.min_date(), store.max_date()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(EpiError::EmptyStore.into()),
    };
    let ctx = ViewContext::new(store, config);
    let cards = national_cards(&ctx)?;

    writeln!(
        out,
        "{}: {} to {} ({} days, {} regions)",
        config.national_label,
        format_date(&first),
        format_date(&last),
        store.all_dates().len(),
        store.regions().len()
    )?;
    for card in &cards {
        writeln!(out, "{:<10} {:>12}", card.label, card.value)?;
    }
    Ok(())
}
