//! `regions`: list the selectable regions.

use epi_store::RecordStore;
use epi_view::views::region_options;
use std::io::Write;

/// Print one region per line, in dropdown order.
pub fn run_regions<W: Write>(store: &RecordStore, out: &mut W) -> anyhow::Result<()> {
    let options = region_options(store);
    for option in &options {
        writeln!(out, "{}", option.value)?;
    }
    log::info!("[EPI] regions: listed {} regions", options.len());
    Ok(())
}
