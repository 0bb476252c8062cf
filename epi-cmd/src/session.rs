//! `session`: drive the dispatcher from selection events on stdin.
//!
//! Input is one event per line:
//!
//! ```text
//! case confirmed
//! region Jawa Barat
//! ```
//!
//! Blank lines and lines starting with `#` are ignored; `quit` ends the
//! session. Every emitted payload is written as one JSON line
//! `{"view": ..., "payload": ...}`. Bad lines are reported on the error
//! stream and the session carries on with its previous state.

use anyhow::bail;
use epi_core::config::EngineConfig;
use epi_core::metric::CaseType;
use epi_store::RecordStore;
use epi_view::dispatcher::{SelectionEvent, ViewDispatcher};
use epi_view::payload::Payload;
use epi_view::state::ViewId;
use serde_json::json;
use std::io::{BufRead, Write};
use std::sync::Arc;

/// One parsed input line.
#[derive(Debug, PartialEq)]
pub enum SessionLine {
    Event(SelectionEvent),
    Skip,
    Quit,
}

pub fn parse_line(line: &str) -> anyhow::Result<SessionLine> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(SessionLine::Skip);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    match verb {
        "quit" | "exit" => Ok(SessionLine::Quit),
        "case" => {
            let case_type: CaseType = rest.parse()?;
            Ok(SessionLine::Event(SelectionEvent::CaseType(case_type)))
        }
        "region" if !rest.is_empty() => {
            Ok(SessionLine::Event(SelectionEvent::Region(rest.to_string())))
        }
        "region" => bail!("region needs a name"),
        other => bail!("unknown command '{}'", other),
    }
}

fn write_payloads<W: Write>(out: &mut W, emitted: &[(ViewId, Payload)]) -> anyhow::Result<()> {
    for (view, payload) in emitted {
        serde_json::to_writer(&mut *out, &json!({ "view": view, "payload": payload }))?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

pub fn run_session<R: BufRead, W: Write, E: Write>(
    store: Arc<RecordStore>,
    config: EngineConfig,
    input: R,
    out: &mut W,
    err: &mut E,
) -> anyhow::Result<()> {
    let mut sink: Vec<(ViewId, Payload)> = Vec::new();
    let mut dispatcher = ViewDispatcher::new(store, config, &mut sink)?;
    write_payloads(out, &sink)?;

    let mut handled = 0usize;
    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let event = match parse_line(&line) {
            Ok(SessionLine::Event(event)) => event,
            Ok(SessionLine::Skip) => continue,
            Ok(SessionLine::Quit) => break,
            Err(e) => {
                writeln!(err, "line {}: {}", idx + 1, e)?;
                continue;
            }
        };
        sink.clear();
        match dispatcher.apply(event, &mut sink) {
            Ok(_) => {
                handled += 1;
                write_payloads(out, &sink)?;
            }
            Err(e) => writeln!(err, "line {}: {}", idx + 1, e)?,
        }
    }
    log::info!("[EPI] session: handled {} selection events", handled);
    Ok(())
}
