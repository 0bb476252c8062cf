//! Selection-driven view layer for the case dashboard.
//!
//! This crate provides:
//! - `state`: the two selectors and per-view recompute state
//! - `payload`: serializable chart/card payloads handed to the renderer
//! - `views`: one builder per view, sharing a single metric-driven series builder
//! - `dispatcher`: the registry that recomputes only the views a selection change affects

pub mod dispatcher;
pub mod payload;
pub mod state;
pub mod views;
