pub mod columns;
pub mod config;
pub mod error;
pub mod metric;
pub mod record;
pub mod series;

pub use error::{EpiError, Result};
