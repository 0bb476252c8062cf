//! Command implementations for the case dashboard CLI.
//!
//! Every command loads the case CSV into an immutable store, builds the
//! engine configuration from an optional JSON file plus flag overrides, and
//! writes its result to stdout.

use anyhow::Context;
use clap::{Args, Subcommand};
use epi_core::columns::ColumnMap;
use epi_core::config::{CompatMode, EngineConfig};
use epi_store::RecordStore;
use std::path::PathBuf;
use std::sync::Arc;

pub mod regions;
pub mod session;
pub mod summary;
pub mod views;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Path to the daily per-region case CSV
    #[arg(short = 'd', long, global = true, default_value = "fixtures/sample_cases.csv")]
    pub data: PathBuf,

    /// Column name preset: "default" or "indonesia"
    #[arg(long, global = true)]
    pub columns: Option<String>,

    /// Region value marking nation-wide rows
    #[arg(long, global = true)]
    pub national_key: Option<String>,

    /// Name used for the nation in chart titles
    #[arg(long, global = true)]
    pub national_label: Option<String>,

    /// Number of regions in the ranking chart
    #[arg(long, global = true)]
    pub top_n: Option<usize>,

    /// Reproduce the recovered-diff and ranking quirks of the source dashboard
    #[arg(long, global = true)]
    pub reference_quirks: bool,

    /// Build national series from regional rows only
    #[arg(long, global = true)]
    pub regions_only: bool,

    /// JSON engine configuration; flags override its values
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl DataArgs {
    pub fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_json_file(path)
                .with_context(|| format!("failed to read config {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if let Some(preset) = &self.columns {
            config.columns = ColumnMap::preset(preset)?;
        }
        if let Some(key) = &self.national_key {
            config.national_key = key.clone();
        }
        if let Some(label) = &self.national_label {
            config.national_label = label.clone();
        }
        if let Some(n) = self.top_n {
            config.top_n = n;
        }
        if self.reference_quirks {
            config.compat = CompatMode::Reference;
        }
        if self.regions_only {
            config.include_national_rows = false;
        }
        config.validate()?;
        Ok(config)
    }

    /// Load the store described by these options.
    pub fn load(&self) -> anyhow::Result<(Arc<RecordStore>, EngineConfig)> {
        let config = self.engine_config()?;
        let store = RecordStore::from_csv_path(&self.data, &config.columns, &config.national_key)
            .with_context(|| format!("failed to load {}", self.data.display()))?;
        Ok((Arc::new(store), config))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the selectable regions
    Regions,

    /// Print the national summary cards and the covered date span
    Summary,

    /// Compute every view for one selection and print the payloads as JSON
    Views {
        /// Case type: all, confirmed, deceased or recovered
        #[arg(short = 'c', long, default_value = "all")]
        case_type: String,

        /// Region to show; defaults to the first region
        #[arg(short = 'r', long)]
        region: Option<String>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Read selection events from stdin and print emitted payloads as JSON lines
    Session,
}

pub fn run(data: &DataArgs, command: Command) -> anyhow::Result<()> {
    let (store, config) = data.load()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match command {
        Command::Regions => regions::run_regions(&store, &mut out),
        Command::Summary => summary::run_summary(&store, &config, &mut out),
        Command::Views {
            case_type,
            region,
            pretty,
        } => views::run_views(store, config, &case_type, region.as_deref(), pretty, &mut out),
        Command::Session => {
            let stdin = std::io::stdin();
            let stderr = std::io::stderr();
            session::run_session(store, config, stdin.lock(), &mut out, &mut stderr.lock())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = DataArgs {
            columns: Some("indonesia".to_string()),
            national_key: Some("Indonesia".to_string()),
            top_n: Some(5),
            reference_quirks: true,
            regions_only: true,
            ..DataArgs::default()
        };
        let config = args.engine_config().unwrap();
        assert_eq!(config.columns.region, "Provinsi");
        assert_eq!(config.national_key, "Indonesia");
        assert_eq!(config.top_n, 5);
        assert_eq!(config.compat, CompatMode::Reference);
        assert!(!config.include_national_rows);
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let args = DataArgs {
            top_n: Some(0),
            ..DataArgs::default()
        };
        assert!(args.engine_config().is_err());
    }

    #[test]
    fn unknown_column_preset_is_rejected() {
        let args = DataArgs {
            columns: Some("klingon".to_string()),
            ..DataArgs::default()
        };
        assert!(args.engine_config().is_err());
    }
}
