//! `crib snapshot`: refresh every widget once and print the outcome.

use std::path::Path;
use std::sync::Arc;

use clap::Args;
use crib_common::config;
use crib_core::surface::{RenderSurface, SceneStore};
use crib_runtime::dashboard::{build_widgets, refresh_once};

use crate::output;

/// Arguments for the `snapshot` command.
#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// Serve synthetic data instead of querying the metrics service.
    #[arg(long)]
    pub demo: bool,

    /// Print the results as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Executes the `snapshot` command.
///
/// Individual widget failures are reported in the table, not as errors.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub async fn execute(config_path: &Path, args: SnapshotArgs) -> anyhow::Result<()> {
    let config = super::load_config(config_path, args.demo)?;
    config::validate(&config)?;

    let store = Arc::new(SceneStore::new());
    let surface: Arc<dyn RenderSurface> = store.clone();
    let source = super::data_source(&config, args.demo)?;
    let widgets = build_widgets(&config, &source, &surface)?;

    for (name, outcome) in refresh_once(&widgets).await {
        if let Err(e) = outcome {
            tracing::warn!(widget = %name, error = %e, "refresh failed");
        }
    }

    let rows = output::snapshot_rows(&config, &store);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", output::snapshot_table(&rows));
    }
    Ok(())
}
