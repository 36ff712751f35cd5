//! `crib run`: keep the dashboard live until interrupted.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use crib_common::config::DashboardConfig;
use crib_core::surface::SceneStore;
use crib_runtime::dashboard::{Dashboard, fastest_interval};
use crib_tui::app::App;

use crate::output;

/// How often headless mode prints the widget table.
const REPORT_EVERY: Duration = Duration::from_secs(5);

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Metrics service address, overriding the configuration.
    #[arg(long, env = "CRIB_BASE_URL")]
    pub base_url: Option<String>,

    /// Default refresh interval in milliseconds, overriding the configuration.
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Serve synthetic data instead of querying the metrics service.
    #[arg(long)]
    pub demo: bool,

    /// Print widget summaries periodically instead of drawing the terminal UI.
    #[arg(long)]
    pub headless: bool,

    /// Append logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl RunArgs {
    fn apply(&self, config: &mut DashboardConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(interval_ms) = self.interval_ms {
            config.interval_ms = interval_ms;
        }
    }
}

/// Executes the `run` command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the terminal fails.
pub async fn execute(config_path: &Path, args: RunArgs) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path, args.demo)?;
    args.apply(&mut config);

    let store = Arc::new(SceneStore::new());
    let source = super::data_source(&config, args.demo)?;
    let dashboard = Dashboard::start(&config, source, store.clone())?;

    let outcome = if args.headless {
        run_headless(&config, &store).await
    } else {
        crib_tui::run(
            App::from_config(&config),
            Arc::clone(&store),
            dashboard.resize_signal(),
            fastest_interval(&config),
        )
        .await
        .map_err(anyhow::Error::from)
    };

    tracing::info!(invocations = dashboard.invocations(), "shutting down");
    dashboard.shutdown().await;
    outcome
}

async fn run_headless(config: &DashboardConfig, store: &SceneStore) -> anyhow::Result<()> {
    eprintln!("  crib v{} headless, {} widget(s). Press Ctrl+C to stop.", env!("CARGO_PKG_VERSION"), config.widgets.len());
    let mut report = tokio::time::interval_at(tokio::time::Instant::now() + REPORT_EVERY, REPORT_EVERY);
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                eprintln!();
                return Ok(());
            }
            _ = report.tick() => {
                println!("{}", output::snapshot_table(&output::snapshot_rows(config, store)));
            }
        }
    }
}
