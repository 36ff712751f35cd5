//! CLI command definitions and dispatch.

pub mod run;
pub mod snapshot;
pub mod validate;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use crib_common::config::DashboardConfig;
use crib_common::constants::{DEFAULT_CONFIG_FILE, DEFAULT_WINDOW_SECS};
use crib_runtime::source::{DataSource, DemoSource, HttpSource};

use crate::logging::{LogFormat, LogTarget};

/// crib: live heatmaps and sparklines over a metrics service.
#[derive(Parser, Debug)]
#[command(name = "crib", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Dashboard configuration (YAML, or JSON with a `.json` extension).
    #[arg(short, long, global = true, env = "CRIB_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Log line format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Where logs should go for the chosen command.
    pub fn log_target(&self) -> LogTarget {
        match &self.command {
            Command::Run(args) => match (&args.log_file, args.headless) {
                (Some(path), _) => LogTarget::File(path.clone()),
                (None, true) => LogTarget::Stderr,
                (None, false) => LogTarget::Discard,
            },
            Command::Validate(_) | Command::Snapshot(_) => LogTarget::Stderr,
        }
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the live dashboard.
    Run(run::RunArgs),
    /// Check a configuration file and list its widgets.
    Validate(validate::ValidateArgs),
    /// Refresh every widget once and print the results.
    Snapshot(snapshot::SnapshotArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Run(args) => run::execute(&cli.config, args).await,
        Command::Validate(args) => validate::execute(&cli.config, &args),
        Command::Snapshot(args) => snapshot::execute(&cli.config, args).await,
    }
}

/// Loads the configuration at `path`.
///
/// In demo mode a missing file falls back to the sample dashboard.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path, demo: bool) -> anyhow::Result<DashboardConfig> {
    if demo && !path.exists() {
        tracing::info!(path = %path.display(), "no configuration found, using the sample dashboard");
        return Ok(DashboardConfig::sample());
    }
    DashboardConfig::load(path).with_context(|| {
        format!(
            "failed to load configuration from {}\n\
             Copy crib.example.yaml to {DEFAULT_CONFIG_FILE}, pass --config, or run with --demo",
            path.display()
        )
    })
}

/// The data source widgets fetch from.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn data_source(config: &DashboardConfig, demo: bool) -> anyhow::Result<Arc<dyn DataSource>> {
    if demo {
        let window = if config.window_secs == 0 {
            DEFAULT_WINDOW_SECS
        } else {
            config.window_secs
        };
        return Ok(Arc::new(DemoSource::new(window)));
    }
    Ok(Arc::new(HttpSource::from_config(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments parse")
    }

    #[test]
    fn tui_run_discards_logs_unless_a_file_is_given() {
        assert_eq!(parse(&["crib", "run"]).log_target(), LogTarget::Discard);
        assert_eq!(
            parse(&["crib", "run", "--log-file", "crib.log"]).log_target(),
            LogTarget::File(PathBuf::from("crib.log"))
        );
        assert_eq!(parse(&["crib", "run", "--headless"]).log_target(), LogTarget::Stderr);
        assert_eq!(parse(&["crib", "validate"]).log_target(), LogTarget::Stderr);
    }

    #[test]
    fn config_flag_is_global() {
        let cli = parse(&["crib", "validate", "--config", "dash.json"]);
        assert_eq!(cli.config, PathBuf::from("dash.json"));
    }

    #[test]
    fn demo_without_file_uses_sample() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config(&dir.path().join("missing.yaml"), true).expect("sample");
        assert_eq!(config.widgets.len(), DashboardConfig::sample().widgets.len());
    }

    #[test]
    fn missing_file_without_demo_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_config(&dir.path().join("missing.yaml"), false).unwrap_err();
        assert!(format!("{err:#}").contains("--demo"));
    }
}
