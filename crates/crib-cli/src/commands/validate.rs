//! `crib validate`: check a configuration without contacting the backend.

use std::path::Path;

use clap::Args;
use crib_common::config;

use crate::output;

/// Arguments for the `validate` command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also print each widget's expanded endpoint.
    #[arg(long)]
    pub endpoints: bool,
}

/// Executes the `validate` command.
///
/// Loads the configuration, runs every semantic check, and prints the
/// widget table.
///
/// # Errors
///
/// Returns an error if loading or validation fails.
pub fn execute(config_path: &Path, args: &ValidateArgs) -> anyhow::Result<()> {
    let config = super::load_config(config_path, false)?;
    config::validate(&config)?;
    let rollup = config.rollup_secs()?;

    println!("Dashboard: {}", config_path.display());
    println!("  base_url: {}", config.base_url);
    println!("  window: {}s (rollup {rollup}s)", config.window_secs);
    println!();
    print!("{}", output::widget_table(&config, args.endpoints.then_some(rollup)));
    println!();
    println!("  {} widget(s) OK.", config.widgets.len());
    Ok(())
}
