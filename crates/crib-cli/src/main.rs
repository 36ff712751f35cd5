//! # crib: live metrics dashboards
//!
//! Polls a metrics service and keeps heatmaps and sparklines live in the
//! terminal, or logs their summaries when running headless.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

mod commands;
mod logging;
mod output;

use clap::Parser;

use crate::commands::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format, &cli.log_target())?;
    commands::execute(cli).await
}
