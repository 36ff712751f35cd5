//! # crib-tui
//!
//! Terminal front end for crib dashboards.
//!
//! Built with `ratatui` and `crossterm`, providing:
//! - A scrolling overview of every heatmap and sparkline with its labels.
//! - A detail view of the selected widget.
//! - Rasterization of widget scenes into half-block terminal cells.
//! - Panel width reporting, so heatmaps re-lay themselves out on resize.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod app;
pub mod error;
pub mod event;
pub mod runner;
pub mod ui;

pub use error::TuiError;
pub use runner::run;
