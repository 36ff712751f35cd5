//! # crib-runtime
//!
//! Keeps dashboard widgets live.
//!
//! Handles:
//! - **Scheduler**: runs every registered refresh task once at startup, on a
//!   fixed interval, and on every viewport resize, isolating failures per task.
//! - **Widgets**: one object per heatmap or sparkline, owning its render
//!   target and discarding out-of-order fetch results.
//! - **Sources**: HTTP access to the metrics service and a synthetic demo source.
//! - **Dashboard**: wires a configuration's widgets to a source, a surface,
//!   and the scheduler.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod dashboard;
pub mod scheduler;
pub mod source;
pub mod widget;
