//! # crib-core
//!
//! Turns fetched metric data into drawable scenes.
//!
//! Handles:
//! - **Heatmap**: categorical `(group, variable, value)` samples to a
//!   color-scaled grid of cells with axes.
//! - **Spark**: numeric series to fixed-size bar geometry plus p99, last,
//!   and max summaries.
//! - **Scales**: band, linear, and piecewise color scales.
//! - **Surface**: the draw contract widgets render through, and an
//!   in-memory store implementing it.
//! - **Aggregate**: percentage bucketing and time-aligned sums over raw
//!   metric points.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::float_cmp))]

pub mod aggregate;
pub mod heatmap;
pub mod percentile;
pub mod scale;
pub mod scene;
pub mod spark;
pub mod surface;
