//! Layout dimensions, palette, and cadence defaults.

use crate::types::{Margin, Rgb};

/// Application name used in CLI output and log lines.
pub const APP_NAME: &str = "crib";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "crib";

/// Configuration file looked up when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "crib.yaml";

/// Default metrics service address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/";

/// Default refresh interval shared by every widget.
pub const DEFAULT_INTERVAL_MS: u64 = 250;

/// Default metric window queried from the backend, in seconds.
pub const DEFAULT_WINDOW_SECS: u64 = 60;

/// Heatmap margins around the drawable grid.
pub const HEATMAP_MARGIN: Margin = Margin {
    top: 5.0,
    right: 30.0,
    bottom: 55.0,
    left: 35.0,
};

/// Total heatmap height including margins.
pub const HEATMAP_HEIGHT: f64 = 150.0;

/// Inner and outer padding of the heatmap band scales.
pub const BAND_PADDING: f64 = 0.01;

/// Label every n-th group on the heatmap x axis.
pub const X_TICK_EVERY: usize = 2;

/// Label every n-th variable on the heatmap y axis.
pub const Y_TICK_EVERY: usize = 5;

/// Rotation of the heatmap x axis labels, in degrees.
pub const X_TICK_ROTATION: f64 = -65.0;

/// Heatmap width assumed before the surface reports one.
pub const FALLBACK_WIDTH: f64 = 600.0;

/// Sparkline drawing box width.
pub const SPARK_WIDTH: f64 = 180.0;

/// Sparkline drawing box height.
pub const SPARK_HEIGHT: f64 = 20.0;

/// Percentile reported by the sparkline summary.
pub const SPARK_PERCENTILE: f64 = 0.99;

/// Color of a heatmap cell at zero.
pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

/// Color of a heatmap cell at one unit of signal.
pub const NEAR_WHITE: Rgb = Rgb::new(0xee, 0xee, 0xee);

/// Color of a heatmap cell at the dataset total.
pub const DARK_RED: Rgb = Rgb::new(0x99, 0x00, 0x00);

/// Sparkline bar fill.
pub const SPARK_FILL: Rgb = Rgb::new(0xcc, 0xcc, 0xcc);

/// Number of percentage buckets in an aggregated heatmap (0%..=100% by 5%).
pub const PERCENT_BUCKETS: usize = 21;

/// Label suffix of the heatmap count display.
pub const COUNT_LABEL: &str = "count";

/// Label suffix of the sparkline 99th percentile display.
pub const P99_LABEL: &str = "p99";

/// Label suffix of the sparkline last-value display.
pub const LAST_LABEL: &str = "last";

/// Label suffix of the sparkline maximum display.
pub const MAX_LABEL: &str = "max";
