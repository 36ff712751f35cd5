//! Synthetic data source for running a dashboard without a metrics service.
//!
//! Generates one point per second over the configured window for a handful
//! of entities, shaped by a deterministic wave seeded from the endpoint, and
//! aggregates them the same way the metrics service does.

use async_trait::async_trait;
use chrono::Utc;
use crib_common::error::Result;
use crib_common::types::{Sample, TimeSeries};
use crib_core::aggregate::{self, MetricPoint};

use super::DataSource;

/// Entities simulated per endpoint.
const DEMO_ENTITIES: u32 = 4;

/// Scale applied to ratios when summing into a series.
const SERIES_SCALE: f64 = 100.0;

/// Data source producing plausible, slowly moving metrics.
#[derive(Debug, Clone, Copy)]
pub struct DemoSource {
    window_secs: u64,
}

impl DemoSource {
    /// Creates a source generating `window_secs` seconds of history.
    #[must_use]
    pub const fn new(window_secs: u64) -> Self {
        Self { window_secs }
    }

    /// Points for every simulated entity, ending at `now_secs`.
    #[must_use]
    pub fn entity_points(&self, endpoint: &str, now_secs: i64) -> Vec<Vec<MetricPoint>> {
        let seed = seed_of(endpoint);
        let window = i64::try_from(self.window_secs).unwrap_or(i64::MAX);
        let start = now_secs.saturating_sub(window);
        (0..DEMO_ENTITIES)
            .map(|entity| {
                (start..now_secs)
                    .map(|secs| MetricPoint::new(secs * 1000, ratio(seed, entity, secs)))
                    .collect()
            })
            .collect()
    }
}

#[async_trait]
impl DataSource for DemoSource {
    async fn fetch_samples(&self, endpoint: &str) -> Result<Vec<Sample>> {
        let points = self.entity_points(endpoint, Utc::now().timestamp());
        let heatmap = aggregate::percentage_heatmap(points.iter().map(Vec::as_slice));
        Ok(aggregate::to_samples(&heatmap))
    }

    async fn fetch_series(&self, endpoint: &str) -> Result<TimeSeries> {
        let points = self.entity_points(endpoint, Utc::now().timestamp());
        let mut series = aggregate::sum_aligned(points.iter().map(Vec::as_slice));
        for v in &mut series.values {
            *v *= SERIES_SCALE;
        }
        Ok(series)
    }
}

fn seed_of(endpoint: &str) -> u64 {
    endpoint
        .bytes()
        .fold(17_u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)))
}

/// Ratio in `[0, 1]`, skewed towards low values like real utilisation.
#[allow(clippy::cast_precision_loss)]
fn ratio(seed: u64, entity: u32, secs: i64) -> f64 {
    let phase = (seed % 997) as f64 / 97.0 + f64::from(entity) * 1.3;
    let t = secs as f64;
    let wave = 0.5 + 0.5 * (t / 9.0 + phase).sin() * (t / 31.0 + phase * 0.5).cos();
    (wave * wave).clamp(0.0, 1.0)
}
