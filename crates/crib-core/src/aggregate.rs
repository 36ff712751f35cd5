//! Aggregation of raw metric points into widget datasets.
//!
//! Raw points are `(timestamp, value)` pairs from one or more entities.
//! They are aligned on whole seconds (UTC `HH:MM:SS` labels), then either
//! bucketed into a percentage heatmap or summed into a single series.

use std::collections::BTreeMap;

use crib_common::constants::PERCENT_BUCKETS;
use crib_common::types::{Sample, TimeSeries};

/// One raw metric reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricPoint {
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    /// Reading; a ratio in `[0, 1]` for percentage metrics.
    pub value: f64,
}

impl MetricPoint {
    /// Creates a point.
    #[must_use]
    pub const fn new(timestamp_ms: i64, value: f64) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }
}

/// Per-second histogram of readings over percentage buckets, keyed by
/// time label.
pub type PercentageHeatmap = BTreeMap<String, [u32; PERCENT_BUCKETS]>;

/// Formats a timestamp as a UTC `HH:MM:SS` label.
#[must_use]
pub fn time_label(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp_ms.div_euclid(1000), 0)
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Bucket index of a ratio: `floor(v * 21)`, with any positive reading
/// lifted out of the zero bucket and everything at or above 100% in the
/// last bucket.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
#[must_use]
pub fn bucket_of(value: f64) -> usize {
    let scaled = (value * PERCENT_BUCKETS as f64).floor().max(0.0) as usize;
    if scaled == 0 && value > 0.0 {
        1
    } else {
        scaled.min(PERCENT_BUCKETS - 1)
    }
}

/// Builds a percentage heatmap from the points of several entities.
pub fn percentage_heatmap<'a>(series: impl IntoIterator<Item = &'a [MetricPoint]>) -> PercentageHeatmap {
    let mut heatmap = PercentageHeatmap::new();
    for points in series {
        for point in points {
            let buckets = heatmap
                .entry(time_label(point.timestamp_ms))
                .or_insert([0; PERCENT_BUCKETS]);
            buckets[bucket_of(point.value)] += 1;
        }
    }
    heatmap
}

/// Label of a bucket: `0%`, `5%`, ... `100%`.
#[must_use]
pub fn bucket_label(bucket: usize) -> String {
    format!("{}%", bucket * 100 / (PERCENT_BUCKETS - 1))
}

/// Flattens a heatmap into samples, time labels ascending and buckets
/// ascending within each label.
#[must_use]
pub fn to_samples(heatmap: &PercentageHeatmap) -> Vec<Sample> {
    heatmap
        .iter()
        .flat_map(|(label, buckets)| {
            buckets
                .iter()
                .enumerate()
                .map(move |(i, &count)| Sample::new(label.clone(), bucket_label(i), f64::from(count)))
        })
        .collect()
}

/// Sums the points of several entities per second, ordered by time label.
pub fn sum_aligned<'a>(series: impl IntoIterator<Item = &'a [MetricPoint]>) -> TimeSeries {
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for points in series {
        for point in points {
            *sums.entry(time_label(point.timestamp_ms)).or_insert(0.0) += point.value;
        }
    }
    TimeSeries::new(sums.into_values().collect())
}
