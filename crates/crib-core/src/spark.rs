//! Sparkline transform: fixed-size bar geometry plus rounded summaries.

use crib_common::constants::{SPARK_FILL, SPARK_HEIGHT, SPARK_PERCENTILE, SPARK_WIDTH};
use crib_common::error::{CribError, Result};
use crib_common::types::{SeriesSummary, TargetId};

use crate::percentile::{max, quantile, round_half_up};
use crate::scale::LinearScale;
use crate::scene::{DrawCommand, RectCommand, Scene};

/// One bar of a sparkline, in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparkBar {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Bar width.
    pub width: f64,
    /// Bar height, measured up from the bottom of the box.
    pub height: f64,
}

/// A sparkline laid out in its fixed drawing box.
#[derive(Debug, Clone)]
pub struct SparkChart {
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
    /// Width of each bar; one unit per bar is left as gutter.
    pub bar_width: f64,
    /// One bar per value, oldest first.
    pub bars: Vec<SparkBar>,
    /// Rounded p99, last and max.
    pub summary: SeriesSummary,
}

impl SparkChart {
    /// Lays out `values` for the sparkline drawn into `target`.
    ///
    /// # Errors
    ///
    /// Returns [`CribError::MissingData`] if `values` is empty.
    #[allow(clippy::cast_precision_loss)]
    pub fn build(target: &TargetId, values: &[f64]) -> Result<Self> {
        let summary = summarize(target, values)?;
        let count = values.len() as f64;
        let width = SPARK_WIDTH;
        let height = SPARK_HEIGHT;
        let bar_width = (width - count) / count;

        let top = max(values).unwrap_or_default();
        let x = LinearScale::new((0.0, count), (0.0, width));
        let y = LinearScale::new((0.0, top), (height, 0.0));

        let bars = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let bar_top = if top > 0.0 { y.apply(v).clamp(0.0, height) } else { height };
                SparkBar {
                    x: x.apply(i as f64),
                    y: bar_top,
                    width: bar_width,
                    height: height - bar_top,
                }
            })
            .collect();

        Ok(Self {
            width,
            height,
            bar_width,
            bars,
            summary,
        })
    }

    /// Full scene: one bar per value in a uniform fill.
    #[must_use]
    pub fn scene(&self) -> Scene {
        let mut scene = Scene::new(self.width, self.height);
        for bar in &self.bars {
            scene.push(DrawCommand::Rect(RectCommand {
                x: bar.x,
                y: bar.y,
                width: bar.width,
                height: bar.height,
                fill: Some(SPARK_FILL),
            }));
        }
        scene
    }

    /// Scene shown when a series has no values: the empty box.
    #[must_use]
    pub const fn empty_scene() -> Scene {
        Scene::new(SPARK_WIDTH, SPARK_HEIGHT)
    }
}

/// Rounded p99, last and max of a series.
///
/// # Errors
///
/// Returns [`CribError::MissingData`] if `values` is empty.
pub fn summarize(target: &TargetId, values: &[f64]) -> Result<SeriesSummary> {
    let missing = || CribError::MissingData {
        target: target.to_string(),
    };
    let p99 = quantile(values, SPARK_PERCENTILE).ok_or_else(missing)?;
    let last = values.last().copied().ok_or_else(missing)?;
    let top = max(values).ok_or_else(missing)?;
    Ok(SeriesSummary {
        p99: round_half_up(p99),
        last: round_half_up(last),
        max: round_half_up(top),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> TargetId {
        TargetId::new("sparkFiller")
    }

    #[test]
    fn one_to_five_summary() {
        let chart = SparkChart::build(&target(), &[1.0, 2.0, 3.0, 4.0, 5.0]).expect("chart");
        assert_eq!(
            chart.summary,
            SeriesSummary {
                p99: 5,
                last: 5,
                max: 5
            }
        );
    }

    #[test]
    fn last_and_max_are_rounded_exactly() {
        let values = [3.4, 9.6, 2.5];
        let summary = summarize(&target(), &values).expect("summary");
        assert_eq!(summary.last, 3);
        assert_eq!(summary.max, 10);
    }

    #[test]
    fn p99_interpolates_sorted_values() {
        let values: Vec<f64> = (0..=100).rev().map(f64::from).collect();
        let summary = summarize(&target(), &values).expect("summary");
        assert_eq!(summary.p99, 99);
        assert_eq!(summary.last, 0);
        assert_eq!(summary.max, 100);
    }

    #[test]
    fn bar_width_reserves_one_unit_gutter_per_bar() {
        for count in [1_usize, 2, 7, 60, 179] {
            let values = vec![1.0; count];
            let chart = SparkChart::build(&target(), &values).expect("chart");
            let n = count as f64;
            assert!(
                (chart.bar_width * n + n - SPARK_WIDTH).abs() < 1e-9,
                "count {count}"
            );
        }
    }

    #[test]
    fn bars_are_spaced_evenly_from_zero() {
        let chart = SparkChart::build(&target(), &[1.0, 1.0, 1.0, 1.0]).expect("chart");
        let xs: Vec<f64> = chart.bars.iter().map(|b| b.x).collect();
        assert_eq!(xs, vec![0.0, 45.0, 90.0, 135.0]);
    }

    #[test]
    fn bars_are_anchored_to_the_bottom() {
        let chart = SparkChart::build(&target(), &[1.0, 2.0, 4.0]).expect("chart");
        for bar in &chart.bars {
            assert!((bar.y + bar.height - SPARK_HEIGHT).abs() < 1e-9);
        }
        assert!((chart.bars[0].height - 5.0).abs() < 1e-9);
        assert!((chart.bars[1].height - 10.0).abs() < 1e-9);
        assert!((chart.bars[2].height - 20.0).abs() < 1e-9);
    }

    #[test]
    fn single_value_renders_full_height_bar() {
        let chart = SparkChart::build(&target(), &[7.0]).expect("chart");
        assert_eq!(chart.bars.len(), 1);
        assert_eq!(chart.bars[0].height, SPARK_HEIGHT);
        assert_eq!(chart.bars[0].y, 0.0);
        assert_eq!(chart.bar_width, SPARK_WIDTH - 1.0);
    }

    #[test]
    fn all_zero_series_draws_flat_bars() {
        let chart = SparkChart::build(&target(), &[0.0, 0.0]).expect("chart");
        assert!(chart.bars.iter().all(|b| b.height == 0.0));
        assert_eq!(chart.summary.max, 0);
    }

    #[test]
    fn empty_series_is_missing_data() {
        let err = SparkChart::build(&target(), &[]).unwrap_err();
        assert!(matches!(err, CribError::MissingData { .. }));
        assert!(err.to_string().contains("sparkFiller"));
    }

    #[test]
    fn scene_has_one_filled_rect_per_value() {
        let chart = SparkChart::build(&target(), &[1.0, 5.0, 3.0]).expect("chart");
        let scene = chart.scene();
        assert_eq!(scene.rects().count(), 3);
        assert!(scene.rects().all(|r| r.fill == Some(SPARK_FILL)));
        assert_eq!((scene.width, scene.height), (SPARK_WIDTH, SPARK_HEIGHT));
    }
}
