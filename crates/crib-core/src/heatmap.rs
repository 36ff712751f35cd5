//! Categorical heatmap transform.
//!
//! Turns a flat list of `(group, variable, value)` samples into a grid of
//! colored cells: groups run along the x axis, variables up the y axis, and
//! the color of each cell encodes its value relative to the dataset total.

use std::collections::HashSet;

use crib_common::constants::{
    BAND_PADDING, HEATMAP_HEIGHT, HEATMAP_MARGIN, X_TICK_EVERY, X_TICK_ROTATION, Y_TICK_EVERY,
};
use crib_common::types::{Margin, Rgb, Sample};

use crate::scale::{BandScale, ColorScale};
use crate::scene::{Axis, AxisOrient, DrawCommand, RectCommand, Scene, Tick};

/// One drawn cell of the heatmap, in scene coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapCell {
    /// Group of the source sample.
    pub group: String,
    /// Variable of the source sample.
    pub variable: String,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Cell width.
    pub width: f64,
    /// Cell height.
    pub height: f64,
    /// Fill, `None` for samples whose value was not numeric.
    pub fill: Option<Rgb>,
}

/// A heatmap laid out for a given width, ready to become a [`Scene`].
#[derive(Debug, Clone)]
pub struct HeatmapGrid {
    /// Drawable width (inside the margins).
    pub width: f64,
    /// Drawable height (inside the margins).
    pub height: f64,
    /// Margins around the drawable area.
    pub margin: Margin,
    /// Unique groups in first-seen order.
    pub groups: Vec<String>,
    /// Unique variables in first-seen order.
    pub variables: Vec<String>,
    /// Value mapped to the darkest color; shown in the count label.
    pub total: i64,
    /// Color scale derived from `total`.
    pub color: ColorScale,
    /// One cell per input sample, in input order.
    pub cells: Vec<HeatmapCell>,
    /// Labelled ticks along the bottom axis.
    pub x_ticks: Vec<Tick>,
    /// Labelled ticks along the left axis.
    pub y_ticks: Vec<Tick>,
}

impl HeatmapGrid {
    /// Lays out `samples` for a container `available_width` wide.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn build(samples: &[Sample], available_width: f64) -> Self {
        let margin = HEATMAP_MARGIN;
        let width = (available_width - margin.left - margin.right).max(0.0);
        let height = HEATMAP_HEIGHT - margin.top - margin.bottom;

        let groups = unique_in_order(samples.iter().map(|s| s.group.as_str()));
        let variables = unique_in_order(samples.iter().map(|s| s.variable.as_str()));
        let total = positional_total(samples, variables.len());

        let x = BandScale::new(groups.clone(), (0.0, width), BAND_PADDING);
        let y = BandScale::new(variables.clone(), (height, 0.0), BAND_PADDING);
        let color = ColorScale::for_total(total as f64);

        let cells = samples
            .iter()
            .map(|sample| HeatmapCell {
                group: sample.group.clone(),
                variable: sample.variable.clone(),
                x: margin.left + x.position(&sample.group).unwrap_or_default(),
                y: margin.top + y.position(&sample.variable).unwrap_or_default(),
                width: x.bandwidth(),
                height: y.bandwidth(),
                fill: sample.value.map(|v| color.color(v)),
            })
            .collect();

        let x_ticks = every_nth(&x, X_TICK_EVERY, margin.left);
        let y_ticks = every_nth(&y, Y_TICK_EVERY, margin.top);

        tracing::trace!(
            samples = samples.len(),
            groups = groups.len(),
            variables = variables.len(),
            total,
            "heatmap laid out"
        );

        Self {
            width,
            height,
            margin,
            groups,
            variables,
            total,
            color,
            cells,
            x_ticks,
            y_ticks,
        }
    }

    /// Full scene: cells, then the bottom and left axes.
    #[must_use]
    pub fn scene(&self) -> Scene {
        let mut scene = Scene::new(
            self.width + self.margin.left + self.margin.right,
            self.height + self.margin.top + self.margin.bottom,
        );
        for cell in &self.cells {
            scene.push(DrawCommand::Rect(RectCommand {
                x: cell.x,
                y: cell.y,
                width: cell.width,
                height: cell.height,
                fill: cell.fill,
            }));
        }
        scene.push(DrawCommand::Axis(Axis {
            orient: AxisOrient::Bottom {
                y: self.margin.top + self.height,
            },
            ticks: self.x_ticks.clone(),
            rotation: X_TICK_ROTATION,
        }));
        scene.push(DrawCommand::Axis(Axis {
            orient: AxisOrient::Left { x: self.margin.left },
            ticks: self.y_ticks.clone(),
            rotation: 0.0,
        }));
        scene
    }
}

/// Unique values in first-seen order.
pub fn unique_in_order<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Sums the integer part of the first `count` sample values.
///
/// This is a positional slice of the input, not a per-column sum: with the
/// bucketed data the backend serves, the first rows are the first group's
/// buckets. Non-numeric values count as zero.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn positional_total(samples: &[Sample], count: usize) -> i64 {
    samples
        .iter()
        .take(count)
        .map(|s| s.value.map_or(0, |v| v.trunc() as i64))
        .fold(0, i64::saturating_add)
}

fn every_nth(scale: &BandScale, n: usize, offset: f64) -> Vec<Tick> {
    scale
        .domain()
        .iter()
        .step_by(n)
        .filter_map(|label| {
            scale.center(label).map(|center| Tick {
                label: label.clone(),
                position: offset + center,
            })
        })
        .collect()
}
