//! Band scale over an ordered set of category labels.

use std::collections::HashMap;

/// Maps each label of a finite ordered domain to an equal-size band of a
/// continuous range, with padding between and around bands.
///
/// A reversed range (`start > stop`) lays the first label out at the
/// `start` end, which is how the heatmap puts its first variable at the
/// bottom.
#[derive(Debug, Clone)]
pub struct BandScale {
    domain: Vec<String>,
    index: HashMap<String, usize>,
    positions: Vec<f64>,
    bandwidth: f64,
    step: f64,
}

impl BandScale {
    /// Builds a band scale with the same inner and outer padding,
    /// centered in the range.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(domain: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let n = domain.len() as f64;
        let (r0, r1) = range;
        let reverse = r1 < r0;
        let (start, stop) = if reverse { (r1, r0) } else { (r0, r1) };

        let step = (stop - start) / f64::max(1.0, padding.mul_add(2.0, n - padding));
        let start = (stop - start - step * (n - padding)).mul_add(0.5, start);
        let bandwidth = step * (1.0 - padding);

        let mut positions: Vec<f64> = (0..domain.len())
            .map(|i| step.mul_add(i as f64, start))
            .collect();
        if reverse {
            positions.reverse();
        }

        let index = domain
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i))
            .collect();

        Self {
            domain,
            index,
            positions,
            bandwidth,
            step,
        }
    }

    /// Start coordinate of the band for `label`, if the label is in the domain.
    #[must_use]
    pub fn position(&self, label: &str) -> Option<f64> {
        self.index.get(label).map(|&i| self.positions[i])
    }

    /// Center coordinate of the band for `label`.
    #[must_use]
    pub fn center(&self, label: &str) -> Option<f64> {
        self.position(label).map(|p| p + self.bandwidth / 2.0)
    }

    /// Width of every band.
    #[must_use]
    pub const fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Distance between the starts of adjacent bands.
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// Labels in domain order.
    #[must_use]
    pub fn domain(&self) -> &[String] {
        &self.domain
    }
}
