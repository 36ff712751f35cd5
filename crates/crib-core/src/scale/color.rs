//! Piecewise-linear color scale for heatmap cells.

use crib_common::constants::{DARK_RED, NEAR_WHITE, WHITE};
use crib_common::types::Rgb;

/// Maps a numeric value onto a color by interpolating between anchors.
///
/// Values below the first anchor or above the last clamp to the end colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    anchors: Vec<(f64, Rgb)>,
}

impl ColorScale {
    /// Creates a scale from explicit `(value, color)` anchors.
    #[must_use]
    pub const fn new(anchors: Vec<(f64, Rgb)>) -> Self {
        Self { anchors }
    }

    /// Heatmap scale for a dataset total.
    ///
    /// `[0, 1, total] -> [white, near-white, dark red]`, except for a total
    /// of exactly one, where the middle anchor would collapse onto the last
    /// and `[0, 1] -> [white, dark red]` is used instead.
    #[must_use]
    pub fn for_total(total: f64) -> Self {
        if (total - 1.0).abs() < f64::EPSILON {
            Self::new(vec![(0.0, WHITE), (1.0, DARK_RED)])
        } else {
            Self::new(vec![(0.0, WHITE), (1.0, NEAR_WHITE), (total, DARK_RED)])
        }
    }

    /// Anchors in domain order.
    #[must_use]
    pub fn anchors(&self) -> &[(f64, Rgb)] {
        &self.anchors
    }

    /// Color for `value`.
    #[must_use]
    pub fn color(&self, value: f64) -> Rgb {
        match self.anchors.as_slice() {
            [] => WHITE,
            [(_, only)] => *only,
            anchors => {
                let last = anchors.len() - 1;
                // Interior anchors at or below the value pick the segment.
                let segment = anchors[1..last]
                    .iter()
                    .take_while(|(at, _)| *at <= value)
                    .count();
                let (d0, c0) = anchors[segment];
                let (d1, c1) = anchors[segment + 1];
                let span = d1 - d0;
                let t = if span == 0.0 { 0.5 } else { (value - d0) / span };
                interpolate(c0, c1, t.clamp(0.0, 1.0))
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(a: u8, b: u8, t: f64) -> u8 {
    let a = f64::from(a);
    let b = f64::from(b);
    (b - a).mul_add(t, a).round().clamp(0.0, 255.0) as u8
}

fn interpolate(from: Rgb, to: Rgb, t: f64) -> Rgb {
    Rgb::new(
        channel(from.r, to.r, t),
        channel(from.g, to.g, t),
        channel(from.b, to.b, t),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_of_one_uses_two_anchors() {
        let scale = ColorScale::for_total(1.0);
        assert_eq!(scale.anchors(), &[(0.0, WHITE), (1.0, DARK_RED)]);
        assert_eq!(scale.color(0.0), WHITE);
        assert_eq!(scale.color(1.0), DARK_RED);
    }

    #[test]
    fn other_totals_use_three_anchors() {
        for total in [0.0, 2.0, 40.0] {
            let scale = ColorScale::for_total(total);
            assert_eq!(scale.anchors().len(), 3, "total {total}");
            assert_eq!(scale.anchors()[1], (1.0, NEAR_WHITE));
            assert_eq!(scale.anchors()[2], (total, DARK_RED));
        }
    }

    #[test]
    fn anchors_map_to_their_colors() {
        let scale = ColorScale::for_total(10.0);
        assert_eq!(scale.color(0.0), WHITE);
        assert_eq!(scale.color(1.0), NEAR_WHITE);
        assert_eq!(scale.color(10.0), DARK_RED);
    }

    #[test]
    fn interpolates_within_segment() {
        let scale = ColorScale::for_total(3.0);
        // halfway between #eeeeee and #990000
        assert_eq!(scale.color(2.0), Rgb::new(0xc4, 0x77, 0x77));
    }

    #[test]
    fn color_darkens_monotonically_up_to_total() {
        let scale = ColorScale::for_total(20.0);
        let mut previous = scale.color(0.0).lightness();
        for step in 1..=40 {
            let value = f64::from(step) * 0.5;
            let lightness = scale.color(value).lightness();
            assert!(lightness <= previous, "value {value} got lighter");
            previous = lightness;
        }
    }

    #[test]
    fn values_beyond_total_saturate() {
        let scale = ColorScale::for_total(5.0);
        assert_eq!(scale.color(50.0), DARK_RED);
        assert_eq!(scale.color(-3.0), WHITE);
    }

    #[test]
    fn zero_total_does_not_panic() {
        let scale = ColorScale::for_total(0.0);
        assert_eq!(scale.color(0.0), WHITE);
        let _ = scale.color(7.0);
    }
}
