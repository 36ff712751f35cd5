//! Continuous linear scale.

/// Maps a continuous domain linearly onto a continuous range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Creates a scale from `domain` to `range`.
    #[must_use]
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps `value` into the range. Values outside the domain extrapolate.
    ///
    /// A degenerate domain maps everything to the middle of the range.
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (value - d0) / span };
        (r1 - r0).mul_add(t, r0)
    }

    /// Domain bounds.
    #[must_use]
    pub const fn domain(&self) -> (f64, f64) {
        self.domain
    }
}
