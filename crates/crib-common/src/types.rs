//! Domain primitive types used across the crib workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CribError;

/// Name of a render target (a widget's drawing area or one of its labels).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    /// Creates a new target ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives the label target `<self>.<suffix>`.
    #[must_use]
    pub fn label(&self, suffix: &str) -> Self {
        Self(format!("{}.{suffix}", self.0))
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One cell of a categorical dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Column key (x axis).
    pub group: String,
    /// Row key (y axis).
    pub variable: String,
    /// Numeric value, `None` when the raw field was not a number.
    pub value: Option<f64>,
}

impl Sample {
    /// Creates a sample with a known value.
    #[must_use]
    pub fn new(group: impl Into<String>, variable: impl Into<String>, value: f64) -> Self {
        Self {
            group: group.into(),
            variable: variable.into(),
            value: Some(value),
        }
    }

    /// Creates a sample from a raw text field.
    ///
    /// Unparsable values are logged and kept as `None`; they count as zero
    /// in aggregates and are left unfilled when drawn.
    #[must_use]
    pub fn parse(row: usize, group: &str, variable: &str, raw: &str) -> Self {
        let value = match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                let err = CribError::MalformedSample {
                    row,
                    raw: raw.to_string(),
                };
                tracing::warn!(error = %err, group, variable, "treating sample as zero");
                None
            }
        };
        Self {
            group: group.to_string(),
            variable: variable.to_string(),
            value,
        }
    }
}

/// Ordered numeric series, most recent value last.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Sample values in time order.
    pub values: Vec<f64>,
}

impl TimeSeries {
    /// Wraps a vector of values.
    #[must_use]
    pub const fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Returns `true` if the series holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Rounded scalar summaries of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// 99th percentile.
    pub p99: i64,
    /// Most recent value.
    pub last: i64,
    /// Largest value.
    pub max: i64,
}

/// Kind of dashboard widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    /// Categorical heatmap fed by CSV rows.
    Heatmap,
    /// Sparkline fed by a JSON series.
    Spark,
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heatmap => write!(f, "heatmap"),
            Self::Spark => write!(f, "spark"),
        }
    }
}

/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Sum of the channels, a cheap lightness proxy.
    #[must_use]
    pub fn lightness(self) -> u16 {
        u16::from(self.r) + u16::from(self.g) + u16::from(self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Space reserved around a drawable area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}

/// Freshness of a widget's rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetStatus {
    /// Nothing fetched yet.
    Pending,
    /// Last fetch succeeded and was rendered.
    Live {
        /// When the render happened.
        updated_at: chrono::DateTime<chrono::Utc>,
    },
    /// Last fetch failed; the previous output is still shown.
    Stale {
        /// When the failure was observed.
        since: chrono::DateTime<chrono::Utc>,
        /// Description of the failure.
        reason: String,
    },
    /// The source returned no data.
    Empty,
}

impl fmt::Display for WidgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Live { updated_at } => write!(f, "live {}", updated_at.format("%H:%M:%S")),
            Self::Stale { reason, .. } => write!(f, "stale: {reason}"),
            Self::Empty => write!(f, "empty"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_targets_append_suffix() {
        let target = TargetId::new("g_cpu_user");
        assert_eq!(target.label("count").as_str(), "g_cpu_user.count");
    }

    #[test]
    fn sample_parse_accepts_numbers() {
        let s = Sample::parse(0, "12:00:00", "5%", " 3 ");
        assert_eq!(s.value, Some(3.0));
    }

    #[test]
    fn sample_parse_keeps_malformed_as_none() {
        assert_eq!(Sample::parse(1, "a", "x", "abc").value, None);
        assert_eq!(Sample::parse(2, "a", "x", "").value, None);
        assert_eq!(Sample::parse(3, "a", "x", "NaN").value, None);
    }

    #[test]
    fn rgb_displays_as_hex() {
        assert_eq!(Rgb::new(0x99, 0, 0).to_string(), "#990000");
    }

    #[test]
    fn widget_kind_deserializes_lowercase() {
        let kind: WidgetKind = serde_json::from_str("\"spark\"").expect("parse");
        assert_eq!(kind, WidgetKind::Spark);
    }

    #[test]
    fn time_series_deserializes_values_object() {
        let ts: TimeSeries = serde_json::from_str(r#"{"values":[1.0,2.5]}"#).expect("parse");
        assert_eq!(ts.values, vec![1.0, 2.5]);
        assert!(!ts.is_empty());
    }
}
