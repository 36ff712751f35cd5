//! Dashboard configuration model.
//!
//! The widget registry is plain data: a list of [`WidgetSpec`] entries, each
//! binding a metrics endpoint to a render target. Front ends load it from a
//! YAML or JSON file and hand it to the orchestrator at startup.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BASE_URL, DEFAULT_INTERVAL_MS, DEFAULT_WINDOW_SECS};
use crate::error::{CribError, Result};
use crate::types::{TargetId, WidgetKind};

/// Default endpoint template for heatmap widgets.
pub const HEATMAP_ENDPOINT: &str = "heatmap_data?metric={metric}&entity={entity}";

/// Default endpoint template for sparkline widgets.
pub const SPARK_ENDPOINT: &str = "ts_sum?entity={entity}&metric={metric}";

/// Largest rollup the metrics backend serves, in seconds.
const MAX_ROLLUP_SECS: u64 = 3600;

/// Points per window the rollup is scaled for.
const POINTS_PER_WINDOW: u64 = 600;

/// Root configuration for a dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Address of the metrics service; endpoints are resolved against it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Refresh interval applied to widgets without their own.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Per-request timeout handed to the HTTP client.
    #[serde(default)]
    pub fetch_timeout_ms: Option<u64>,
    /// Metric window requested from the backend, in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Widgets in display order.
    #[serde(default)]
    pub widgets: Vec<WidgetSpec>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

const fn default_window_secs() -> u64 {
    DEFAULT_WINDOW_SECS
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            interval_ms: DEFAULT_INTERVAL_MS,
            fetch_timeout_ms: None,
            window_secs: DEFAULT_WINDOW_SECS,
            widgets: Vec::new(),
        }
    }
}

/// One widget: where its data comes from and where it is drawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetSpec {
    /// Heatmap or sparkline.
    pub kind: WidgetKind,
    /// Render target the widget owns.
    pub target: TargetId,
    /// Panel title; defaults to the metric name.
    #[serde(default)]
    pub title: Option<String>,
    /// Metric name queried from the backend.
    pub metric: String,
    /// Entity the metric is aggregated over.
    pub entity: String,
    /// Endpoint template overriding the per-kind default.
    ///
    /// Supports `{metric}`, `{entity}`, `{window}` and `{rollup}` placeholders.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Refresh interval overriding the dashboard default.
    #[serde(default)]
    pub interval_ms: Option<u64>,
}

impl WidgetSpec {
    /// Creates a widget spec with default endpoint and interval.
    #[must_use]
    pub fn new(
        kind: WidgetKind,
        target: impl Into<String>,
        metric: impl Into<String>,
        entity: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            target: TargetId::new(target),
            title: None,
            metric: metric.into(),
            entity: entity.into(),
            endpoint: None,
            interval_ms: None,
        }
    }

    /// Title shown above the widget.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.metric)
    }

    /// Expands the endpoint template for this widget.
    #[must_use]
    pub fn endpoint(&self, window_secs: u64, rollup_secs: u64) -> String {
        let template = self.endpoint.as_deref().unwrap_or(match self.kind {
            WidgetKind::Heatmap => HEATMAP_ENDPOINT,
            WidgetKind::Spark => SPARK_ENDPOINT,
        });
        template
            .replace("{metric}", &self.metric)
            .replace("{entity}", &self.entity)
            .replace("{window}", &window_secs.to_string())
            .replace("{rollup}", &rollup_secs.to_string())
    }

    /// Effective refresh interval.
    #[must_use]
    pub fn interval(&self, default_ms: u64) -> Duration {
        Duration::from_millis(self.interval_ms.unwrap_or(default_ms))
    }
}

impl DashboardConfig {
    /// Loads a configuration file, picking the format from its extension
    /// (`.json` for JSON, anything else for YAML).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading dashboard configuration");
        let content = std::fs::read_to_string(path).map_err(|e| CribError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(config)
    }

    /// Backend rollup for the configured window.
    ///
    /// # Errors
    ///
    /// Returns an error if the window exceeds what the backend accepts.
    pub fn rollup_secs(&self) -> Result<u64> {
        rollup_for_window(self.window_secs)
    }

    /// Effective refresh interval for `widget`.
    #[must_use]
    pub fn interval_for(&self, widget: &WidgetSpec) -> Duration {
        widget.interval(self.interval_ms)
    }

    /// The standard operations dashboard: ingestion error-rate and host CPU
    /// heatmaps plus throughput sparklines.
    #[must_use]
    pub fn sample() -> Self {
        let heatmap = |target: &str, title: &str, metric: &str, entity: &str| WidgetSpec {
            title: Some(title.to_string()),
            ..WidgetSpec::new(WidgetKind::Heatmap, target, metric, entity)
        };
        let spark = |target: &str, title: &str, metric: &str, entity: &str| WidgetSpec {
            title: Some(title.to_string()),
            ..WidgetSpec::new(WidgetKind::Spark, target, metric, entity)
        };
        Self {
            widgets: vec![
                heatmap(
                    "g_ad_processor_dropping",
                    "processor dropping",
                    "metrics.gauges.KPI.incoming.span_messages.error_rate",
                    "appdataProcessor",
                ),
                heatmap(
                    "g_ad_writer_dropping",
                    "writer dropping",
                    "metrics.gauges.KPI.incoming.raw_spans.error_rate",
                    "appdataWriter",
                ),
                heatmap("g_cpu_sys", "cpu sys", "cpu.sys", "host"),
                heatmap("g_cpu_user", "cpu user", "cpu.user", "host"),
                heatmap("g_cpu_wait", "cpu wait", "cpu.wait", "host"),
                heatmap(
                    "g_filler_dropping",
                    "filler dropping",
                    "metrics.gauges.KPI.incoming.raw_messages.error_rate",
                    "filler",
                ),
                spark(
                    "sparkFiller",
                    "filler online snapshots",
                    "metrics.gauges.com.instana.filler.service.snapshot.OnlineSnapshotsLimit.online-snapshots-count",
                    "filler",
                ),
                spark(
                    "sparkProcessor",
                    "processor calls",
                    "metrics.meters.KPI.incoming.span_messages.calls",
                    "appdataProcessor",
                ),
                spark(
                    "sparkWriter",
                    "writer calls",
                    "metrics.meters.KPI.incoming.raw_spans.calls",
                    "appdataWriter",
                ),
            ],
            ..Self::default()
        }
    }
}

/// Picks the backend rollup for a window: one of the resolutions the
/// backend supports, scaled to roughly 600 points per window.
///
/// # Errors
///
/// Returns an error if the window is longer than 25 days.
pub fn rollup_for_window(window_secs: u64) -> Result<u64> {
    let rollup = window_secs / POINTS_PER_WINDOW;
    if rollup > MAX_ROLLUP_SECS {
        return Err(CribError::Config {
            message: format!(
                "window of {window_secs}s is too large, the maximum is 25 days"
            ),
        });
    }
    let chosen = match rollup {
        0..=1 => 1,
        2..=5 => 5,
        6..=60 => 60,
        61..=300 => 300,
        _ => 3600,
    };
    Ok(chosen)
}

/// Validates a configuration for semantic correctness.
///
/// # Checks performed
///
/// 1. The base URL is an absolute `http` or `https` address.
/// 2. Every refresh interval is non-zero.
/// 3. The metric window maps to a backend rollup.
/// 4. No two widgets share a render target.
/// 5. Metric and entity names only use `[A-Za-z0-9._-]`.
///
/// # Errors
///
/// Returns an error if any check fails.
pub fn validate(config: &DashboardConfig) -> Result<()> {
    tracing::info!(widgets = config.widgets.len(), "validating dashboard configuration");
    check_base_url(&config.base_url)?;
    check_intervals(config)?;
    let _ = config.rollup_secs()?;
    check_duplicate_targets(config)?;
    check_names(config)?;
    Ok(())
}

fn check_base_url(base_url: &str) -> Result<()> {
    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        return Ok(());
    }
    Err(CribError::Config {
        message: format!("base_url must be an http(s) URL: \"{base_url}\""),
    })
}

fn check_intervals(config: &DashboardConfig) -> Result<()> {
    if config.interval_ms == 0 {
        return Err(CribError::Config {
            message: "interval_ms must be greater than zero".into(),
        });
    }
    for widget in &config.widgets {
        if widget.interval_ms == Some(0) {
            return Err(CribError::Config {
                message: format!("widget \"{}\" has a zero interval_ms", widget.target),
            });
        }
    }
    Ok(())
}

fn check_duplicate_targets(config: &DashboardConfig) -> Result<()> {
    let mut seen = HashSet::new();
    for widget in &config.widgets {
        if !seen.insert(&widget.target) {
            return Err(CribError::Config {
                message: format!("duplicate render target: \"{}\"", widget.target),
            });
        }
    }
    Ok(())
}

fn check_names(config: &DashboardConfig) -> Result<()> {
    for widget in &config.widgets {
        for (field, name) in [("metric", &widget.metric), ("entity", &widget.entity)] {
            if !is_valid_name(name) {
                return Err(CribError::Config {
                    message: format!(
                        "widget \"{}\" has an invalid {field} name: \"{name}\"",
                        widget.target
                    ),
                });
            }
        }
    }
    Ok(())
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_YAML: &str = r#"
base_url: "http://metrics.internal:8000/"
interval_ms: 500
widgets:
  - kind: heatmap
    target: g_cpu_user
    metric: cpu.user
    entity: host
  - kind: spark
    target: sparkFiller
    title: Filler snapshots
    metric: metrics.gauges.online-snapshots-count
    entity: filler
    interval_ms: 1000
"#;

    fn config_with(widgets: Vec<WidgetSpec>) -> DashboardConfig {
        DashboardConfig {
            widgets,
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn load_yaml_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("crib.yaml");
        std::fs::write(&path, SAMPLE_YAML).expect("write");

        let config = DashboardConfig::load(&path).expect("load");
        assert_eq!(config.base_url, "http://metrics.internal:8000/");
        assert_eq!(config.interval_ms, 500);
        assert_eq!(config.window_secs, DEFAULT_WINDOW_SECS);
        assert_eq!(config.widgets.len(), 2);
        assert_eq!(config.widgets[0].kind, WidgetKind::Heatmap);
        assert_eq!(config.widgets[1].title(), "Filler snapshots");
        validate(&config).expect("valid");
    }

    #[test]
    fn load_json_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("crib.json");
        std::fs::write(
            &path,
            r#"{"widgets":[{"kind":"spark","target":"s","metric":"m","entity":"e"}]}"#,
        )
        .expect("write");

        let config = DashboardConfig::load(&path).expect("load");
        assert_eq!(config.interval_ms, DEFAULT_INTERVAL_MS);
        assert_eq!(config.widgets[0].target.as_str(), "s");
    }

    #[test]
    fn load_missing_file_returns_io_error() {
        let err = DashboardConfig::load(Path::new("/nonexistent/crib.yaml")).unwrap_err();
        assert!(matches!(err, CribError::Io { .. }));
    }

    #[test]
    fn load_malformed_yaml_returns_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "widgets: [ {kind: ").expect("write");
        assert!(DashboardConfig::load(&path).is_err());
    }

    #[test]
    fn default_endpoints_expand_per_kind() {
        let heat = WidgetSpec::new(WidgetKind::Heatmap, "g", "cpu.sys", "host");
        assert_eq!(heat.endpoint(60, 1), "heatmap_data?metric=cpu.sys&entity=host");

        let spark = WidgetSpec::new(WidgetKind::Spark, "s", "calls", "appdataWriter");
        assert_eq!(spark.endpoint(60, 1), "ts_sum?entity=appdataWriter&metric=calls");
    }

    #[test]
    fn custom_endpoint_template_expands_window_and_rollup() {
        let mut spec = WidgetSpec::new(WidgetKind::Spark, "s", "calls", "filler");
        spec.endpoint = Some("series/{entity}/{metric}?window={window}&rollup={rollup}".into());
        assert_eq!(
            spec.endpoint(3600, 5),
            "series/filler/calls?window=3600&rollup=5"
        );
    }

    #[test]
    fn widget_interval_overrides_default() {
        let mut spec = WidgetSpec::new(WidgetKind::Spark, "s", "m", "e");
        assert_eq!(spec.interval(250), Duration::from_millis(250));
        spec.interval_ms = Some(1000);
        assert_eq!(spec.interval(250), Duration::from_millis(1000));
    }

    #[test]
    fn rollup_steps() {
        assert_eq!(rollup_for_window(60).expect("rollup"), 1);
        assert_eq!(rollup_for_window(600).expect("rollup"), 1);
        assert_eq!(rollup_for_window(3000).expect("rollup"), 5);
        assert_eq!(rollup_for_window(3600).expect("rollup"), 60);
        assert_eq!(rollup_for_window(24 * 3600).expect("rollup"), 300);
        assert_eq!(rollup_for_window(7 * 24 * 3600).expect("rollup"), 3600);
        assert!(rollup_for_window(26 * 24 * 3600).is_err());
    }

    #[test]
    fn rollup_limit_uses_whole_rollup_steps() {
        assert_eq!(rollup_for_window(25 * 24 * 3600).expect("rollup"), 3600);
        assert_eq!(rollup_for_window(25 * 24 * 3600 + 599).expect("rollup"), 3600);
        assert!(rollup_for_window(25 * 24 * 3600 + 600).is_err());
    }

    #[test]
    fn validate_rejects_duplicate_targets() {
        let config = config_with(vec![
            WidgetSpec::new(WidgetKind::Heatmap, "same", "cpu.user", "host"),
            WidgetSpec::new(WidgetKind::Spark, "same", "calls", "filler"),
        ]);
        let msg = validate(&config).unwrap_err().to_string();
        assert!(msg.contains("duplicate render target"), "got: {msg}");
    }

    #[test]
    fn validate_rejects_invalid_metric_names() {
        let config = config_with(vec![WidgetSpec::new(
            WidgetKind::Heatmap,
            "g",
            "cpu.user&entity=other",
            "host",
        )]);
        let msg = validate(&config).unwrap_err().to_string();
        assert!(msg.contains("invalid metric name"), "got: {msg}");
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let mut config = config_with(Vec::new());
        config.interval_ms = 0;
        assert!(validate(&config).is_err());

        let mut spec = WidgetSpec::new(WidgetKind::Spark, "s", "m", "e");
        spec.interval_ms = Some(0);
        assert!(validate(&config_with(vec![spec])).is_err());
    }

    #[test]
    fn validate_rejects_non_http_base_url() {
        let config = DashboardConfig {
            base_url: "ftp://metrics".into(),
            ..DashboardConfig::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn sample_dashboard_is_valid() {
        let sample = DashboardConfig::sample();
        assert_eq!(sample.widgets.len(), 9);
        validate(&sample).expect("sample validates");
    }

    #[test]
    fn example_file_matches_sample() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../crib.example.yaml");
        let loaded = DashboardConfig::load(&path).expect("example config loads");
        validate(&loaded).expect("example config validates");
        let targets = |c: &DashboardConfig| c.widgets.iter().map(|w| w.target.clone()).collect::<Vec<_>>();
        assert_eq!(targets(&loaded), targets(&DashboardConfig::sample()));
    }

    #[test]
    fn validate_accepts_empty_dashboard() {
        validate(&DashboardConfig::default()).expect("valid");
    }
}
