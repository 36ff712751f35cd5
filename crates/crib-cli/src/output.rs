//! Formatted output helpers for CLI commands.
//!
//! Provides the widget and snapshot tables and human-readable interval
//! formatting.

use std::fmt::Write as _;

use crib_common::config::DashboardConfig;
use crib_common::constants::{COUNT_LABEL, LAST_LABEL, MAX_LABEL, P99_LABEL};
use crib_common::types::{TargetId, WidgetKind};
use crib_core::surface::SceneStore;
use serde::Serialize;

/// Formats a millisecond interval (e.g. "250ms", "1s", "1.5s").
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_interval(ms: u128) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms % 1000 == 0 {
        format!("{}s", ms / 1000)
    } else {
        format!("{:.1}s", ms as f64 / 1000.0)
    }
}

/// One line per widget: target, kind, interval and title, plus the expanded
/// endpoint when a rollup is given.
#[must_use]
pub fn widget_table(config: &DashboardConfig, endpoints_with_rollup: Option<u64>) -> String {
    let mut out = format!("{:<28} {:<8} {:<10} {:<28}", "TARGET", "KIND", "INTERVAL", "TITLE");
    if endpoints_with_rollup.is_some() {
        out.push_str(" ENDPOINT");
    }
    out.push('\n');
    for widget in &config.widgets {
        let _ = write!(
            out,
            "{:<28} {:<8} {:<10} {:<28}",
            widget.target.as_str(),
            widget.kind.to_string(),
            format_interval(config.interval_for(widget).as_millis()),
            widget.title(),
        );
        if let Some(rollup) = endpoints_with_rollup {
            let _ = write!(out, " {}", widget.endpoint(config.window_secs, rollup));
        }
        out.push('\n');
    }
    out
}

/// Rendered state of one widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotRow {
    /// Render target.
    pub target: String,
    /// Heatmap or sparkline.
    pub kind: WidgetKind,
    /// Freshness, as displayed.
    pub status: String,
    /// Label texts by suffix, in display order.
    pub labels: Vec<(String, String)>,
}

/// Reads every widget's status and labels from the store.
pub fn snapshot_rows(config: &DashboardConfig, store: &SceneStore) -> Vec<SnapshotRow> {
    config
        .widgets
        .iter()
        .map(|widget| {
            let suffixes: &[&str] = match widget.kind {
                WidgetKind::Heatmap => &[COUNT_LABEL],
                WidgetKind::Spark => &[P99_LABEL, LAST_LABEL, MAX_LABEL],
            };
            SnapshotRow {
                target: widget.target.to_string(),
                kind: widget.kind,
                status: store.status(&widget.target).to_string(),
                labels: suffixes
                    .iter()
                    .map(|suffix| (suffix.to_string(), label_text(store, &widget.target, suffix)))
                    .collect(),
            }
        })
        .collect()
}

fn label_text(store: &SceneStore, target: &TargetId, suffix: &str) -> String {
    store.text(&target.label(suffix)).unwrap_or_else(|| "-".into())
}

/// Table of snapshot rows.
#[must_use]
pub fn snapshot_table(rows: &[SnapshotRow]) -> String {
    let mut out = format!("{:<28} {:<8} {:<28} {}\n", "TARGET", "KIND", "VALUES", "STATUS");
    for row in rows {
        let values = row
            .labels
            .iter()
            .map(|(name, text)| format!("{name} {text}"))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(
            out,
            "{:<28} {:<8} {:<28} {}",
            row.target,
            row.kind.to_string(),
            values,
            row.status
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crib_common::config::WidgetSpec;
    use crib_common::types::WidgetStatus;
    use crib_core::surface::RenderSurface;

    fn config() -> DashboardConfig {
        let mut spark = WidgetSpec::new(WidgetKind::Spark, "sparkWriter", "calls", "writer");
        spark.interval_ms = Some(1500);
        DashboardConfig {
            widgets: vec![WidgetSpec::new(WidgetKind::Heatmap, "g_cpu_user", "cpu.user", "host"), spark],
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn format_interval_displays_milliseconds() {
        assert_eq!(format_interval(250), "250ms");
    }

    #[test]
    fn format_interval_displays_whole_seconds() {
        assert_eq!(format_interval(60_000), "60s");
    }

    #[test]
    fn format_interval_displays_fractional_seconds() {
        assert_eq!(format_interval(1500), "1.5s");
    }

    #[test]
    fn widget_table_lists_every_widget() {
        let table = widget_table(&config(), None);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("TARGET"));
        assert!(lines[1].contains("g_cpu_user") && lines[1].contains("heatmap") && lines[1].contains("250ms"));
        assert!(lines[2].contains("sparkWriter") && lines[2].contains("1.5s"));
        assert!(!table.contains("ENDPOINT"));
    }

    #[test]
    fn widget_table_expands_endpoints_on_request() {
        let table = widget_table(&config(), Some(1));
        assert!(table.contains("heatmap_data?metric=cpu.user&entity=host"));
        assert!(table.contains("ts_sum?entity=writer&metric=calls"));
    }

    #[test]
    fn snapshot_reads_labels_and_status() {
        let store = SceneStore::new();
        let heat = TargetId::new("g_cpu_user");
        store.set_text(&heat.label(COUNT_LABEL), "42".into());
        store.set_status(&TargetId::new("sparkWriter"), WidgetStatus::Empty);

        let rows = snapshot_rows(&config(), &store);
        assert_eq!(rows[0].labels, vec![("count".to_string(), "42".to_string())]);
        assert_eq!(rows[1].labels.len(), 3);
        assert_eq!(rows[1].labels[0].1, "-");

        let table = snapshot_table(&rows);
        assert!(table.contains("count 42"));
        assert!(table.contains("p99 -  last -  max -"));
    }
}
