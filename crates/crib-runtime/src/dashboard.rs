//! Dashboard orchestration.
//!
//! Turns a validated configuration into live widgets: one widget object
//! per entry, each registered with the scheduler at its own interval and
//! sharing one data source and one render surface.

use std::sync::Arc;
use std::time::Duration;

use crib_common::config::{self, DashboardConfig, WidgetSpec};
use crib_common::error::Result;
use crib_common::types::WidgetKind;
use crib_core::surface::RenderSurface;

use crate::scheduler::{RefreshScheduler, RefreshTask, ResizeSignal};
use crate::source::DataSource;
use crate::widget::{HeatmapWidget, SparkWidget};

/// A widget registered on the dashboard.
#[derive(Clone)]
pub enum WidgetHandle {
    /// Categorical heatmap.
    Heatmap(Arc<HeatmapWidget>),
    /// Sparkline.
    Spark(Arc<SparkWidget>),
}

impl WidgetHandle {
    /// The widget as a schedulable task.
    #[must_use]
    pub fn task(&self) -> Arc<dyn RefreshTask> {
        match self {
            Self::Heatmap(w) => Arc::clone(w) as Arc<dyn RefreshTask>,
            Self::Spark(w) => Arc::clone(w) as Arc<dyn RefreshTask>,
        }
    }

    /// Endpoint the widget fetches.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Heatmap(w) => w.endpoint(),
            Self::Spark(w) => w.endpoint(),
        }
    }
}

/// Builds one widget per configuration entry, in configuration order.
///
/// # Errors
///
/// Returns an error if the configured window has no valid rollup.
pub fn build_widgets(
    config: &DashboardConfig,
    source: &Arc<dyn DataSource>,
    surface: &Arc<dyn RenderSurface>,
) -> Result<Vec<WidgetHandle>> {
    let rollup = config.rollup_secs()?;
    Ok(config
        .widgets
        .iter()
        .map(|spec| build_widget(spec, config.window_secs, rollup, source, surface))
        .collect())
}

fn build_widget(
    spec: &WidgetSpec,
    window_secs: u64,
    rollup_secs: u64,
    source: &Arc<dyn DataSource>,
    surface: &Arc<dyn RenderSurface>,
) -> WidgetHandle {
    let endpoint = spec.endpoint(window_secs, rollup_secs);
    let (source, surface) = (Arc::clone(source), Arc::clone(surface));
    match spec.kind {
        WidgetKind::Heatmap => {
            WidgetHandle::Heatmap(Arc::new(HeatmapWidget::new(spec.target.clone(), endpoint, source, surface)))
        }
        WidgetKind::Spark => {
            WidgetHandle::Spark(Arc::new(SparkWidget::new(spec.target.clone(), endpoint, source, surface)))
        }
    }
}

/// Refreshes every widget once, in order, returning each outcome.
pub async fn refresh_once(widgets: &[WidgetHandle]) -> Vec<(String, Result<()>)> {
    let mut outcomes = Vec::with_capacity(widgets.len());
    for widget in widgets {
        let task = widget.task();
        let outcome = task.refresh().await;
        outcomes.push((task.name().to_string(), outcome));
    }
    outcomes
}

/// A running dashboard: widgets plus the scheduler driving them.
pub struct Dashboard {
    scheduler: RefreshScheduler,
    widgets: Vec<WidgetHandle>,
}

impl Dashboard {
    /// Validates `config`, builds its widgets, and starts refreshing them.
    ///
    /// Every widget is fetched immediately, then on its interval and on
    /// every resize. Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn start(
        config: &DashboardConfig,
        source: Arc<dyn DataSource>,
        surface: Arc<dyn RenderSurface>,
    ) -> Result<Self> {
        config::validate(config)?;
        let widgets = build_widgets(config, &source, &surface)?;

        let mut scheduler = RefreshScheduler::new();
        for (spec, widget) in config.widgets.iter().zip(&widgets) {
            tracing::debug!(target_id = %spec.target, kind = %spec.kind, endpoint = widget.endpoint(), "starting widget");
            scheduler.register(widget.task(), config.interval_for(spec));
        }
        tracing::info!(widgets = widgets.len(), base_url = %config.base_url, "dashboard started");

        Ok(Self { scheduler, widgets })
    }

    /// Handle for reporting viewport resizes.
    #[must_use]
    pub fn resize_signal(&self) -> ResizeSignal {
        self.scheduler.resize_signal()
    }

    /// Widgets in configuration order.
    #[must_use]
    pub fn widgets(&self) -> &[WidgetHandle] {
        &self.widgets
    }

    /// Total refresh invocations started so far.
    #[must_use]
    pub fn invocations(&self) -> u64 {
        self.scheduler.invocations()
    }

    /// Stops all refreshing.
    pub async fn shutdown(self) {
        self.scheduler.shutdown().await;
    }
}

/// Shortest interval across `config`'s widgets; the front end's redraw
/// cadence.
#[must_use]
pub fn fastest_interval(config: &DashboardConfig) -> Duration {
    config
        .widgets
        .iter()
        .map(|w| config.interval_for(w))
        .min()
        .unwrap_or_else(|| Duration::from_millis(config.interval_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DemoSource;
    use crib_core::surface::SceneStore;

    fn config() -> DashboardConfig {
        let mut spark = WidgetSpec::new(WidgetKind::Spark, "sparkFiller", "rps", "web");
        spark.interval_ms = Some(1000);
        DashboardConfig {
            widgets: vec![WidgetSpec::new(WidgetKind::Heatmap, "heat", "cpu", "web"), spark],
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn widgets_follow_configuration_order() {
        let source: Arc<dyn DataSource> = Arc::new(DemoSource::new(60));
        let surface: Arc<dyn RenderSurface> = Arc::new(SceneStore::new());
        let widgets = build_widgets(&config(), &source, &surface).expect("widgets");
        assert_eq!(widgets.len(), 2);
        assert!(matches!(widgets[0], WidgetHandle::Heatmap(_)));
        assert_eq!(widgets[0].endpoint(), "heatmap_data?metric=cpu&entity=web");
        assert_eq!(widgets[1].endpoint(), "ts_sum?entity=web&metric=rps");
        assert_eq!(widgets[1].task().name(), "sparkFiller");
    }

    #[test]
    fn fastest_interval_picks_the_minimum() {
        assert_eq!(fastest_interval(&config()), Duration::from_millis(250));
        assert_eq!(fastest_interval(&DashboardConfig::default()), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn refresh_once_renders_every_widget() {
        let store = Arc::new(SceneStore::new());
        let source: Arc<dyn DataSource> = Arc::new(DemoSource::new(30));
        let surface: Arc<dyn RenderSurface> = store.clone();
        let widgets = build_widgets(&config(), &source, &surface).expect("widgets");

        let outcomes = refresh_once(&widgets).await;
        assert!(outcomes.iter().all(|(_, r)| r.is_ok()));
        assert!(store.scene(&crib_common::types::TargetId::new("heat")).is_some());
        assert!(store.scene(&crib_common::types::TargetId::new("sparkFiller")).is_some());
    }

    #[tokio::test]
    async fn start_rejects_invalid_configuration() {
        let mut bad = config();
        bad.interval_ms = 0;
        let result = Dashboard::start(&bad, Arc::new(DemoSource::new(60)), Arc::new(SceneStore::new()));
        assert!(result.is_err());
    }
}
