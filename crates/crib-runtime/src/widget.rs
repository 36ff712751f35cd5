//! Widget objects: one per heatmap or sparkline on the dashboard.
//!
//! A widget owns its render target, its endpoint, and the last data it
//! drew. Each refresh takes a generation number before fetching; when the
//! response arrives it is rendered only if no later generation has already
//! been rendered, so a slow response never overwrites a newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use crib_common::constants::{COUNT_LABEL, LAST_LABEL, MAX_LABEL, P99_LABEL};
use crib_common::error::{CribError, Result};
use crib_common::types::{Sample, TargetId, WidgetStatus};
use crib_core::heatmap::HeatmapGrid;
use crib_core::spark::SparkChart;
use crib_core::surface::RenderSurface;
use tokio::sync::Mutex;

use crate::scheduler::RefreshTask;
use crate::source::DataSource;

/// Label text shown when a series has no data.
const NO_DATA: &str = "-";

/// Monotonic per-widget request counter.
#[derive(Debug, Default)]
pub struct Generations {
    issued: AtomicU64,
}

impl Generations {
    /// Issues the next generation, starting at 1.
    pub fn next(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Latest generation issued.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
struct RenderState<T> {
    rendered: u64,
    last: Option<T>,
}

impl<T> Default for RenderState<T> {
    fn default() -> Self {
        Self {
            rendered: 0,
            last: None,
        }
    }
}

impl<T> RenderState<T> {
    const fn is_superseded(&self, generation: u64) -> bool {
        generation <= self.rendered
    }
}

fn mark_stale(surface: &dyn RenderSurface, target: &TargetId, err: &CribError) {
    surface.set_status(
        target,
        WidgetStatus::Stale {
            since: Utc::now(),
            reason: err.to_string(),
        },
    );
}

/// Categorical heatmap bound to one render target.
pub struct HeatmapWidget {
    target: TargetId,
    endpoint: String,
    source: Arc<dyn DataSource>,
    surface: Arc<dyn RenderSurface>,
    generations: Generations,
    state: Mutex<RenderState<Vec<Sample>>>,
}

impl HeatmapWidget {
    /// Creates a widget drawing the dataset at `endpoint` into `target`.
    pub fn new(
        target: TargetId,
        endpoint: impl Into<String>,
        source: Arc<dyn DataSource>,
        surface: Arc<dyn RenderSurface>,
    ) -> Self {
        Self {
            target,
            endpoint: endpoint.into(),
            source,
            surface,
            generations: Generations::default(),
            state: Mutex::new(RenderState::default()),
        }
    }

    /// Render target.
    #[must_use]
    pub const fn target(&self) -> &TargetId {
        &self.target
    }

    /// Endpoint fetched on every refresh.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Dataset behind the current rendering.
    pub async fn last_samples(&self) -> Option<Vec<Sample>> {
        self.state.lock().await.last.clone()
    }

    /// Generation of the current rendering; 0 before the first.
    pub async fn rendered_generation(&self) -> u64 {
        self.state.lock().await.rendered
    }

    /// Lays out `samples` at the target's current width and hands the
    /// result to the surface.
    pub fn render(&self, samples: &[Sample]) {
        let width = self.surface.available_width(&self.target);
        let grid = HeatmapGrid::build(samples, width);
        self.surface.replace(&self.target, grid.scene());
        self.surface
            .set_text(&self.target.label(COUNT_LABEL), grid.total.to_string());
        let status = if samples.is_empty() {
            WidgetStatus::Empty
        } else {
            WidgetStatus::Live {
                updated_at: Utc::now(),
            }
        };
        self.surface.set_status(&self.target, status);
    }
}

#[async_trait]
impl RefreshTask for HeatmapWidget {
    fn name(&self) -> &str {
        self.target.as_str()
    }

    async fn refresh(&self) -> Result<()> {
        let generation = self.generations.next();
        let fetched = self.source.fetch_samples(&self.endpoint).await;

        let mut state = self.state.lock().await;
        if state.is_superseded(generation) {
            tracing::debug!(target_id = %self.target, generation, rendered = state.rendered, "discarding superseded heatmap data");
            return Ok(());
        }
        match fetched {
            Ok(samples) => {
                self.render(&samples);
                state.rendered = generation;
                state.last = Some(samples);
                Ok(())
            }
            Err(e) => {
                mark_stale(self.surface.as_ref(), &self.target, &e);
                Err(e)
            }
        }
    }
}

/// Sparkline with p99, last and max labels, bound to one render target.
pub struct SparkWidget {
    target: TargetId,
    endpoint: String,
    source: Arc<dyn DataSource>,
    surface: Arc<dyn RenderSurface>,
    generations: Generations,
    state: Mutex<RenderState<Vec<f64>>>,
}

impl SparkWidget {
    /// Creates a widget drawing the series at `endpoint` into `target`.
    pub fn new(
        target: TargetId,
        endpoint: impl Into<String>,
        source: Arc<dyn DataSource>,
        surface: Arc<dyn RenderSurface>,
    ) -> Self {
        Self {
            target,
            endpoint: endpoint.into(),
            source,
            surface,
            generations: Generations::default(),
            state: Mutex::new(RenderState::default()),
        }
    }

    /// Render target.
    #[must_use]
    pub const fn target(&self) -> &TargetId {
        &self.target
    }

    /// Endpoint fetched on every refresh.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Series behind the current rendering.
    pub async fn last_values(&self) -> Option<Vec<f64>> {
        self.state.lock().await.last.clone()
    }

    /// Generation of the current rendering; 0 before the first.
    pub async fn rendered_generation(&self) -> u64 {
        self.state.lock().await.rendered
    }

    /// Draws `values` and their summaries, or the empty state when there
    /// are none.
    pub fn render(&self, values: &[f64]) {
        match SparkChart::build(&self.target, values) {
            Ok(chart) => {
                self.surface.replace(&self.target, chart.scene());
                self.set_labels(
                    chart.summary.p99.to_string(),
                    chart.summary.last.to_string(),
                    chart.summary.max.to_string(),
                );
                self.surface.set_status(
                    &self.target,
                    WidgetStatus::Live {
                        updated_at: Utc::now(),
                    },
                );
            }
            Err(e) => {
                tracing::debug!(target_id = %self.target, error = %e, "rendering empty sparkline");
                self.surface.replace(&self.target, SparkChart::empty_scene());
                self.set_labels(NO_DATA.into(), NO_DATA.into(), NO_DATA.into());
                self.surface.set_status(&self.target, WidgetStatus::Empty);
            }
        }
    }

    fn set_labels(&self, p99: String, last: String, max: String) {
        self.surface.set_text(&self.target.label(P99_LABEL), p99);
        self.surface.set_text(&self.target.label(LAST_LABEL), last);
        self.surface.set_text(&self.target.label(MAX_LABEL), max);
    }
}

#[async_trait]
impl RefreshTask for SparkWidget {
    fn name(&self) -> &str {
        self.target.as_str()
    }

    async fn refresh(&self) -> Result<()> {
        let generation = self.generations.next();
        let fetched = self.source.fetch_series(&self.endpoint).await;

        let mut state = self.state.lock().await;
        if state.is_superseded(generation) {
            tracing::debug!(target_id = %self.target, generation, rendered = state.rendered, "discarding superseded series");
            return Ok(());
        }
        match fetched {
            Ok(series) => {
                self.render(&series.values);
                state.rendered = generation;
                state.last = Some(series.values);
                Ok(())
            }
            Err(e) => {
                mark_stale(self.surface.as_ref(), &self.target, &e);
                Err(e)
            }
        }
    }
}
