//! Render surface contract and an in-memory implementation.
//!
//! Widgets never draw directly; they hand complete [`Scene`]s and label
//! text to a [`RenderSurface`]. Front ends decide how (and whether) the
//! stored scenes reach a screen.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crib_common::constants::FALLBACK_WIDTH;
use crib_common::types::{TargetId, WidgetStatus};

use crate::scene::Scene;

/// Drawing surface shared by all widgets.
///
/// Each target is written by exactly one widget, so implementations only
/// need to make individual calls atomic.
pub trait RenderSurface: Send + Sync {
    /// Current layout width of `target`, queried on every render.
    fn available_width(&self, target: &TargetId) -> f64;

    /// Replaces everything drawn in `target` with `scene`.
    ///
    /// Idempotent: replacing with an equal scene changes nothing visible.
    fn replace(&self, target: &TargetId, scene: Scene);

    /// Sets the text content of a label target.
    fn set_text(&self, label: &TargetId, text: String);

    /// Records the freshness of a widget's output.
    fn set_status(&self, target: &TargetId, status: WidgetStatus);
}

#[derive(Debug, Default)]
struct StoreState {
    scenes: HashMap<TargetId, Scene>,
    texts: HashMap<TargetId, String>,
    statuses: HashMap<TargetId, WidgetStatus>,
    widths: HashMap<TargetId, f64>,
    replacements: HashMap<TargetId, u64>,
}

/// Thread-safe, in-memory render surface.
///
/// Holds the latest scene, labels and status of every target. The terminal
/// front end paints from it and reports panel widths back through
/// [`SceneStore::set_width`]; headless runs and tests read it directly.
#[derive(Debug, Default)]
pub struct SceneStore {
    state: Mutex<StoreState>,
}

impl SceneStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the layout width of `target`.
    pub fn set_width(&self, target: &TargetId, width: f64) {
        let _ = self.lock().widths.insert(target.clone(), width);
    }

    /// Latest scene drawn into `target`.
    #[must_use]
    pub fn scene(&self, target: &TargetId) -> Option<Scene> {
        self.lock().scenes.get(target).cloned()
    }

    /// Text of a label target.
    #[must_use]
    pub fn text(&self, label: &TargetId) -> Option<String> {
        self.lock().texts.get(label).cloned()
    }

    /// Status of `target`, [`WidgetStatus::Pending`] until first reported.
    #[must_use]
    pub fn status(&self, target: &TargetId) -> WidgetStatus {
        self.lock()
            .statuses
            .get(target)
            .cloned()
            .unwrap_or(WidgetStatus::Pending)
    }

    /// Number of times `target` has been replaced.
    #[must_use]
    pub fn replacements(&self, target: &TargetId) -> u64 {
        self.lock().replacements.get(target).copied().unwrap_or(0)
    }
}

impl RenderSurface for SceneStore {
    fn available_width(&self, target: &TargetId) -> f64 {
        self.lock()
            .widths
            .get(target)
            .copied()
            .unwrap_or(FALLBACK_WIDTH)
    }

    fn replace(&self, target: &TargetId, scene: Scene) {
        let mut state = self.lock();
        let _ = state.scenes.insert(target.clone(), scene);
        *state.replacements.entry(target.clone()).or_insert(0) += 1;
    }

    fn set_text(&self, label: &TargetId, text: String) {
        let _ = self.lock().texts.insert(label.clone(), text);
    }

    fn set_status(&self, target: &TargetId, status: WidgetStatus) {
        let _ = self.lock().statuses.insert(target.clone(), status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_target_uses_fallback_width() {
        let store = SceneStore::new();
        assert_eq!(store.available_width(&TargetId::new("t")), FALLBACK_WIDTH);
    }

    #[test]
    fn reported_width_is_returned() {
        let store = SceneStore::new();
        let target = TargetId::new("t");
        store.set_width(&target, 420.0);
        assert_eq!(store.available_width(&target), 420.0);
    }

    #[test]
    fn replace_overwrites_previous_scene() {
        let store = SceneStore::new();
        let target = TargetId::new("t");
        store.replace(&target, Scene::new(10.0, 10.0));
        store.replace(&target, Scene::new(20.0, 10.0));

        let scene = store.scene(&target).expect("scene");
        assert_eq!(scene.width, 20.0);
        assert_eq!(store.replacements(&target), 2);
    }

    #[test]
    fn targets_are_independent() {
        let store = SceneStore::new();
        store.replace(&TargetId::new("a"), Scene::new(1.0, 1.0));
        assert!(store.scene(&TargetId::new("b")).is_none());
        assert_eq!(store.status(&TargetId::new("b")), WidgetStatus::Pending);
    }

    #[test]
    fn labels_store_text() {
        let store = SceneStore::new();
        let label = TargetId::new("t").label("count");
        store.set_text(&label, "12".into());
        assert_eq!(store.text(&label).as_deref(), Some("12"));
    }
}
