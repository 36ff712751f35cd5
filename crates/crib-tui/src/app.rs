//! TUI application state machine.
//!
//! Tracks the active view, the selected panel, and the panel widths last
//! reported to the render surface.

use std::collections::HashMap;

use crib_common::config::DashboardConfig;
use crib_common::types::{TargetId, WidgetKind};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Which view the TUI is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Every widget stacked in configuration order.
    Dashboard,
    /// The selected widget on its own.
    Detail,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing beyond a repaint.
    None,
    /// Leave the TUI.
    Quit,
    /// Refresh every widget now.
    Refresh,
}

/// One widget's place on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    /// Render target the widget draws into.
    pub target: TargetId,
    /// Title shown in the panel border.
    pub title: String,
    /// Heatmap or sparkline.
    pub kind: WidgetKind,
}

/// Root application state for the TUI.
#[derive(Debug)]
pub struct App {
    /// Whether the app should continue running.
    pub running: bool,
    /// Current active view.
    pub current_view: View,
    /// Index of the selected panel.
    pub selected_index: usize,
    /// Panels in display order.
    pub panels: Vec<Panel>,
    widths: HashMap<TargetId, u16>,
}

impl App {
    /// Creates application state for `panels`.
    #[must_use]
    pub fn new(panels: Vec<Panel>) -> Self {
        Self {
            running: true,
            current_view: View::Dashboard,
            selected_index: 0,
            panels,
            widths: HashMap::new(),
        }
    }

    /// One panel per configured widget.
    #[must_use]
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(
            config
                .widgets
                .iter()
                .map(|w| Panel {
                    target: w.target.clone(),
                    title: w.title().to_string(),
                    kind: w.kind,
                })
                .collect(),
        )
    }

    /// Signals the app to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Currently selected panel.
    #[must_use]
    pub fn selected_panel(&self) -> Option<&Panel> {
        self.panels.get(self.selected_index)
    }

    /// Moves the selection down, wrapping at the end.
    pub fn select_next(&mut self) {
        if !self.panels.is_empty() {
            self.selected_index = (self.selected_index + 1) % self.panels.len();
        }
    }

    /// Moves the selection up, wrapping at the start.
    pub fn select_previous(&mut self) {
        if !self.panels.is_empty() {
            self.selected_index = self
                .selected_index
                .checked_sub(1)
                .unwrap_or(self.panels.len() - 1);
        }
    }

    /// Switches between the overview and the selected panel's detail.
    pub fn toggle_detail(&mut self) {
        self.current_view = match self.current_view {
            View::Dashboard if self.selected_panel().is_some() => View::Detail,
            View::Dashboard => View::Dashboard,
            View::Detail => View::Dashboard,
        };
    }

    /// Applies a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Char('q' | 'Q') => Action::Quit,
            KeyCode::Esc if self.current_view == View::Detail => {
                self.current_view = View::Dashboard;
                Action::None
            }
            KeyCode::Esc => Action::Quit,
            KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => {
                self.select_next();
                Action::None
            }
            KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => {
                self.select_previous();
                Action::None
            }
            KeyCode::Enter => {
                self.toggle_detail();
                Action::None
            }
            KeyCode::Char('r') => Action::Refresh,
            _ => Action::None,
        }
    }

    /// Remembers the column widths panels were drawn at.
    ///
    /// Returns `true` if any width differs from the previous frame.
    pub fn record_widths(&mut self, widths: &[(TargetId, u16)]) -> bool {
        let mut changed = false;
        for (target, cols) in widths {
            if self.widths.insert(target.clone(), *cols) != Some(*cols) {
                changed = true;
            }
        }
        changed
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crib_common::config::WidgetSpec;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let mut spark = WidgetSpec::new(WidgetKind::Spark, "sparkFiller", "rps", "web");
        spark.title = Some("Requests".into());
        App::from_config(&DashboardConfig {
            widgets: vec![WidgetSpec::new(WidgetKind::Heatmap, "heat", "cpu", "web"), spark],
            ..DashboardConfig::default()
        })
    }

    #[test]
    fn panels_follow_config() {
        let app = app();
        assert_eq!(app.panels.len(), 2);
        assert_eq!(app.panels[0].title, "cpu");
        assert_eq!(app.panels[1].title, "Requests");
        assert_eq!(app.panels[1].kind, WidgetKind::Spark);
    }

    #[test]
    fn selection_wraps_both_ways() {
        let mut app = app();
        app.select_previous();
        assert_eq!(app.selected_index, 1);
        app.select_next();
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.handle_key(key(KeyCode::Down)), Action::None);
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn selection_on_empty_dashboard_is_a_no_op() {
        let mut app = App::default();
        app.select_next();
        app.select_previous();
        app.toggle_detail();
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.current_view, View::Dashboard);
    }

    #[test]
    fn enter_and_escape_move_between_views() {
        let mut app = app();
        let _ = app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.current_view, View::Detail);
        assert_eq!(app.handle_key(key(KeyCode::Esc)), Action::None);
        assert_eq!(app.current_view, View::Dashboard);
        assert_eq!(app.handle_key(key(KeyCode::Esc)), Action::Quit);
    }

    #[test]
    fn quit_and_refresh_keys() {
        let mut app = app();
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(app.handle_key(key(KeyCode::Char('r'))), Action::Refresh);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(ctrl_c), Action::Quit);
        app.quit();
        assert!(!app.running);
    }

    #[test]
    fn width_changes_are_detected() {
        let mut app = app();
        let heat = TargetId::new("heat");
        assert!(app.record_widths(&[(heat.clone(), 80)]));
        assert!(!app.record_widths(&[(heat.clone(), 80)]));
        assert!(app.record_widths(&[(heat, 100)]));
    }
}
