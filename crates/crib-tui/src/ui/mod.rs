//! Rendering of the dashboard views.

pub mod dashboard;
pub mod detail;
pub mod heatmap;
pub mod scene;
pub mod spark;

use crib_common::types::{TargetId, WidgetStatus};
use crib_core::surface::SceneStore;
use ratatui::Frame;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::app::{App, View};

/// Scene units represented by one terminal column.
pub const PX_PER_COLUMN: f64 = 8.0;

/// Renders the active view.
///
/// Returns the column width every heatmap was drawn at, for reporting back
/// to the render surface.
pub fn render(frame: &mut Frame, app: &App, store: &SceneStore) -> Vec<(TargetId, u16)> {
    match app.current_view {
        View::Dashboard => dashboard::render_dashboard(frame, app, store),
        View::Detail => detail::render_detail(frame, app, store),
    }
}

/// Short, colored description of a widget's freshness.
pub fn status_span(status: &WidgetStatus) -> Span<'static> {
    match status {
        WidgetStatus::Pending => Span::styled("waiting", Style::default().fg(Color::DarkGray)),
        WidgetStatus::Live { updated_at } => Span::styled(
            format!("live {}", updated_at.format("%H:%M:%S")),
            Style::default().fg(Color::Green),
        ),
        WidgetStatus::Stale { reason, .. } => Span::styled(
            format!("stale: {reason}"),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        WidgetStatus::Empty => Span::styled("no data", Style::default().fg(Color::DarkGray)),
    }
}

/// Border style of a panel.
pub fn border_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}
