//! Detail view: the selected widget across the whole screen.

use crib_common::types::{TargetId, WidgetKind};
use crib_core::surface::SceneStore;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::heatmap::render_heatmap;
use super::spark::{render_spark, summary_line};
use super::status_span;
use crate::app::App;

/// Renders the selected panel full screen.
pub fn render_detail(frame: &mut Frame, app: &App, store: &SceneStore) -> Vec<(TargetId, u16)> {
    let Some(panel) = app.selected_panel() else {
        return Vec::new();
    };
    let [body, info] = Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(frame.area());

    let widths = match panel.kind {
        WidgetKind::Heatmap => vec![(panel.target.clone(), render_heatmap(frame, body, panel, store, true))],
        WidgetKind::Spark => {
            render_spark(frame, body, panel, store, true);
            Vec::new()
        }
    };

    let dim = Style::default().fg(Color::Gray);
    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{} ({}) ", panel.target, panel.kind), dim),
        status_span(&store.status(&panel.target)),
    ])];
    if panel.kind == WidgetKind::Spark {
        lines.push(summary_line(panel, store));
    }
    lines.push(Line::from(Span::styled("[esc] back  [q] quit", dim)));
    frame.render_widget(Paragraph::new(lines), info);
    widths
}
