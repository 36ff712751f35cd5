//! Main dashboard layout.
//!
//! Stacks every panel in configuration order, scrolling so the selected
//! panel stays visible, above a footer with the key bindings.

use crib_common::types::{TargetId, WidgetKind};
use crib_core::surface::SceneStore;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::heatmap::{HEATMAP_ROWS, render_heatmap};
use super::spark::{SPARK_ROWS, render_spark};
use crate::app::{App, Panel};

const fn panel_rows(panel: &Panel) -> u16 {
    match panel.kind {
        WidgetKind::Heatmap => HEATMAP_ROWS,
        WidgetKind::Spark => SPARK_ROWS,
    }
}

/// Index of the first panel to draw so that `selected` fits in `height`.
pub fn first_visible(panels: &[Panel], selected: usize, height: u16) -> usize {
    let mut first = 0;
    while first < selected {
        let needed: u32 = panels[first..=selected.min(panels.len().saturating_sub(1))]
            .iter()
            .map(|p| u32::from(panel_rows(p)))
            .sum();
        if needed <= u32::from(height) {
            break;
        }
        first += 1;
    }
    first
}

/// Renders the main dashboard view.
pub fn render_dashboard(frame: &mut Frame, app: &App, store: &SceneStore) -> Vec<(TargetId, u16)> {
    let [content, footer] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());
    render_footer(frame, footer, app);

    if app.panels.is_empty() {
        frame.render_widget(
            Paragraph::new("no widgets configured").style(Style::default().fg(Color::DarkGray)),
            content,
        );
        return Vec::new();
    }

    let first = first_visible(&app.panels, app.selected_index, content.height);
    let mut widths = Vec::new();
    let mut y = content.y;
    for (index, panel) in app.panels.iter().enumerate().skip(first) {
        let rows = panel_rows(panel);
        if y + rows > content.bottom() {
            break;
        }
        let area = Rect::new(content.x, y, content.width, rows);
        let selected = index == app.selected_index;
        match panel.kind {
            WidgetKind::Heatmap => {
                let cols = render_heatmap(frame, area, panel, store, selected);
                widths.push((panel.target.clone(), cols));
            }
            WidgetKind::Spark => render_spark(frame, area, panel, store, selected),
        }
        y += rows;
    }
    widths
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let text = Style::default().fg(Color::Gray);
    let line = Line::from(vec![
        Span::styled("[q]", key),
        Span::styled(" quit  ", text),
        Span::styled("[\u{2191}\u{2193}]", key),
        Span::styled(" select  ", text),
        Span::styled("[enter]", key),
        Span::styled(" detail  ", text),
        Span::styled("[r]", key),
        Span::styled(" refresh  ", text),
        Span::styled(format!("{} widgets", app.panels.len()), text),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
