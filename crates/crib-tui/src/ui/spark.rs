//! Sparkline panel: bars plus p99, last and max.

use crib_common::constants::{LAST_LABEL, MAX_LABEL, P99_LABEL, SPARK_WIDTH};
use crib_core::surface::SceneStore;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::scene::SceneView;
use super::{PX_PER_COLUMN, border_style, status_span};
use crate::app::Panel;

/// Rows a sparkline panel takes on the dashboard, borders included.
pub const SPARK_ROWS: u16 = 4;

/// Columns of the sparkline bars at their natural width.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const SPARK_COLUMNS: u16 = (SPARK_WIDTH / PX_PER_COLUMN) as u16 + 1;

/// The label line: `p99 N  last N  max N`.
pub fn summary_line(panel: &Panel, store: &SceneStore) -> Line<'static> {
    let value = |suffix: &str| store.text(&panel.target.label(suffix)).unwrap_or_else(|| "-".into());
    let bold = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::Gray);
    Line::from(vec![
        Span::styled("p99 ", dim),
        Span::styled(value(P99_LABEL), bold),
        Span::styled("  last ", dim),
        Span::styled(value(LAST_LABEL), bold),
        Span::styled("  max ", dim),
        Span::styled(value(MAX_LABEL), bold),
    ])
}

/// Renders one sparkline panel.
pub fn render_spark(frame: &mut Frame, area: Rect, panel: &Panel, store: &SceneStore, selected: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(selected))
        .title(format!(" {} ", panel.title))
        .title(
            Line::from(vec![
                Span::raw(" "),
                status_span(&store.status(&panel.target)),
                Span::raw(" "),
            ])
            .right_aligned(),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [bars, _, labels] = Layout::horizontal([
        Constraint::Length(SPARK_COLUMNS),
        Constraint::Length(2),
        Constraint::Min(0),
    ])
    .areas(inner);

    if let Some(scene) = store.scene(&panel.target) {
        frame.render_widget(SceneView::new(&scene), bars);
    }
    frame.render_widget(Paragraph::new(summary_line(panel, store)), labels);
}
