//! Heatmap panel: the scaled grid with its axes and counter.

use crib_common::constants::COUNT_LABEL;
use crib_core::surface::SceneStore;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::scene::SceneView;
use super::{border_style, status_span};
use crate::app::Panel;

/// Rows a heatmap panel takes on the dashboard, borders included.
pub const HEATMAP_ROWS: u16 = 12;

/// Renders one heatmap panel and returns the column width of its plot.
pub fn render_heatmap(frame: &mut Frame, area: Rect, panel: &Panel, store: &SceneStore, selected: bool) -> u16 {
    let count = store
        .text(&panel.target.label(COUNT_LABEL))
        .unwrap_or_else(|| "-".into());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(selected))
        .title(format!(" {} ", panel.title))
        .title(
            Line::from(vec![
                Span::raw(" "),
                status_span(&store.status(&panel.target)),
                Span::styled(format!("  count {count} "), Style::default().fg(Color::White)),
            ])
            .right_aligned(),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match store.scene(&panel.target) {
        Some(scene) => frame.render_widget(SceneView::new(&scene), inner),
        None => frame.render_widget(
            Paragraph::new("waiting for data").style(Style::default().fg(Color::DarkGray)),
            inner,
        ),
    }
    inner.width
}
