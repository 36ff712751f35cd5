//! The interactive event loop.
//!
//! Redraws on every terminal event or tick. After each frame the heatmap
//! panel widths are compared with the previous frame; any change is written
//! to the scene store and announced through the resize signal, so every
//! widget re-renders at its new size.

use std::sync::Arc;
use std::time::Duration;

use crib_core::surface::SceneStore;
use crib_runtime::scheduler::ResizeSignal;
use ratatui::DefaultTerminal;

use crate::app::{Action, App};
use crate::error::TuiError;
use crate::event::{self, TerminalEvent};
use crate::ui::{self, PX_PER_COLUMN};

/// Takes over the terminal and runs the dashboard until the user quits.
///
/// # Errors
///
/// Returns [`TuiError::Terminal`] if the terminal cannot be initialized or
/// drawn to. The terminal is restored in either case.
pub async fn run(mut app: App, store: Arc<SceneStore>, resize: ResizeSignal, tick_rate: Duration) -> Result<(), TuiError> {
    let mut terminal = ratatui::try_init()?;
    tracing::debug!(panels = app.panels.len(), "terminal initialized");
    let result = event_loop(&mut terminal, &mut app, &store, &resize, tick_rate).await;
    ratatui::restore();
    result
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    store: &SceneStore,
    resize: &ResizeSignal,
    tick_rate: Duration,
) -> Result<(), TuiError> {
    let mut events = event::spawn_reader(tick_rate);
    while app.running {
        let mut widths = Vec::new();
        let _ = terminal.draw(|frame| widths = ui::render(frame, app, store))?;
        if app.record_widths(&widths) {
            for (target, cols) in &widths {
                store.set_width(target, f64::from(*cols) * PX_PER_COLUMN);
            }
            resize.fire();
        }

        match events.recv().await {
            Some(TerminalEvent::Key(key)) => match app.handle_key(key) {
                Action::Quit => app.quit(),
                Action::Refresh => resize.fire(),
                Action::None => {}
            },
            Some(TerminalEvent::Resize(cols, rows)) => tracing::debug!(cols, rows, "terminal resized"),
            Some(TerminalEvent::Tick) => {}
            None => app.quit(),
        }
    }
    Ok(())
}
