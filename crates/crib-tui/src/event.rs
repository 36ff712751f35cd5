//! Terminal event handling.
//!
//! A dedicated thread polls the terminal for key and resize events and
//! forwards them to the async event loop, emitting a tick whenever nothing
//! happened within the tick rate so the screen keeps repainting.

use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;

/// Terminal input events.
#[derive(Debug, Clone)]
pub enum TerminalEvent {
    /// A key was pressed.
    Key(crossterm::event::KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// A periodic tick for UI refresh.
    Tick,
}

/// Starts the reader thread; it exits once the receiver is dropped.
pub fn spawn_reader(tick_rate: Duration) -> mpsc::UnboundedReceiver<TerminalEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    let _ = std::thread::Builder::new()
        .name("crib-input".into())
        .spawn(move || {
            loop {
                let next = match event::poll(tick_rate) {
                    Ok(true) => match event::read() {
                        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => TerminalEvent::Key(key),
                        Ok(Event::Resize(cols, rows)) => TerminalEvent::Resize(cols, rows),
                        Ok(_) => continue,
                        Err(e) => {
                            tracing::error!(error = %e, "failed to read terminal event");
                            break;
                        }
                    },
                    Ok(false) => TerminalEvent::Tick,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to poll terminal");
                        break;
                    }
                };
                if tx.send(next).is_err() {
                    break;
                }
            }
        })
        .map_err(|e| tracing::error!(error = %e, "failed to start input thread"));
    rx
}
