//! Terminal input forwarding.
//!
//! A background task reads crossterm events and sends the ones the UI cares
//! about over a channel, so the main loop only wakes up when something
//! happened.

use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, MouseEvent, MouseEventKind};
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// The terminal changed size; only a redraw is needed.
    Resize,
}

impl AppEvent {
    fn from_crossterm(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) => Some(Self::Key(key)),
            // Plain moves would redraw on every twitch of the mouse.
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Moved => None,
            Event::Mouse(mouse) => Some(Self::Mouse(mouse)),
            Event::Resize(_, _) => Some(Self::Resize),
            _ => None,
        }
    }
}

/// Starts the reader task.  `poll_interval` bounds how long the task waits
/// before noticing that the receiver is gone.
pub fn spawn_event_reader(poll_interval: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || {
        while !tx.is_closed() {
            match event::poll(poll_interval) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    tracing::warn!("terminal poll failed: {err}");
                    break;
                }
            }
            let Some(app_event) = event::read().ok().and_then(AppEvent::from_crossterm) else {
                continue;
            };
            if tx.send(app_event).is_err() {
                break;
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn mouse_moves_and_focus_changes_are_dropped() {
        let moved = MouseEvent {
            kind: MouseEventKind::Moved,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        assert!(AppEvent::from_crossterm(Event::Mouse(moved)).is_none());
        assert!(AppEvent::from_crossterm(Event::FocusGained).is_none());

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(matches!(AppEvent::from_crossterm(Event::Key(key)), Some(AppEvent::Key(_))));
        assert!(matches!(AppEvent::from_crossterm(Event::Resize(80, 24)), Some(AppEvent::Resize)));
    }
}
