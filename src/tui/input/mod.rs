mod browse;
mod modal;

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Mode};

use browse::handle_browse;
use modal::handle_modal;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    match app.mode() {
        Mode::Browse => handle_browse(app, key, now),
        Mode::Modal => handle_modal(app, key, now),
    }
}
