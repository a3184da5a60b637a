use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;

pub(super) fn handle_browse(app: &mut App, key: KeyEvent, now: Instant) {
    let count = app.post_cards().len();
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('q'))
        | (KeyModifiers::CONTROL, KeyCode::Char('c')) => app.quit(),
        (_, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
            if app.cursor + 1 < count {
                app.cursor += 1;
            }
        }
        (_, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        (_, KeyCode::Home) | (KeyModifiers::NONE, KeyCode::Char('g')) => {
            app.cursor = 0;
        }
        (_, KeyCode::End) | (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('G')) => {
            app.cursor = count.saturating_sub(1);
        }
        (_, KeyCode::Enter) | (KeyModifiers::NONE, KeyCode::Char('e')) => {
            app.open_selected(now);
        }
        _ => {}
    }
}
