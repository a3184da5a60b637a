use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::edit::modal::{CLOSE_ID, SUBMIT_ID};
use crate::tui::app::{App, MODAL_CONTROLS};
use crate::util::text::pop_grapheme;

pub(super) fn handle_modal(app: &mut App, key: KeyEvent, now: Instant) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => app.click_control(CLOSE_ID, now),
        (KeyModifiers::CONTROL, KeyCode::Char('s')) => app.click_control(SUBMIT_ID, now),
        (_, KeyCode::Tab) | (_, KeyCode::Down) => move_focus(app, 1),
        (_, KeyCode::BackTab) | (_, KeyCode::Up) => move_focus(app, MODAL_CONTROLS.len() - 1),
        (_, KeyCode::Enter) => {
            if app.focused_is_input() {
                move_focus(app, 1);
            } else {
                let id = MODAL_CONTROLS[app.focus];
                app.click_control(id, now);
            }
        }
        (_, KeyCode::Backspace) => app.edit_focused(now, pop_grapheme),
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            app.edit_focused(now, |value| value.push(c));
        }
        _ => {}
    }
}

fn move_focus(app: &mut App, step: usize) {
    app.focus = (app.focus + step) % MODAL_CONTROLS.len();
}
