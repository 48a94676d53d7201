use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};
use crate::util::unicode;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor_up(),
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.cursor = app.visible_tasks().len().saturating_sub(1);
        }
        KeyCode::Char('m') => app.cycle_route(),
        KeyCode::Char('n') => app.open_create_form(),
        KeyCode::Char('e') | KeyCode::Enter => app.open_edit_form(),
        KeyCode::Char('/') => {
            app.mode = Mode::Search;
            app.search_input.clear();
        }
        KeyCode::Esc => {
            // Esc clears an applied search filter
            if app.last_search.take().is_some() {
                app.clamp_cursor();
            }
        }
        _ => {}
    }
}

pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.mode = Mode::Navigate;
            app.search_input.clear();
        }
        KeyCode::Enter => {
            app.last_search = if app.search_input.is_empty() {
                None
            } else {
                Some(std::mem::take(&mut app.search_input))
            };
            app.mode = Mode::Navigate;
            app.cursor = 0;
        }
        KeyCode::Backspace => unicode::pop_grapheme(&mut app.search_input),
        KeyCode::Char(c) => app.search_input.push(c),
        _ => {}
    }
}
