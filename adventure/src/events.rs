//! Event handling for the adventure TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Screen, PAN_STEP};

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    // Any key press dismisses the last message
    app.clear_status();

    let result = match app.screen {
        Screen::Library => handle_library_key(app, key),
        Screen::Tree => handle_tree_key(app, key),
        Screen::Reader => handle_reader_key(app, key),
    };

    if app.should_quit {
        EventResult::Quit
    } else {
        result
    }
}

fn handle_library_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.go_back();
            EventResult::Quit
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.select_next_story();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_prev_story();
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            app.request_open();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('r') => {
            app.pending_reload = true;
            EventResult::NeedsRedraw
        }
        KeyCode::Char('u') => {
            app.refresh_user_name();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

fn handle_tree_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.go_back();
            EventResult::NeedsRedraw
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.pan_by(-PAN_STEP, 0);
            EventResult::NeedsRedraw
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.pan_by(PAN_STEP, 0);
            EventResult::NeedsRedraw
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.pan_by(0, -PAN_STEP / 2);
            EventResult::NeedsRedraw
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.pan_by(0, PAN_STEP / 2);
            EventResult::NeedsRedraw
        }
        KeyCode::Tab => {
            app.cycle_node(true);
            EventResult::NeedsRedraw
        }
        KeyCode::BackTab => {
            app.cycle_node(false);
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            app.start_reading();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

fn handle_reader_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.go_back();
            EventResult::NeedsRedraw
        }
        KeyCode::Char(c @ '1'..='9') => {
            // Choices are numbered from one on screen
            let index = c as usize - '1' as usize;
            app.choose(index);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('b') | KeyCode::Backspace => {
            app.step_back();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('r') => {
            app.restart();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adventure_core::testing::sample_story;
    use adventure_core::{AdventureConfig, ReadingSession};

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app_with_story() -> App {
        let mut app = App::new(AdventureConfig::new());
        let (story, fragments) = sample_story();
        app.open_session(ReadingSession::new(story, fragments).unwrap());
        app
    }

    #[test]
    fn test_ctrl_c_quits_anywhere() {
        let mut app = app_with_story();
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(handle_event(&mut app, ev), EventResult::Quit);
    }

    #[test]
    fn test_tree_to_reader_and_choose() {
        let mut app = app_with_story();
        handle_event(&mut app, press(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Reader);

        handle_event(&mut app, press(KeyCode::Char('2')));
        assert_eq!(
            app.session().unwrap().current().story_text(),
            "You drop into an overgrown garden."
        );

        handle_event(&mut app, press(KeyCode::Char('b')));
        assert_eq!(app.session().unwrap().path().len(), 1);
    }

    #[test]
    fn test_enter_reads_selected_node() {
        let mut app = app_with_story();
        handle_event(&mut app, press(KeyCode::Tab));
        let selected = app.layout().selected().unwrap().fragment_id();
        assert_ne!(Some(selected), app.session().unwrap().story().head_fragment_id());

        handle_event(&mut app, press(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Reader);
        assert_eq!(app.session().unwrap().current().id, selected);
        assert_eq!(app.layout().selected().unwrap().fragment_id(), selected);

        // Back returns to the start of the story
        handle_event(&mut app, press(KeyCode::Char('b')));
        assert_eq!(
            Some(app.session().unwrap().current().id),
            app.session().unwrap().story().head_fragment_id()
        );
    }

    #[test]
    fn test_tree_panning_keys() {
        let mut app = app_with_story();
        handle_event(&mut app, press(KeyCode::Right));
        handle_event(&mut app, press(KeyCode::Char('j')));
        assert_eq!(app.pan, (PAN_STEP, PAN_STEP / 2));

        handle_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.pan, (0, 0));
    }

    #[test]
    fn test_escape_walks_back_to_quit() {
        let mut app = app_with_story();
        assert_eq!(handle_event(&mut app, press(KeyCode::Esc)), EventResult::NeedsRedraw);
        assert_eq!(app.screen, Screen::Library);
        assert_eq!(handle_event(&mut app, press(KeyCode::Esc)), EventResult::Quit);
    }

    #[test]
    fn test_library_reload_key() {
        let mut app = App::new(AdventureConfig::new());
        app.pending_reload = false;
        handle_event(&mut app, press(KeyCode::Char('r')));
        assert!(app.pending_reload);
    }
}
