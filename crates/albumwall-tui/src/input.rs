use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Start,
    ToggleStatusBar,
    GrowCells,
    ShrinkCells,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Start is always forwarded so a second request can be reported
        (KeyCode::Char('s'), KeyModifiers::NONE) => Action::Start,
        (KeyCode::Char(' '), KeyModifiers::NONE) => Action::Start,

        (KeyCode::Char('b'), KeyModifiers::NONE) => Action::ToggleStatusBar,

        // Cell size ('+' arrives with SHIFT on most layouts)
        (KeyCode::Char('+'), _) | (KeyCode::Char('='), KeyModifiers::NONE) => Action::GrowCells,
        (KeyCode::Char('-'), KeyModifiers::NONE) => {
            if app.cell_size > App::MIN_CELL_SIZE {
                Action::ShrinkCells
            } else {
                Action::None
            }
        }

        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use albumwall_core::AppConfig;
    use std::sync::Arc;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn app() -> App {
        App::new(Arc::new(AppConfig::default()), 3)
    }

    #[test]
    fn test_quit_keys() {
        let app = app();
        for event in [
            key(KeyCode::Char('q'), KeyModifiers::NONE),
            key(KeyCode::Esc, KeyModifiers::NONE),
            key(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            assert_eq!(handle_key_event(event, &app), Action::Quit);
        }
    }

    #[test]
    fn test_start_keys_forwarded_when_running() {
        let mut app = app();
        app.started = true;
        assert_eq!(
            handle_key_event(key(KeyCode::Char('s'), KeyModifiers::NONE), &app),
            Action::Start
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char(' '), KeyModifiers::NONE), &app),
            Action::Start
        );
    }

    #[test]
    fn test_cell_size_keys() {
        let mut app = app();
        assert_eq!(
            handle_key_event(key(KeyCode::Char('+'), KeyModifiers::SHIFT), &app),
            Action::GrowCells
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('-'), KeyModifiers::NONE), &app),
            Action::ShrinkCells
        );

        app.cell_size = App::MIN_CELL_SIZE;
        assert_eq!(
            handle_key_event(key(KeyCode::Char('-'), KeyModifiers::NONE), &app),
            Action::None
        );
    }

    #[test]
    fn test_unbound_key() {
        let app = app();
        assert_eq!(
            handle_key_event(key(KeyCode::Char('x'), KeyModifiers::NONE), &app),
            Action::None
        );
    }
}
