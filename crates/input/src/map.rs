//! Key mapping from terminal events to game actions.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to game actions.
///
/// Space is the touch surface: press is a touch start and, on terminals that
/// report it, release is a touch end. Every other key acts on press only.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if key.kind == KeyEventKind::Release {
        return match key.code {
            KeyCode::Char(' ') => Some(GameAction::TouchEnd),
            _ => None,
        };
    }

    match key.code {
        // Touch
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(GameAction::TouchStart)
        }
        KeyCode::Char('g') | KeyCode::Char('G') | KeyCode::Down => Some(GameAction::GravitySwitch),

        // World rotation
        KeyCode::Char(']') | KeyCode::Char('e') | KeyCode::Char('E') => Some(GameAction::RotateCw),
        KeyCode::Char('[') => Some(GameAction::RotateCcw),

        // Lifecycle
        KeyCode::Enter => Some(GameAction::Start),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Some(GameAction::Pause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(GameAction::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
