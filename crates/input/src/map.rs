//! Key events to game events, driven by the configured binding list.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::{GameEvent, KeyBindings};

/// Map a key press to the event its character is bound to.
///
/// Only plain character keys are compared against the bindings; everything
/// else (arrows, function keys, modified keys) is unbound by design — the
/// binding list is the single source of truth.
pub fn map_key(key: KeyEvent, bindings: &KeyBindings) -> Option<GameEvent> {
    if !key.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
        return None;
    }
    match key.code {
        KeyCode::Char(c) => bindings.event_for(c),
        _ => None,
    }
}

/// Ctrl-C always quits, regardless of the binding list.
pub fn is_force_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}
