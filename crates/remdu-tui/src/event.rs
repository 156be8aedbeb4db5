//! Key decoding for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    // Navigation
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    /// Left: ascend, or move the popup menu highlight left.
    MoveLeft,
    /// Right: enter the cursor entry, or move the popup menu highlight right.
    MoveRight,
    /// Enter: confirm the popup menu, or enter the cursor entry.
    Confirm,

    // Display toggles
    ToggleCounts,
    ToggleGraph,
    ToggleAverage,
    ToggleHumanReadable,

    // Sorting
    SortByName,
    SortBySize,
    SortByCount,
    SortByAverageSize,

    // Selection
    ToggleSelect,
    ToggleVisualSelect,

    // Destructive operations
    Delete,
    DeleteSelected,

    // Path helpers
    CopyPath,
    DisplayPath,

    // Other
    Help,
    Refresh,
    Quit,

    // No action
    None,
}

impl KeyAction {
    /// Convert a key event to an action.
    pub fn from_key_event(event: KeyEvent) -> Self {
        match (event.code, event.modifiers) {
            // Quit - also dismisses a showing popup
            (KeyCode::Esc, _) => KeyAction::Quit,
            (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,

            // Navigation - vim style and arrow keys
            (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::MoveDown,
            (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::MoveUp,
            (KeyCode::Char('h'), KeyModifiers::NONE) => KeyAction::MoveLeft,
            (KeyCode::Char('l'), KeyModifiers::NONE) => KeyAction::MoveRight,
            (KeyCode::Down, _) => KeyAction::MoveDown,
            (KeyCode::Up, _) => KeyAction::MoveUp,
            (KeyCode::Left, _) => KeyAction::MoveLeft,
            (KeyCode::Right, _) => KeyAction::MoveRight,
            (KeyCode::Enter, _) => KeyAction::Confirm,

            // Page navigation
            (KeyCode::PageDown, _) => KeyAction::PageDown,
            (KeyCode::PageUp, _) => KeyAction::PageUp,
            (KeyCode::Char('-'), KeyModifiers::NONE) => KeyAction::PageDown,
            (KeyCode::Char('_'), KeyModifiers::SHIFT) => KeyAction::PageDown,
            (KeyCode::Char('='), KeyModifiers::NONE) => KeyAction::PageUp,
            (KeyCode::Char('+'), KeyModifiers::SHIFT) => KeyAction::PageUp,

            // Display toggles
            (KeyCode::Char('c'), KeyModifiers::NONE) => KeyAction::ToggleCounts,
            (KeyCode::Char('g'), KeyModifiers::NONE) => KeyAction::ToggleGraph,
            (KeyCode::Char('a'), KeyModifiers::NONE) => KeyAction::ToggleAverage,
            (KeyCode::Char('u'), KeyModifiers::NONE) => KeyAction::ToggleHumanReadable,

            // Sorting
            (KeyCode::Char('n'), KeyModifiers::NONE) => KeyAction::SortByName,
            (KeyCode::Char('s'), KeyModifiers::NONE) => KeyAction::SortBySize,
            (KeyCode::Char('C'), KeyModifiers::SHIFT) => KeyAction::SortByCount,
            (KeyCode::Char('A'), KeyModifiers::SHIFT) => KeyAction::SortByAverageSize,

            // Selection
            (KeyCode::Char('v'), KeyModifiers::NONE) => KeyAction::ToggleSelect,
            (KeyCode::Char('V'), KeyModifiers::SHIFT) => KeyAction::ToggleVisualSelect,

            // Destructive operations
            (KeyCode::Char('d'), KeyModifiers::NONE) => KeyAction::Delete,
            (KeyCode::Char('D'), KeyModifiers::SHIFT) => KeyAction::DeleteSelected,

            // Path helpers
            (KeyCode::Char('y'), KeyModifiers::NONE) => KeyAction::CopyPath,
            (KeyCode::Char('Y'), KeyModifiers::SHIFT) => KeyAction::DisplayPath,

            // Other
            (KeyCode::Char('?'), _) => KeyAction::Help,
            (KeyCode::Char('l'), KeyModifiers::CONTROL) => KeyAction::Refresh,

            _ => KeyAction::None,
        }
    }
}
