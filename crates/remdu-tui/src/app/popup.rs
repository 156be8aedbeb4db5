//! Modal popup state for confirmations and notices.

/// A destructive action staged behind the confirm menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    /// Delete the entry at this underlying (pre-sort) index.
    DeleteSingle { index: usize },
    /// Delete every entry in the selection set.
    DeleteSelected,
}

pub const MENU_CANCEL: usize = 0;
pub const MENU_CONFIRM: usize = 1;

/// The cancel/confirm option row of a staged popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupMenu {
    pub options: [&'static str; 2],
    pub selected: usize,
    pub action: PendingAction,
}

impl PopupMenu {
    /// Stage `action` with "cancel" pre-selected.
    pub fn new(action: PendingAction) -> Self {
        Self {
            options: ["cancel", "confirm"],
            selected: MENU_CANCEL,
            action,
        }
    }

    /// Move the highlight left or right, clamped, no wraparound.
    pub fn shift(&mut self, delta: isize) {
        let target = self.selected as isize + delta;
        self.selected = target.clamp(0, self.options.len() as isize - 1) as usize;
    }
}

/// A centered popup: informational when `menu` is `None`, a staged
/// confirmable action otherwise.
#[derive(Debug)]
pub struct Popup {
    pub text: Vec<String>,
    pub menu: Option<PopupMenu>,
}

impl Popup {
    /// Informational popup, dismissed by the close keys.
    pub fn notice(text: Vec<String>) -> Self {
        Self { text, menu: None }
    }

    /// Confirmable popup staging `action`.
    pub fn staged(text: Vec<String>, action: PendingAction) -> Self {
        Self {
            text,
            menu: Some(PopupMenu::new(action)),
        }
    }
}
