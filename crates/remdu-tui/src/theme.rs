//! Color scheme for the TUI.

use ratatui::style::Color;

/// Colors used by the renderer.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub header_fg: Color,
    pub header_bg: Color,
    /// Rows whose subtree had read errors.
    pub warning: Color,
    /// Rows that could not be read at all.
    pub error: Color,
    /// Multi-selected rows.
    pub selected: Color,
    pub popup_fg: Color,
    pub popup_bg: Color,
    pub popup_title: Color,
}

impl Theme {
    /// The classic white-on-black scheme.
    pub fn dark() -> Self {
        Self {
            background: Color::Black,
            text: Color::White,
            header_fg: Color::Black,
            header_bg: Color::White,
            warning: Color::Yellow,
            error: Color::Red,
            selected: Color::LightYellow,
            popup_fg: Color::Black,
            popup_bg: Color::White,
            popup_title: Color::Red,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
