//! Color palette and style helpers for the TUI

use ratatui::style::{Color, Modifier, Style};

/// Amber-on-slate palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #11131a
    pub const BACKGROUND: Color = Color::Rgb(0x11, 0x13, 0x1a);

    /// Primary: #ffb000 (amber)
    pub const PRIMARY: Color = Color::Rgb(0xff, 0xb0, 0x00);

    /// Secondary: #4fd1c5 (teal), used for sources
    pub const SECONDARY: Color = Color::Rgb(0x4f, 0xd1, 0xc5);

    /// Accent: #ffd75f (gold), used for the top result star
    pub const ACCENT: Color = Color::Rgb(0xff, 0xd7, 0x5f);

    /// Text: #e4e4e7
    pub const TEXT: Color = Color::Rgb(0xe4, 0xe4, 0xe7);

    /// Dim: #6b7080
    pub const DIM: Color = Color::Rgb(0x6b, 0x70, 0x80);

    /// Success: #5fd75f
    pub const SUCCESS: Color = Color::Rgb(0x5f, 0xd7, 0x5f);

    /// Error: #ff5f5f
    pub const ERROR: Color = Color::Rgb(0xff, 0x5f, 0x5f);

    /// Panels and the status bar
    pub const BACKGROUND_LIGHT: Color = Color::Rgb(0x1c, 0x1f, 0x2a);

    /// Unfocused borders
    pub const BORDER: Color = Color::Rgb(0x80, 0x5a, 0x10);

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    /// Selected list row
    pub fn highlighted() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR).add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS).add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Style::default().fg(Self::PRIMARY).add_modifier(Modifier::BOLD)
    }

    /// Source names next to titles
    pub fn source() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    /// "★ Top Result" marker
    pub fn top_result() -> Style {
        Style::default().fg(Self::ACCENT).add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY).add_modifier(Modifier::BOLD)
    }

    /// Download gauge
    pub fn gauge() -> Style {
        Style::default().fg(Self::SUCCESS).bg(Self::BACKGROUND_LIGHT)
    }

    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    pub fn keybind() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    pub fn loading() -> Style {
        Style::default().fg(Self::PRIMARY).add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_inverts_primary() {
        let style = Theme::highlighted();
        assert_eq!(style.fg, Some(Theme::BACKGROUND));
        assert_eq!(style.bg, Some(Theme::PRIMARY));
    }

    #[test]
    fn test_top_result_is_bold_accent() {
        let style = Theme::top_result();
        assert_eq!(style.fg, Some(Theme::ACCENT));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }
}
