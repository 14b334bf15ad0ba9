//! Terminal UI
//!
//! Built with ratatui. Keyboard-first navigation throughout.

pub mod render;
pub mod theme;

pub use render::render_ui;
pub use theme::Theme;
