//! Styles and glyphs, all driven by the configured palette.
//!
//! Design principles:
//! - **No hardcoded backgrounds.** Every style omits `.bg()` so the
//!   terminal's native background shines through.
//! - One loud accent (marquee red) for titles and the focused card, one
//!   warm secondary for ratings and years.

use ratatui::style::{Color, Modifier, Style};

use crate::config::{self, Palette};

fn palette() -> Palette {
    config::get().theme.palette
}

pub fn accent() -> Color {
    palette().accent_primary
}

pub fn secondary() -> Color {
    palette().accent_secondary
}

pub fn text_dim() -> Color {
    palette().text_dim
}

// ─── Composite styles ───────────────────────────────────────────────────────

/// Title / header style.
pub fn title() -> Style {
    Style::default().fg(accent()).add_modifier(Modifier::BOLD)
}

/// Normal body text.
pub fn text() -> Style {
    Style::default().fg(palette().text_primary)
}

/// Dimmed / secondary label.
pub fn dim() -> Style {
    Style::default().fg(palette().text_dim)
}

/// Bold label in front of a detail value ("Director:").
pub fn label() -> Style {
    Style::default()
        .fg(palette().text_primary)
        .add_modifier(Modifier::BOLD)
}

/// Year and rating highlights.
pub fn highlight() -> Style {
    Style::default().fg(secondary())
}

pub fn error() -> Style {
    Style::default()
        .fg(palette().accent_error)
        .add_modifier(Modifier::BOLD)
}

/// Border of the focused card and the detail panel.
pub fn border_active() -> Style {
    Style::default().fg(accent())
}

pub fn border_inactive() -> Style {
    Style::default().fg(palette().border_inactive)
}

/// Label of the focused card.
pub fn selected() -> Style {
    Style::default()
        .fg(accent())
        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
}

// ─── Glyphs ─────────────────────────────────────────────────────────────────

pub const POSTER_ICON: &str = "󰿎";
pub const FILM_ICON: &str = "󰎁";
pub const CLOSE_BUTTON: &str = "[x]";

/// Braille-dot spinner frames for the loading animation.
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Get the current spinner frame for a given tick count.
pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick as usize) % SPINNER_FRAMES.len()]
}
