//! Persistent key instruction bar at the bottom of the screen.
//!
//! Shows context-aware keybindings that adapt to what has focus: the card
//! grid, the detail panel, or the help overlay.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, View};
use crate::config::{self, key_label, KeybindingsConfig};
use crate::theme;

/// Render the key-hint bar into the given area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let keys = &config::get().keys;
    let spans = if app.show_help {
        help_hints(keys)
    } else if app.modal.is_open() {
        detail_hints(keys)
    } else {
        grid_hints(app.view() == View::Grid, keys)
    };

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Key style: accented, bold.
fn key(s: impl Into<String>) -> Span<'static> {
    Span::styled(
        s.into(),
        Style::default().fg(theme::accent()).add_modifier(Modifier::BOLD),
    )
}

/// Description style: dimmed.
fn desc(s: &'static str) -> Span<'static> {
    Span::styled(s, Style::default().fg(theme::text_dim()))
}

/// Separator between groups.
fn sep() -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme::secondary()))
}

fn grid_hints(has_cards: bool, keys: &KeybindingsConfig) -> Vec<Span<'static>> {
    let mut hints: Vec<Span<'static>> = Vec::with_capacity(16);
    hints.push(Span::raw(" "));

    if has_cards {
        let nav: String = [keys.nav_left, keys.nav_down, keys.nav_up, keys.nav_right]
            .into_iter()
            .map(key_label)
            .collect();
        hints.push(key(nav));
        hints.push(desc(" Navigate "));
        hints.push(sep());
        hints.push(key(key_label(keys.open)));
        hints.push(desc(" / "));
        hints.push(key("click"));
        hints.push(desc(" Details "));
        hints.push(sep());
    }

    hints.push(key(key_label(keys.help)));
    hints.push(desc(" Help "));
    hints.push(key(key_label(keys.quit)));
    hints.push(desc(" Quit "));
    hints
}

fn detail_hints(keys: &KeybindingsConfig) -> Vec<Span<'static>> {
    vec![
        Span::raw(" "),
        key("Esc"),
        desc(" / "),
        key(key_label(keys.close)),
        desc(" / "),
        key("click outside"),
        desc(" Close "),
        sep(),
        key(format!("{}/{}", key_label(keys.nav_down), key_label(keys.nav_up))),
        desc(" Scroll "),
    ]
}

fn help_hints(keys: &KeybindingsConfig) -> Vec<Span<'static>> {
    vec![
        Span::raw(" "),
        key("Esc"),
        desc(" / "),
        key(key_label(keys.help)),
        desc(" Dismiss "),
    ]
}
