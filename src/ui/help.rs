//! Help overlay: keybinding reference.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::config::{self, key_label, KeybindingsConfig};
use crate::theme;

use super::detail::centered_rect;

type Section = (&'static str, Vec<(String, &'static str)>);

/// Keybinding reference built from the configured keys.
fn sections(keys: &KeybindingsConfig) -> Vec<Section> {
    let nav = [keys.nav_left, keys.nav_down, keys.nav_up, keys.nav_right]
        .into_iter()
        .map(key_label)
        .collect::<Vec<_>>()
        .join(" ");
    vec![
        (
            "Browsing",
            vec![
                (format!("{nav} / ←↓↑→"), "Move between cards"),
                (
                    format!("{} / {}", key_label(keys.jump_top), key_label(keys.jump_bottom)),
                    "Jump to first / last card",
                ),
                (format!("{} / click", key_label(keys.open)), "Show movie details"),
            ],
        ),
        (
            "Details",
            vec![
                ("Esc".to_string(), "Close"),
                (format!("{} / click [x]", key_label(keys.close)), "Close"),
                ("click outside".to_string(), "Close"),
                (
                    format!("{} / {} / wheel", key_label(keys.nav_down), key_label(keys.nav_up)),
                    "Scroll",
                ),
            ],
        ),
        (
            "Other",
            vec![
                (key_label(keys.help), "Toggle this help"),
                (format!("{} / Ctrl+C", key_label(keys.quit)), "Quit"),
            ],
        ),
    ]
}

/// Render the help overlay.
pub fn render(frame: &mut Frame) {
    let keys = &config::get().keys;
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(" 󰋖 Keybindings ", theme::title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::secondary()));

    let mut lines = vec![Line::from("")];

    for (section, bindings) in sections(keys) {
        lines.push(Line::from(Span::styled(
            format!("  ── {section} ──"),
            theme::title(),
        )));
        lines.push(Line::from(""));

        for (key, desc) in bindings {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("    {key:<18}"),
                    Style::default()
                        .fg(theme::secondary())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(desc, theme::text()),
            ]));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        format!("  Press Esc or {} to close", key_label(keys.help)),
        theme::dim(),
    )));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use ratatui::layout::Rect;

    use super::*;

    use crate::app::App;
    use crate::ui::test_support::render_to_string;

    #[test]
    fn help_overlay_lists_dismissal_keys() {
        let mut app = App::new(Rect::new(0, 0, 120, 40));
        app.show_help = true;
        let screen = render_to_string(&app);
        assert!(screen.contains("Keybindings"));
        assert!(screen.contains("click outside"));
    }

    #[test]
    fn reference_follows_remapped_keys() {
        let mut keys = config::Config::default().keys;
        keys.close = KeyCode::Char('c');
        keys.open = KeyCode::Char('o');
        let rows: Vec<String> = sections(&keys)
            .into_iter()
            .flat_map(|(_, bindings)| bindings.into_iter().map(|(key, _)| key))
            .collect();
        assert!(rows.contains(&"c / click [x]".to_string()));
        assert!(rows.contains(&"o / click".to_string()));
        assert!(rows.contains(&"h j k l / ←↓↑→".to_string()));
        assert!(!rows.iter().any(|r| r.starts_with("x ")));
    }
}
