//! Animated loading indicator.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme;

/// Render a spinner with `label`, centered a few rows into `area`.
pub fn render(frame: &mut Frame, tick: u64, area: Rect, label: &str) {
    let spinner_char = theme::spinner_frame(tick);
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{spinner_char} "),
                theme::title().add_modifier(Modifier::BOLD),
            ),
            Span::styled(label, theme::text()),
        ]),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
