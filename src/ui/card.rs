//! A single movie tile: poster reference on top, "title (year)" below.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::catalog::movie::Movie;
use crate::theme;

pub fn render(frame: &mut Frame, movie: &Movie, focused: bool, is_broken: impl Fn(&str) -> bool, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if focused { BorderType::Thick } else { BorderType::Rounded })
        .border_style(if focused {
            theme::border_active()
        } else {
            theme::border_inactive()
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // poster
            Constraint::Length(2), // label
        ])
        .split(inner);

    let poster = movie.card_poster().settle(is_broken);
    let poster_lines = vec![
        Line::from(Span::styled(theme::POSTER_ICON, theme::dim())),
        Line::from(Span::styled(poster.src().to_string(), theme::dim())),
    ];
    frame.render_widget(
        Paragraph::new(poster_lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    let label_style = if focused { theme::selected() } else { theme::title() };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(movie.title_and_year(), label_style)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[1],
    );
}
