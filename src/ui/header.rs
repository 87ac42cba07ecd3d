//! Title header at the top of the screen.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{App, View};
use crate::catalog::types::FETCH_FAILED;
use crate::theme;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(format!(" {} Movie Browser ", theme::FILM_ICON), theme::title()),
        Span::styled("│ ", theme::dim()),
        Span::styled("Click on any movie to see details ", theme::text()),
        Span::styled("│ ", theme::dim()),
    ];

    match app.view() {
        View::Loading => {
            let frame_char = theme::spinner_frame(app.tick_count);
            spans.push(Span::styled(format!("{frame_char} Loading "), theme::highlight()));
        }
        View::Error(FETCH_FAILED) => spans.push(Span::styled("Offline ", theme::error())),
        // The request went through; the listing just carried nothing usable.
        View::Error(_) => spans.push(Span::styled("No data ", theme::dim())),
        View::Empty | View::Grid => {
            let count = app.movies.len();
            let noun = if count == 1 { "movie" } else { "movies" };
            spans.push(Span::styled(format!("{count} {noun} "), theme::dim()));
        }
    }

    if let Some(movie) = app.selected_movie() {
        spans.push(Span::styled("│ ", theme::dim()));
        spans.push(Span::styled(movie.title_and_year(), theme::highlight()));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(theme::border_active());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
