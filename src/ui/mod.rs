//! Top-level UI render dispatch.
//!
//! Splits the terminal frame into four regions:
//! - Header (top, 3 lines)
//! - Section title (1 line)
//! - Main content: loading / error / empty placeholder, or the card grid
//! - Key hints bar (bottom, 1 line)
//!
//! The detail panel and the help overlay are drawn last, on top.

pub mod card;
pub mod detail;
pub mod grid;
pub mod header;
pub mod help;
pub mod key_bar;
pub mod movie_grid;
pub mod spinner;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{App, View};
use crate::theme;

/// Screen regions shared by rendering and mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub header: Rect,
    pub section: Rect,
    pub content: Rect,
    pub keys: Rect,
}

pub fn regions(area: Rect) -> Regions {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(1), // section title
            Constraint::Min(0),    // main content
            Constraint::Length(1), // key hints bar
        ])
        .split(area);

    Regions {
        header: outer[0],
        section: outer[1],
        content: outer[2],
        keys: outer[3],
    }
}

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let r = regions(frame.area());

    header::render(frame, app, r.header);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled("  All Movies", theme::label()))),
        r.section,
    );

    match app.view() {
        View::Loading => spinner::render(frame, app.tick_count, r.content, "Loading movies..."),
        View::Error(message) => render_message(frame, r.content, message, theme::error()),
        View::Empty => render_message(frame, r.content, "No movies found.", theme::text()),
        View::Grid => movie_grid::render(frame, app, r.content),
    }

    key_bar::render(frame, app, r.keys);

    // ── Overlays (rendered last so they're on top) ──────────────────────
    if let (Some(details), Some(view)) = (app.selected_details(), app.modal.view()) {
        detail::render(frame, &details, view);
    }
    if app.show_help {
        help::render(frame);
    }
}

/// A single centered line of text, a few rows below the top of `area`.
fn render_message(frame: &mut Frame, area: Rect, message: &str, style: ratatui::style::Style) {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), style)),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}


#[cfg(test)]
mod tests {
    use super::test_support::render_to_string;
    use super::*;
    use crate::catalog::fetch::{listing_from_value, Listing};
    use crate::catalog::types::{CatalogEvent, FETCH_FAILED, NO_MOVIES_IN_RESPONSE};
    use serde_json::json;

    fn loaded(data: serde_json::Value) -> App {
        let mut app = App::new(Rect::new(0, 0, 120, 40));
        let Listing::Movies(movies) = listing_from_value(json!({ "data": data })) else {
            panic!("expected movies");
        };
        app.handle_catalog_event(CatalogEvent::MoviesLoaded(movies));
        app
    }

    #[test]
    fn loading_indicator_first() {
        let app = App::new(Rect::new(0, 0, 100, 20));
        let screen = render_to_string(&app);
        assert!(screen.contains("Loading movies..."));
        assert!(screen.contains("Movie Browser"));
    }

    #[test]
    fn error_message_is_shown() {
        let mut app = App::new(Rect::new(0, 0, 100, 20));
        app.handle_catalog_event(CatalogEvent::FetchFailed("boom".into()));
        let screen = render_to_string(&app);
        assert!(screen.contains(FETCH_FAILED));
        assert!(!screen.contains("Loading movies..."));
    }

    #[test]
    fn soft_error_message_is_shown() {
        let mut app = App::new(Rect::new(0, 0, 100, 20));
        app.handle_catalog_event(CatalogEvent::NoMovies);
        assert!(render_to_string(&app).contains(NO_MOVIES_IN_RESPONSE));
    }

    #[test]
    fn empty_placeholder() {
        let app = loaded(json!([]));
        assert!(render_to_string(&app).contains("No movies found."));
    }

    #[test]
    fn every_movie_gets_a_card_in_order() {
        let app = loaded(json!([
            { "id": 1, "title": "Dune" },
            { "id": 2, "title": "Heat" },
            { "id": 3, "title": "Alien" }
        ]));
        let screen = render_to_string(&app);
        let dune = screen.find("Dune").unwrap();
        let heat = screen.find("Heat").unwrap();
        let alien = screen.find("Alien").unwrap();
        assert!(dune < heat && heat < alien);
    }

    #[test]
    fn dune_end_to_end() {
        let mut app = loaded(json!([
            { "id": 1, "title": "Dune", "release_date": "2021-10-22", "poster_path": "p.jpg" }
        ]));
        assert_eq!(app.movies.len(), 1);
        assert_eq!(app.grid().card_rects().len(), 1);

        let screen = render_to_string(&app);
        assert_eq!(screen.matches("Dune (2021)").count(), 1);
        assert!(screen.contains("p.jpg"));

        let (_, rect) = app.grid().card_rects()[0];
        app.handle_mouse(crossterm::event::MouseEvent {
            kind: crossterm::event::MouseEventKind::Down(crossterm::event::MouseButton::Left),
            column: rect.x + 1,
            row: rect.y + 1,
            modifiers: crossterm::event::KeyModifiers::NONE,
        });
        for _ in 0..20 {
            app.on_tick();
        }

        let screen = render_to_string(&app);
        assert!(screen.contains("Rating: N/A"));
        assert!(screen.contains("No cast information available."));
        let panel = detail::panel_area(app.viewport);
        let top_border: String = screen
            .lines()
            .nth(usize::from(panel.y))
            .unwrap()
            .to_string();
        assert!(top_border.contains("Dune (2021)"));
    }
}
