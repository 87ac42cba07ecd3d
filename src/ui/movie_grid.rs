//! Grid of movie cards, in listing order, scrolled to keep the cursor visible.

use ratatui::layout::Rect;
use ratatui::Frame;

use crate::app::App;

use super::card;
use super::grid::GridLayout;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let layout = GridLayout::new(
        area,
        app.movies.len(),
        app.cursor,
        crate::config::get().layout,
    );

    for (index, rect) in layout.card_rects() {
        let focused = index == app.cursor && !app.modal.is_open();
        card::render(
            frame,
            &app.movies[index],
            focused,
            |url| app.is_broken(url),
            rect,
        );
    }
}
