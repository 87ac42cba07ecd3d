//! Application state and input handling.
//!
//! `App` is the single source of truth for the entire TUI. It is only mutated
//! from the main event loop, through catalog events, key presses and mouse
//! clicks. No `Arc<Mutex<>>` needed.

use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tracing::debug;

use crate::catalog::detail::MovieDetails;
use crate::catalog::movie::Movie;
use crate::catalog::types::*;
use crate::config;
use crate::modal::{DetailView, GlobalBinding, Listeners, Modal};
use crate::ui;
use crate::ui::grid::GridLayout;

// ─── Actions produced by input handling ─────────────────────────────────────

/// Actions that the main loop should execute after processing input.
#[derive(Debug, PartialEq)]
pub enum AppAction {
    /// Quit the application.
    Quit,
    /// Send a command to the catalog worker.
    Catalog(CatalogCommand),
    /// No-op (event was consumed but requires no further action).
    Consumed,
}

/// What the main area shows. Exactly one applies, in this precedence.
#[derive(Debug, PartialEq, Eq)]
pub enum View<'a> {
    Loading,
    Error(&'a str),
    Empty,
    Grid,
}

// ─── App state ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct App {
    /// Movies exactly as received, replaced wholesale by each listing.
    pub movies: Vec<Movie>,
    pub loading: bool,
    pub error: Option<String>,
    pub modal: Modal,
    /// Global bindings owned by mounted views.
    pub listeners: Listeners,
    /// Keyboard focus in the grid.
    pub cursor: usize,
    /// Image URLs that failed to load.
    pub broken_images: HashSet<String>,
    pub show_help: bool,
    /// Monotonic tick counter for animations.
    pub tick_count: u64,
    /// Last drawn frame area, used for mouse hit-testing.
    pub viewport: Rect,
    /// Whether the application should keep running.
    pub running: bool,
}

impl App {
    pub fn new(viewport: Rect) -> Self {
        Self {
            movies: Vec::new(),
            loading: true,
            error: None,
            modal: Modal::Closed,
            listeners: Listeners::default(),
            cursor: 0,
            broken_images: HashSet::new(),
            show_help: false,
            tick_count: 0,
            viewport,
            running: true,
        }
    }

    pub fn view(&self) -> View<'_> {
        if self.loading {
            View::Loading
        } else if let Some(error) = &self.error {
            View::Error(error.as_str())
        } else if self.movies.is_empty() {
            View::Empty
        } else {
            View::Grid
        }
    }

    /// The movie shown in the detail view, if open.
    pub fn selected_movie(&self) -> Option<&Movie> {
        self.modal.selected().and_then(|i| self.movies.get(i))
    }

    /// Normalized details of the selected movie with known-broken images
    /// already swapped for their fallbacks.
    pub fn selected_details(&self) -> Option<MovieDetails> {
        self.selected_movie().map(|movie| {
            MovieDetails::from_movie(movie).settle_images(|url| self.is_broken(url))
        })
    }

    pub fn is_broken(&self, url: &str) -> bool {
        self.broken_images.contains(url)
    }

    /// Grid geometry for the current viewport.
    pub fn grid(&self) -> GridLayout {
        GridLayout::new(
            ui::regions(self.viewport).content,
            self.movies.len(),
            self.cursor,
            config::get().layout,
        )
    }

    // ── Modal transitions ───────────────────────────────────────────────

    /// Open the detail view on the movie at `index`. Selecting the movie
    /// that is already open changes nothing.
    pub fn select_movie(&mut self, index: usize) -> AppAction {
        if index >= self.movies.len() || self.modal.selected() == Some(index) {
            return AppAction::Consumed;
        }
        self.close_modal();
        self.cursor = index;
        self.modal = Modal::Open(DetailView::mount(index, &mut self.listeners));
        debug!("Opened details for movie #{index}");

        match self.selected_details() {
            Some(details) => AppAction::Catalog(CatalogCommand::ProbeImages(details.image_urls())),
            None => AppAction::Consumed,
        }
    }

    /// Close the detail view and release its bindings. The only unmount path.
    pub fn close_modal(&mut self) {
        if let Modal::Open(view) = std::mem::take(&mut self.modal) {
            view.unmount(&mut self.listeners);
            debug!("Closed details, {} global bindings live", self.listeners.len());
        }
        debug_assert!(self.listeners.is_empty());
    }

    // ── Tick handling ───────────────────────────────────────────────────

    /// Called on every animation tick.
    pub fn on_tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);

        if let Some(view) = self.modal.view_mut() {
            if view.slide < 1.0 {
                let speed = config::get().general.slide_speed;
                view.slide = (view.slide + speed).min(1.0);
            }
        }
    }

    // ── Catalog event handling ──────────────────────────────────────────

    /// Apply an event from the catalog worker to the app state.
    pub fn handle_catalog_event(&mut self, event: CatalogEvent) {
        match event {
            CatalogEvent::FetchStarted => {
                self.loading = true;
                self.error = None;
            }
            CatalogEvent::MoviesLoaded(movies) => {
                self.close_modal();
                log_key_collisions(&movies);
                self.movies = movies;
                self.cursor = 0;
                self.error = None;
                self.loading = false;
            }
            CatalogEvent::NoMovies => {
                self.close_modal();
                self.movies.clear();
                self.cursor = 0;
                self.error = Some(NO_MOVIES_IN_RESPONSE.to_string());
                self.loading = false;
            }
            CatalogEvent::FetchFailed(detail) => {
                debug!("Listing failed: {detail}");
                self.error = Some(FETCH_FAILED.to_string());
                self.loading = false;
            }
            CatalogEvent::ImageFailed(url) => {
                debug!("Image failed to load: {url}");
                self.broken_images.insert(url);
            }
        }
    }

    // ── Key handling ────────────────────────────────────────────────────

    /// Process a key event and return an action for the main loop.
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        // Ctrl+C always quits (system convention, non-configurable).
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return AppAction::Quit;
        }
        if self.show_help {
            return self.handle_help_key(key);
        }
        if self.modal.is_open() {
            return self.handle_detail_key(key);
        }
        self.handle_grid_key(key)
    }

    fn handle_help_key(&mut self, key: KeyEvent) -> AppAction {
        let kb = &config::get().keys;
        match key.code {
            // Escape is global: it also dismisses a detail view under the help.
            KeyCode::Esc => {
                self.show_help = false;
                if self.listeners.is_registered(GlobalBinding::Escape) {
                    self.close_modal();
                }
            }
            KeyCode::Enter => self.show_help = false,
            c if c == kb.help || c == kb.quit => self.show_help = false,
            _ => {}
        }
        AppAction::Consumed
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> AppAction {
        let kb = &config::get().keys;
        match key.code {
            KeyCode::Esc if self.listeners.is_registered(GlobalBinding::Escape) => {
                self.close_modal();
            }
            c if c == kb.close => self.close_modal(),
            c if c == kb.quit => return AppAction::Quit,
            c if c == kb.help => self.show_help = true,
            c if c == kb.nav_down || c == KeyCode::Down => self.scroll_detail(1),
            c if c == kb.nav_up || c == KeyCode::Up => self.scroll_detail(-1),
            KeyCode::PageDown => self.scroll_detail(10),
            KeyCode::PageUp => self.scroll_detail(-10),
            _ => {}
        }
        AppAction::Consumed
    }

    fn handle_grid_key(&mut self, key: KeyEvent) -> AppAction {
        let kb = &config::get().keys;

        match key.code {
            c if c == kb.quit => return AppAction::Quit,
            c if c == kb.help => {
                self.show_help = true;
                return AppAction::Consumed;
            }
            _ => {}
        }

        if self.view() != View::Grid {
            return AppAction::Consumed;
        }

        let grid = self.grid();
        match key.code {
            c if c == kb.open => return self.select_movie(self.cursor),
            c if c == kb.nav_down || c == KeyCode::Down => {
                self.cursor = grid.step(self.cursor, 0, 1);
            }
            c if c == kb.nav_up || c == KeyCode::Up => {
                self.cursor = grid.step(self.cursor, 0, -1);
            }
            c if c == kb.nav_left || c == KeyCode::Left => {
                self.cursor = grid.step(self.cursor, -1, 0);
            }
            c if c == kb.nav_right || c == KeyCode::Right => {
                self.cursor = grid.step(self.cursor, 1, 0);
            }
            c if c == kb.jump_top || c == KeyCode::Home => self.cursor = 0,
            c if c == kb.jump_bottom || c == KeyCode::End => {
                self.cursor = self.movies.len().saturating_sub(1);
            }
            _ => {}
        }
        AppAction::Consumed
    }

    fn scroll_detail(&mut self, delta: i32) {
        let max = self
            .selected_details()
            .map(|d| ui::detail::max_scroll(self.viewport, &d))
            .unwrap_or(0);
        if let Some(view) = self.modal.view_mut() {
            let next = (i32::from(view.scroll) + delta).clamp(0, i32::from(max));
            view.scroll = next as u16;
        }
    }

    // ── Mouse handling ──────────────────────────────────────────────────

    /// Process a mouse event and return an action for the main loop.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> AppAction {
        let position = Position::new(mouse.column, mouse.row);

        if self.show_help {
            if !matches!(mouse.kind, MouseEventKind::Down(_)) {
                return AppAction::Consumed;
            }
            self.show_help = false;
            // The same press still counts against a detail view underneath,
            // but never opens a card.
            if !self.modal.is_open() {
                return AppAction::Consumed;
            }
        }

        if let Some(view) = self.modal.view() {
            let panel = ui::detail::rendered_area(self.viewport, view);
            match mouse.kind {
                MouseEventKind::Down(MouseButton::Left)
                    if ui::detail::close_button_area(panel).contains(position) =>
                {
                    self.close_modal();
                }
                MouseEventKind::Down(_)
                    if self.listeners.is_registered(GlobalBinding::OutsidePointerDown)
                        && !panel.contains(position) =>
                {
                    self.close_modal();
                }
                MouseEventKind::ScrollDown => self.scroll_detail(1),
                MouseEventKind::ScrollUp => self.scroll_detail(-1),
                _ => {}
            }
            return AppAction::Consumed;
        }

        if self.view() != View::Grid {
            return AppAction::Consumed;
        }

        let grid = self.grid();
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => match grid.hit(position) {
                Some(index) => self.select_movie(index),
                None => AppAction::Consumed,
            },
            MouseEventKind::ScrollDown => {
                self.cursor = grid.step(self.cursor, 0, 1);
                AppAction::Consumed
            }
            MouseEventKind::ScrollUp => {
                self.cursor = grid.step(self.cursor, 0, -1);
                AppAction::Consumed
            }
            _ => AppAction::Consumed,
        }
    }
}

/// Cards are keyed by `id`, else `title`. Selection goes by index so
/// duplicate keys are harmless, but they usually mean a sloppy listing.
fn log_key_collisions(movies: &[Movie]) {
    let mut seen = HashSet::new();
    for key in movies.iter().map(Movie::list_key) {
        if !seen.insert(key.clone()) {
            debug!("Duplicate list key {key}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn app_with(movies: serde_json::Value) -> App {
        let mut app = App::new(Rect::new(0, 0, 120, 40));
        let listing = crate::catalog::fetch::listing_from_value(json!({ "data": movies }));
        let crate::catalog::fetch::Listing::Movies(movies) = listing else {
            panic!("expected movies");
        };
        app.handle_catalog_event(CatalogEvent::FetchStarted);
        app.handle_catalog_event(CatalogEvent::MoviesLoaded(movies));
        app
    }

    fn three() -> App {
        app_with(json!([
            { "id": 1, "title": "Dune", "release_date": "2021-10-22", "poster_path": "p.jpg" },
            { "id": 2, "title": "Heat" },
            { "id": 3, "title": "Alien" }
        ]))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn drawn_panel(app: &App) -> Rect {
        let view = app.modal.view().expect("modal should be open");
        ui::detail::rendered_area(app.viewport, view)
    }

    fn assert_closed(app: &App) {
        assert_eq!(app.modal, Modal::Closed);
        assert_eq!(app.selected_movie(), None);
        assert!(app.listeners.is_empty());
    }

    #[test]
    fn starts_loading() {
        let app = App::new(Rect::default());
        assert_eq!(app.view(), View::Loading);
        assert_eq!(app.modal, Modal::Closed);
    }

    #[test]
    fn loaded_movies_replace_state_in_order() {
        let app = three();
        assert!(!app.loading);
        assert_eq!(app.error, None);
        let titles: Vec<_> = app.movies.iter().map(Movie::display_title).collect();
        assert_eq!(titles, ["Dune", "Heat", "Alien"]);
        assert_eq!(app.view(), View::Grid);
    }

    #[test]
    fn empty_listing_shows_placeholder() {
        let app = app_with(json!([]));
        assert_eq!(app.view(), View::Empty);
    }

    #[test]
    fn missing_data_is_a_soft_error() {
        let mut app = three();
        app.handle_catalog_event(CatalogEvent::FetchStarted);
        app.handle_catalog_event(CatalogEvent::NoMovies);
        assert!(app.movies.is_empty());
        assert!(!app.loading);
        assert_eq!(app.view(), View::Error(NO_MOVIES_IN_RESPONSE));
    }

    #[test]
    fn hard_failure_keeps_movies_empty() {
        let mut app = App::new(Rect::default());
        app.handle_catalog_event(CatalogEvent::FetchStarted);
        app.handle_catalog_event(CatalogEvent::FetchFailed("HTTP error! Status: 500".into()));
        assert!(app.movies.is_empty());
        assert!(!app.loading);
        assert_eq!(app.view(), View::Error(FETCH_FAILED));
    }

    #[test]
    fn select_opens_and_requests_image_probes() {
        let mut app = three();
        let action = app.select_movie(0);
        assert_eq!(
            action,
            AppAction::Catalog(CatalogCommand::ProbeImages(vec!["p.jpg".into()]))
        );
        assert_eq!(app.modal.selected(), Some(0));
        assert_eq!(app.listeners.len(), 2);
    }

    #[test]
    fn selecting_the_same_movie_twice_is_idempotent() {
        let mut app = three();
        app.select_movie(1);
        assert_eq!(app.select_movie(1), AppAction::Consumed);
        assert_eq!(app.modal.selected(), Some(1));
        assert_eq!(app.listeners.len(), 2);
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut app = three();
        assert_eq!(app.select_movie(9), AppAction::Consumed);
        assert_closed(&app);
    }

    #[test]
    fn close_control_dismisses() {
        let mut app = three();
        app.select_movie(0);
        let close = ui::detail::close_button_area(drawn_panel(&app));
        app.handle_mouse(click(close.x + 1, close.y));
        assert_closed(&app);
    }

    #[test]
    fn close_control_follows_the_slide() {
        let mut app = three();
        app.select_movie(0);
        app.on_tick();
        let drawn = drawn_panel(&app);
        assert!(drawn.y < ui::detail::panel_area(app.viewport).y);
        let close = ui::detail::close_button_area(drawn);
        app.handle_mouse(click(close.x, close.y));
        assert_closed(&app);
    }

    #[test]
    fn close_key_dismisses() {
        let mut app = three();
        app.select_movie(0);
        app.handle_key(key(KeyCode::Char('x')));
        assert_closed(&app);
    }

    #[test]
    fn outside_click_dismisses() {
        let mut app = three();
        app.select_movie(0);
        app.handle_mouse(click(0, 0));
        assert_closed(&app);
    }

    #[test]
    fn click_inside_panel_keeps_it_open() {
        let mut app = three();
        app.select_movie(0);
        let panel = drawn_panel(&app);
        app.handle_mouse(click(panel.x + 2, panel.y + 3));
        assert_eq!(app.modal.selected(), Some(0));
    }

    #[test]
    fn click_inside_sliding_panel_keeps_it_open() {
        let mut app = three();
        app.select_movie(0);
        app.on_tick();
        // Row 2 is inside the panel as drawn mid-slide (top at row 1) but
        // above where it comes to rest (row 4).
        assert_eq!(drawn_panel(&app).y, 1);
        app.handle_mouse(click(60, 2));
        assert_eq!(app.modal.selected(), Some(0));
        assert_eq!(app.listeners.len(), 2);
    }

    #[test]
    fn escape_under_help_closes_both() {
        let mut app = three();
        app.select_movie(0);
        app.handle_key(key(KeyCode::Char('?')));
        assert!(app.show_help);
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.show_help);
        assert_closed(&app);
    }

    #[test]
    fn outside_click_under_help_closes_both() {
        let mut app = three();
        app.select_movie(0);
        app.show_help = true;
        app.handle_mouse(click(0, 0));
        assert!(!app.show_help);
        assert_closed(&app);
    }

    #[test]
    fn click_dismissing_help_does_not_open_a_card() {
        let mut app = three();
        app.show_help = true;
        let (_, rect) = app.grid().card_rects()[0];
        app.handle_mouse(click(rect.x + 1, rect.y + 1));
        assert!(!app.show_help);
        assert_closed(&app);
    }

    #[test]
    fn escape_dismisses() {
        let mut app = three();
        app.select_movie(2);
        app.handle_key(key(KeyCode::Esc));
        assert_closed(&app);
    }

    #[test]
    fn escape_in_grid_does_nothing() {
        let mut app = three();
        assert_eq!(app.handle_key(key(KeyCode::Esc)), AppAction::Consumed);
        assert_closed(&app);
    }

    #[test]
    fn open_close_cycles_release_bindings() {
        let mut app = three();
        for i in 0..20 {
            app.select_movie(i % 3);
            app.close_modal();
        }
        assert_closed(&app);
    }

    #[test]
    fn clicking_a_card_selects_it() {
        let mut app = three();
        let (index, rect) = app.grid().card_rects()[1];
        app.handle_mouse(click(rect.x + 1, rect.y + 1));
        assert_eq!(app.modal.selected(), Some(index));
        assert_eq!(app.cursor, index);
    }

    #[test]
    fn enter_opens_the_card_under_the_cursor() {
        let mut app = three();
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.modal.selected(), Some(1));
    }

    #[test]
    fn keys_are_ignored_while_loading() {
        let mut app = App::new(Rect::new(0, 0, 120, 40));
        assert_eq!(app.handle_key(key(KeyCode::Enter)), AppAction::Consumed);
        assert_eq!(app.modal, Modal::Closed);
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), AppAction::Quit);
    }

    #[test]
    fn broken_images_are_swapped_in_details() {
        let mut app = three();
        app.handle_catalog_event(CatalogEvent::ImageFailed("p.jpg".into()));
        app.select_movie(0);
        let details = app.selected_details().unwrap();
        assert_eq!(
            details.poster.src(),
            crate::catalog::image::detail_poster_error()
        );
    }

    #[test]
    fn slide_animation_completes() {
        let mut app = three();
        app.select_movie(0);
        for _ in 0..200 {
            app.on_tick();
        }
        let Modal::Open(view) = &app.modal else {
            panic!("modal should be open");
        };
        assert_eq!(view.slide, 1.0);
    }

    #[test]
    fn long_plot_scrolls_to_the_end() {
        let plot = (0..300)
            .map(|i| format!("w{i}"))
            .chain(std::iter::once("THEEND".to_string()))
            .collect::<Vec<_>>()
            .join(" ");
        let mut app = app_with(json!([{ "id": 1, "title": "Long", "plot": plot }]));
        app.viewport = Rect::new(0, 0, 50, 20);
        app.select_movie(0);
        for _ in 0..50 {
            app.on_tick();
        }
        for _ in 0..500 {
            app.handle_key(key(KeyCode::Down));
        }
        let screen = crate::ui::test_support::render_to_string(&app);
        assert!(screen.contains("THEEND"), "end of plot unreachable:\n{screen}");
        assert!(screen.contains("No cast information available."));
    }

    #[test]
    fn detail_scroll_is_clamped() {
        let mut app = three();
        app.select_movie(0);
        app.handle_key(key(KeyCode::Up));
        let Modal::Open(view) = &app.modal else {
            panic!("modal should be open");
        };
        assert_eq!(view.scroll, 0);
    }
}
