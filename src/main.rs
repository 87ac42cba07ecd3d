//! reelgrid: browse a movie listing from the terminal.
//!
//! Architecture:
//! - **UI loop** (main task): runs the ratatui render loop, processes key and
//!   mouse events, owns all state.
//! - **Catalog worker** (tokio task): owns the HTTP client, fetches the
//!   listing once and probes image URLs on request.
//! - Two `mpsc` channels bridge them: `CatalogCommand` (UI→Worker),
//!   `CatalogEvent` (Worker→UI).
//!
//! The UI loop never touches the network. The worker never touches the
//! terminal.

mod app;
mod catalog;
mod config;
mod event;
mod modal;
mod theme;
mod tui;
mod ui;

use color_eyre::Result;
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use app::{App, AppAction};
use catalog::types::{CatalogCommand, CatalogEvent};
use event::Event;

#[tokio::main]
async fn main() -> Result<()> {
    // ── Error handling & logging ─────────────────────────────────────────
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr) // TUI owns stdout; logs go to stderr
        .init();

    info!("reelgrid starting");
    config::init()?;

    // ── Channel setup ───────────────────────────────────────────────────
    let (cmd_tx, cmd_rx) = mpsc::channel::<CatalogCommand>(32);
    let (evt_tx, evt_rx) = mpsc::channel::<CatalogEvent>(64);

    // ── Spawn catalog worker ────────────────────────────────────────────
    let worker = tokio::spawn(async move {
        catalog::worker::run(cmd_rx, evt_tx).await;
    });

    // ── Initialise terminal ─────────────────────────────────────────────
    let mut terminal = tui::init()?;
    let size = terminal.size()?;

    // ── App state ───────────────────────────────────────────────────────
    let mut app = App::new(Rect::new(0, 0, size.width, size.height));
    let mut events = event::EventHandler::new(evt_rx);

    // ── Main event loop ─────────────────────────────────────────────────
    while app.running {
        // Render, and remember the area for mouse hit-testing.
        let completed = terminal.draw(|frame| ui::render(frame, &app))?;
        app.viewport = completed.area;

        // Await next event (key / mouse / tick / catalog).
        let action = match events.next().await? {
            Event::Key(key) => app.handle_key(key),
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            Event::Tick => {
                app.on_tick();
                AppAction::Consumed
            }
            Event::Catalog(catalog_event) => {
                app.handle_catalog_event(catalog_event);
                AppAction::Consumed
            }
            Event::Resize(w, h) => {
                app.viewport = Rect::new(0, 0, w, h);
                AppAction::Consumed
            }
        };

        match action {
            AppAction::Quit => app.running = false,
            AppAction::Catalog(cmd) => {
                forward(&cmd_tx, cmd);
            }
            AppAction::Consumed => {}
        }
    }

    // ── Cleanup ─────────────────────────────────────────────────────────
    // Cancel any request still in flight; late results have nowhere to go.
    worker.abort();
    tui::restore()?;
    info!("reelgrid exiting");
    Ok(())
}

/// Non-blocking send to the worker. A command is dropped, not queued, when
/// the worker is backed up or gone. Returns whether it was delivered.
fn forward(cmd_tx: &mpsc::Sender<CatalogCommand>, cmd: CatalogCommand) -> bool {
    match cmd_tx.try_send(cmd) {
        Ok(()) => true,
        Err(e) => {
            debug!("Dropped catalog command: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_image(url: &str) -> CatalogCommand {
        CatalogCommand::ProbeImages(vec![url.to_string()])
    }

    #[test]
    fn full_or_closed_channel_drops_commands() {
        let (cmd_tx, cmd_rx) = mpsc::channel(1);
        assert!(forward(&cmd_tx, check_image("a.jpg")));
        assert!(!forward(&cmd_tx, check_image("b.jpg")));
        drop(cmd_rx);
        assert!(!forward(&cmd_tx, check_image("c.jpg")));
    }
}
