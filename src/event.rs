//! Unified event loop that merges crossterm terminal events, catalog worker
//! events, and a fixed-rate tick into a single async stream.
//!
//! The TUI main loop awaits `EventHandler::next()` to process all three
//! sources without blocking the render path.

use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind,
};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::catalog::types::CatalogEvent;

/// Unified event type consumed by the TUI main loop.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed (only `Press` kind; release/repeat are ignored on
    /// platforms that emit them).
    Key(KeyEvent),
    /// A mouse button went down or the wheel moved.
    Mouse(MouseEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Animation / state tick.
    Tick,
    /// An event from the catalog worker task.
    Catalog(CatalogEvent),
}

/// Multiplexes crossterm events, a tick timer, and the catalog event channel
/// into a single `Event` stream.
pub struct EventHandler {
    /// Async crossterm event reader.
    crossterm_stream: EventStream,
    /// Tick interval for animations.
    tick_interval: tokio::time::Interval,
    /// Receiver end of the worker → UI channel.
    catalog_rx: mpsc::Receiver<CatalogEvent>,
}

impl EventHandler {
    pub fn new(catalog_rx: mpsc::Receiver<CatalogEvent>) -> Self {
        let tick_ms = crate::config::get().general.tick_rate_ms;
        let mut tick_interval = tokio::time::interval(Duration::from_millis(tick_ms));
        // Don't try to "catch up" missed ticks, just keep going.
        tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        Self {
            crossterm_stream: EventStream::new(),
            tick_interval,
            catalog_rx,
        }
    }

    /// Await the next event from any source.
    pub async fn next(&mut self) -> Result<Event> {
        loop {
            tokio::select! {
                // ── Catalog events (highest priority) ───────────────────
                Some(catalog_event) = self.catalog_rx.recv() => {
                    return Ok(Event::Catalog(catalog_event));
                }

                // ── Terminal events ─────────────────────────────────────
                Some(ct_result) = self.crossterm_stream.next() => {
                    match ct_result? {
                        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                            return Ok(Event::Key(key));
                        }
                        CrosstermEvent::Mouse(mouse) if wants_mouse(&mouse) => {
                            return Ok(Event::Mouse(mouse));
                        }
                        CrosstermEvent::Resize(w, h) => return Ok(Event::Resize(w, h)),
                        // Swallow key release/repeat and pointer motion; loop
                        // again instead of emitting a Tick that would redraw.
                        _ => continue,
                    }
                }

                // ── Tick timer ──────────────────────────────────────────
                _ = self.tick_interval.tick() => {
                    return Ok(Event::Tick);
                }
            }
        }
    }
}

/// Only presses and wheel turns matter; moves, drags and releases don't.
fn wants_mouse(mouse: &MouseEvent) -> bool {
    matches!(
        mouse.kind,
        MouseEventKind::Down(_) | MouseEventKind::ScrollDown | MouseEventKind::ScrollUp
    )
}
