//! Channel message types between the UI loop and the catalog worker task.
//! Only plain data crosses the channels; the HTTP client stays in the worker.

use super::movie::Movie;

/// Shown for any transport, status or decode failure of the listing.
pub const FETCH_FAILED: &str = "Failed to load movies. Please check your network or API endpoint.";

/// Shown when the listing decoded but carried no `data` array.
pub const NO_MOVIES_IN_RESPONSE: &str = "No movies found in the response.";

// ─── UI → Worker commands ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCommand {
    /// Check that these image URLs load; failures come back as
    /// `CatalogEvent::ImageFailed`.
    ProbeImages(Vec<String>),
}

// ─── Worker → UI events ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    /// The listing request is about to be sent.
    FetchStarted,
    /// The listing arrived with a `data` array.
    MoviesLoaded(Vec<Movie>),
    /// The listing arrived without a `data` array.
    NoMovies,
    /// The listing request failed; carries the diagnostic detail.
    FetchFailed(String),
    /// An image URL failed to load.
    ImageFailed(String),
}
