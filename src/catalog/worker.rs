//! Async catalog worker task.
//!
//! Owns the HTTP client. Fetches the listing exactly once at startup, then
//! serves image probe requests from the UI until the command channel closes.
//! The UI loop never touches the network.

use std::collections::HashSet;
use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use super::fetch::{self, FetchError, Listing};
use super::types::*;
use crate::config;

/// The worker entry point. Runs until the command channel is closed (i.e.
/// the TUI exits) or the task is aborted.
pub async fn run(mut cmd_rx: mpsc::Receiver<CatalogCommand>, evt_tx: mpsc::Sender<CatalogEvent>) {
    let cfg = config::get();

    let client = match fetch::client(
        Duration::from_secs(cfg.api.timeout_secs),
        &cfg.api.user_agent,
    ) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to build HTTP client: {e}");
            let _ = evt_tx.send(CatalogEvent::FetchStarted).await;
            let _ = evt_tx.send(CatalogEvent::FetchFailed(e.to_string())).await;
            return;
        }
    };

    // ── The one listing fetch ───────────────────────────────────────────
    let _ = evt_tx.send(CatalogEvent::FetchStarted).await;
    let outcome = fetch::fetch_listing(&client, &cfg.api.endpoint).await;
    let posters = match &outcome {
        Ok(Listing::Movies(movies)) if cfg.images.probe => movies
            .iter()
            .map(|m| m.card_poster().src().to_string())
            .collect(),
        _ => Vec::new(),
    };
    if evt_tx.send(listing_event(outcome)).await.is_err() {
        debug!("UI gone before the listing arrived");
        return;
    }

    // Each URL is probed at most once per run. Batches run as their own
    // tasks so a slow poster batch never delays the cast photos of a panel
    // that was just opened. Dropping the set aborts whatever is left.
    let mut probed: HashSet<String> = HashSet::new();
    let mut batches = JoinSet::new();
    spawn_probes(&mut batches, &client, posters, &mut probed, &evt_tx);

    // ── Command loop ────────────────────────────────────────────────────
    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(CatalogCommand::ProbeImages(urls)) if cfg.images.probe => {
                    spawn_probes(&mut batches, &client, urls, &mut probed, &evt_tx);
                }
                Some(CatalogCommand::ProbeImages(_)) => {}
                None => break,
            },
            Some(_) = batches.join_next(), if !batches.is_empty() => {}
        }
    }
    debug!("Command channel closed, catalog worker exiting");
}

/// Keep only the URLs not probed before.
fn fresh_urls(urls: Vec<String>, probed: &mut HashSet<String>) -> Vec<String> {
    urls.into_iter()
        .filter(|url| probed.insert(url.clone()))
        .collect()
}

fn spawn_probes(
    batches: &mut JoinSet<()>,
    client: &Client,
    urls: Vec<String>,
    probed: &mut HashSet<String>,
    evt_tx: &mpsc::Sender<CatalogEvent>,
) {
    let fresh = fresh_urls(urls, probed);
    if fresh.is_empty() {
        return;
    }
    debug!("Probing {} image URLs", fresh.len());
    batches.spawn(probe_all(client.clone(), fresh, evt_tx.clone()));
}

/// Turn the listing outcome into the single terminal event the UI expects.
pub fn listing_event(outcome: Result<Listing, FetchError>) -> CatalogEvent {
    match outcome {
        Ok(Listing::Movies(movies)) => {
            info!("Loaded {} movies", movies.len());
            CatalogEvent::MoviesLoaded(movies)
        }
        Ok(Listing::Missing) => {
            warn!("Listing response has no `data` array");
            CatalogEvent::NoMovies
        }
        Err(e) => {
            error!("Error fetching movies: {e}");
            CatalogEvent::FetchFailed(e.to_string())
        }
    }
}

/// Probe a batch of URLs with bounded concurrency and report the broken ones.
async fn probe_all(client: Client, urls: Vec<String>, evt_tx: mpsc::Sender<CatalogEvent>) {
    let concurrency = config::get().images.probe_concurrency;
    let client = &client;
    let mut results = futures::stream::iter(urls)
        .map(|url| async move {
            let ok = fetch::probe_image(client, &url).await;
            (url, ok)
        })
        .buffer_unordered(concurrency);

    while let Some((url, ok)) = results.next().await {
        if !ok && evt_tx.send(CatalogEvent::ImageFailed(url)).await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::movie::Movie;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;

    #[test]
    fn every_outcome_maps_to_one_terminal_event() {
        assert_eq!(
            listing_event(Ok(Listing::Movies(vec![Movie::default()]))),
            CatalogEvent::MoviesLoaded(vec![Movie::default()])
        );
        assert_eq!(listing_event(Ok(Listing::Missing)), CatalogEvent::NoMovies);
        assert_eq!(
            listing_event(Err(FetchError::Status(StatusCode::BAD_GATEWAY))),
            CatalogEvent::FetchFailed("HTTP error! Status: 502 Bad Gateway".into())
        );
    }

    #[test]
    fn urls_are_checked_once_per_run() {
        let mut probed = HashSet::new();
        assert_eq!(
            fresh_urls(vec!["a.jpg".into(), "b.jpg".into(), "a.jpg".into()], &mut probed),
            ["a.jpg", "b.jpg"]
        );
        assert_eq!(
            fresh_urls(vec!["b.jpg".into(), "c.jpg".into()], &mut probed),
            ["c.jpg"]
        );
    }
}
