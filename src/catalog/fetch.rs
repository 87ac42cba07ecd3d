//! HTTP access to the movie listing and image probing.
//!
//! Response interpretation is split from the transport so that every outcome
//! the UI distinguishes can be exercised without a network.

use std::time::Duration;

use reqwest::header::RANGE;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::movie::Movie;

/// Hard failures of the listing request. All of them surface to the user as
/// the same generic message.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP error! Status: {0}")]
    Status(StatusCode),
    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A successfully decoded listing body.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    /// The body carried a `data` array.
    Movies(Vec<Movie>),
    /// The body decoded but had no `data` array.
    Missing,
}

/// Build the shared HTTP client.
pub fn client(timeout: Duration, user_agent: &str) -> Result<Client, FetchError> {
    Ok(Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?)
}

/// Issue the listing `GET` and interpret the response.
pub async fn fetch_listing(client: &Client, url: &str) -> Result<Listing, FetchError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    let body = response.bytes().await?;
    interpret(status, &body)
}

/// Classify a listing response by status code and body.
pub fn interpret(status: StatusCode, body: &[u8]) -> Result<Listing, FetchError> {
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }
    let value: Value = serde_json::from_slice(body)?;
    debug!("Listing response: {value}");
    Ok(listing_from_value(value))
}

/// Extract the `data` array of a decoded body.
pub fn listing_from_value(mut value: Value) -> Listing {
    match value.get_mut("data").map(Value::take) {
        Some(Value::Array(items)) => {
            Listing::Movies(items.into_iter().map(Movie::from_value).collect())
        }
        _ => Listing::Missing,
    }
}

/// What a single image request says about the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCheck {
    Loads,
    Broken,
    /// The host refused the method, not the image.
    Inconclusive,
}

impl ImageCheck {
    pub fn from_status(status: StatusCode) -> Self {
        if status.is_success() {
            ImageCheck::Loads
        } else if status == StatusCode::METHOD_NOT_ALLOWED || status == StatusCode::NOT_IMPLEMENTED
        {
            ImageCheck::Inconclusive
        } else {
            ImageCheck::Broken
        }
    }
}

/// Check whether an image URL loads. A cheap `HEAD` goes first; hosts that
/// refuse it get a one-byte ranged `GET`. Transport errors count as broken.
pub async fn probe_image(client: &Client, url: &str) -> bool {
    match check(client.head(url), url).await {
        ImageCheck::Loads => true,
        ImageCheck::Broken => false,
        ImageCheck::Inconclusive => {
            let ranged = client.get(url).header(RANGE, "bytes=0-0");
            check(ranged, url).await == ImageCheck::Loads
        }
    }
}

async fn check(request: RequestBuilder, url: &str) -> ImageCheck {
    match request.send().await {
        Ok(resp) => {
            let verdict = ImageCheck::from_status(resp.status());
            if verdict != ImageCheck::Loads {
                debug!("Image {url} answered {}", resp.status());
            }
            verdict
        }
        Err(e) => {
            debug!("Image {url} unreachable: {e}");
            ImageCheck::Broken
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn body(v: Value) -> Vec<u8> {
        serde_json::to_vec(&v).unwrap()
    }

    #[test]
    fn data_array_is_kept_in_order() {
        let listing = interpret(
            StatusCode::OK,
            &body(json!({
                "data": [{ "title": "A" }, { "title": "B" }, { "title": "C" }],
                "current_page": 1,
                "last_page": 40
            })),
        )
        .unwrap();
        let Listing::Movies(movies) = listing else {
            panic!("expected movies");
        };
        let titles: Vec<_> = movies.iter().map(Movie::display_title).collect();
        assert_eq!(titles, ["A", "B", "C"]);
    }

    #[test]
    fn missing_or_non_array_data_is_soft() {
        for v in [json!({}), json!({ "data": null }), json!({ "data": { "x": 1 } }), json!([])] {
            assert_eq!(interpret(StatusCode::OK, &body(v)).unwrap(), Listing::Missing);
        }
    }

    #[test]
    fn empty_data_array_is_an_empty_listing() {
        assert_eq!(
            interpret(StatusCode::OK, &body(json!({ "data": [] }))).unwrap(),
            Listing::Movies(Vec::new())
        );
    }

    #[test]
    fn non_success_status_is_a_hard_error() {
        for status in [StatusCode::NOT_FOUND, StatusCode::INTERNAL_SERVER_ERROR] {
            let err = interpret(status, &body(json!({ "data": [{ "title": "A" }] }))).unwrap_err();
            assert!(matches!(err, FetchError::Status(s) if s == status));
        }
    }

    #[test]
    fn invalid_json_is_a_hard_error() {
        let err = interpret(StatusCode::OK, b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn image_status_classification() {
        assert_eq!(ImageCheck::from_status(StatusCode::OK), ImageCheck::Loads);
        assert_eq!(
            ImageCheck::from_status(StatusCode::PARTIAL_CONTENT),
            ImageCheck::Loads
        );
        assert_eq!(
            ImageCheck::from_status(StatusCode::METHOD_NOT_ALLOWED),
            ImageCheck::Inconclusive
        );
        assert_eq!(
            ImageCheck::from_status(StatusCode::NOT_IMPLEMENTED),
            ImageCheck::Inconclusive
        );
        assert_eq!(ImageCheck::from_status(StatusCode::NOT_FOUND), ImageCheck::Broken);
        assert_eq!(ImageCheck::from_status(StatusCode::FORBIDDEN), ImageCheck::Broken);
    }
}
