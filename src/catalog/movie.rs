//! The movie record as returned by the listing API, and the fallback
//! resolution used by the card grid.
//!
//! No schema is enforced upstream, so every known field is optional and kept
//! as a raw JSON value; unknown fields are dropped. Each fallback chain is a named method so it can be
//! tested on its own.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::fields::{first_text, text};
use super::image::{self, ImageSlot};

/// Title shown when a record carries none.
pub const UNTITLED: &str = "Untitled Movie";

/// One entry of the listing's `data` array.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Movie {
    pub id: Option<Value>,
    pub title: Option<Value>,
    pub name: Option<Value>,
    pub original_title: Option<Value>,
    pub release_date: Option<Value>,
    pub year: Option<Value>,
    pub poster_path: Option<Value>,
    pub poster: Option<Value>,
    pub director: Option<Value>,
    pub directors: Option<Value>,
    pub overview: Option<Value>,
    pub plot: Option<Value>,
    pub description: Option<Value>,
    pub vote_average: Option<Value>,
    pub rating: Option<Value>,
    pub cast: Option<Value>,
    pub actors: Option<Value>,
    pub credits: Option<Value>,
}

/// Key identifying a card within the rendered list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListKey {
    Id(String),
    Title(String),
    Missing,
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKey::Id(id) => write!(f, "id:{id}"),
            ListKey::Title(title) => write!(f, "title:{title}"),
            ListKey::Missing => f.write_str("<none>"),
        }
    }
}

impl Movie {
    /// Build a record from one element of the `data` array. Elements that
    /// are not JSON objects become empty records rather than failing the
    /// whole listing.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("Unreadable movie record ({e}), rendering it empty");
                Movie::default()
            }),
            other => {
                warn!("Movie record is not an object: {other}");
                Movie::default()
            }
        }
    }

    /// `id` if present, else `title`.
    pub fn list_key(&self) -> ListKey {
        if let Some(id) = text(self.id.as_ref()) {
            ListKey::Id(id)
        } else if let Some(title) = text(self.title.as_ref()) {
            ListKey::Title(title)
        } else {
            ListKey::Missing
        }
    }

    /// First non-empty of `title`, `name`, `original_title`.
    pub fn display_title(&self) -> String {
        first_text([
            self.title.as_ref(),
            self.name.as_ref(),
            self.original_title.as_ref(),
        ])
        .unwrap_or_else(|| UNTITLED.to_string())
    }

    /// Year of `release_date`, else the literal `year` field.
    pub fn year(&self) -> Option<String> {
        match text(self.release_date.as_ref()) {
            Some(date) => parse_year(&date)
                .map(|y| y.to_string())
                .or_else(|| text(self.year.as_ref())),
            None => text(self.year.as_ref()),
        }
    }

    /// `"<title> (<year>)"`, or the bare title when no year is known.
    pub fn title_and_year(&self) -> String {
        let title = self.display_title();
        match self.year() {
            Some(year) => format!("{title} ({year})"),
            None => title,
        }
    }

    /// The poster URL the API provided, if any.
    pub fn poster_url(&self) -> Option<String> {
        first_text([self.poster_path.as_ref(), self.poster.as_ref()])
    }

    /// Poster for the grid card.
    pub fn card_poster(&self) -> ImageSlot {
        ImageSlot::new(
            self.poster_url()
                .unwrap_or_else(image::card_poster_placeholder),
            image::card_poster_error(),
        )
    }
}

/// Extract the calendar year from a date string. Accepts plain dates,
/// RFC 3339 timestamps and anything starting with a four-digit year.
pub fn parse_year(date: &str) -> Option<i32> {
    let date = date.trim();
    if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(d.year());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.year());
    }
    let head = date.get(..4)?;
    let rest = &date[4..];
    if head.bytes().all(|b| b.is_ascii_digit()) && (rest.is_empty() || rest.starts_with('-')) {
        head.parse().ok()
    } else {
        None
    }
}
