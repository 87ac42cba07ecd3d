//! Canonical detail record derived from a raw `Movie` for the detail panel.

use serde_json::Value;

use super::fields::{as_sequence, first_text, text};
use super::image::{self, ImageSlot};
use super::movie::Movie;

pub const UNKNOWN: &str = "Unknown";
pub const UNKNOWN_DIRECTOR: &str = "Unknown Director";
pub const UNKNOWN_ACTOR: &str = "Unknown Actor";
pub const NO_PLOT: &str = "No plot available.";
pub const NO_RATING: &str = "N/A";

/// Everything the detail panel shows, with every fallback already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieDetails {
    pub title: String,
    pub year: String,
    pub director: String,
    pub plot: String,
    pub poster: ImageSlot,
    pub rating: String,
    pub release_date: String,
    pub cast: Vec<CastMember>,
}

/// One normalized cast entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastMember {
    pub name: String,
    pub photo: ImageSlot,
}

impl MovieDetails {
    pub fn from_movie(movie: &Movie) -> Self {
        Self {
            title: movie.display_title(),
            year: movie.year().unwrap_or_else(|| UNKNOWN.to_string()),
            director: first_text([movie.director.as_ref(), movie.directors.as_ref()])
                .unwrap_or_else(|| UNKNOWN_DIRECTOR.to_string()),
            plot: first_text([
                movie.overview.as_ref(),
                movie.plot.as_ref(),
                movie.description.as_ref(),
            ])
            .unwrap_or_else(|| NO_PLOT.to_string()),
            poster: ImageSlot::new(
                movie
                    .poster_url()
                    .unwrap_or_else(image::detail_poster_placeholder),
                image::detail_poster_error(),
            ),
            rating: first_text([movie.vote_average.as_ref(), movie.rating.as_ref()])
                .unwrap_or_else(|| NO_RATING.to_string()),
            release_date: first_text([movie.release_date.as_ref(), movie.year.as_ref()])
                .unwrap_or_else(|| UNKNOWN.to_string()),
            cast: cast_entries(movie)
                .map(|entries| entries.iter().map(CastMember::from_value).collect())
                .unwrap_or_default(),
        }
    }

    /// Panel heading, `"<title> (<year>)"`.
    pub fn heading(&self) -> String {
        format!("{} ({})", self.title, self.year)
    }

    /// Every image URL the panel displays.
    pub fn image_urls(&self) -> Vec<String> {
        std::iter::once(self.poster.src().to_string())
            .chain(self.cast.iter().map(|c| c.photo.src().to_string()))
            .collect()
    }

    /// Apply known load failures to every image slot.
    pub fn settle_images(mut self, is_broken: impl Fn(&str) -> bool) -> Self {
        self.poster = self.poster.settle(&is_broken);
        for member in &mut self.cast {
            member.photo = member.photo.clone().settle(&is_broken);
        }
        self
    }
}

/// The cast sequence: `cast`, else `actors`, else `credits.cast`, taking
/// only values that are actually sequences.
pub fn cast_entries(movie: &Movie) -> Option<&Vec<Value>> {
    as_sequence(movie.cast.as_ref())
        .or_else(|| as_sequence(movie.actors.as_ref()))
        .or_else(|| as_sequence(movie.credits.as_ref().and_then(|c| c.get("cast"))))
}

impl CastMember {
    /// Normalize one actor entry. A bare string is taken as the name.
    pub fn from_value(value: &Value) -> Self {
        let (name, photo) = match value {
            Value::String(_) => (text(Some(value)), None),
            _ => (
                first_text([value.get("name"), value.get("actor_name")]),
                first_text([
                    value.get("profile_path"),
                    value.get("photo"),
                    value.get("image"),
                ]),
            ),
        };
        let name = name.unwrap_or_else(|| UNKNOWN_ACTOR.to_string());
        let initial = initial(&name);
        let photo = ImageSlot::new(
            photo.unwrap_or_else(|| image::actor_photo_placeholder(&initial)),
            image::actor_photo_error(&initial),
        );
        Self { name, photo }
    }
}

/// First character of a name, kept as written.
fn initial(name: &str) -> String {
    name.chars().next().map(String::from).unwrap_or_default()
}
