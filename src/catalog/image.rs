//! Image slots and generated placeholder URLs.
//!
//! Every poster or cast photo shown in the UI goes through an `ImageSlot`:
//! the URL resolved from the movie record plus a second, visually distinct
//! placeholder used once if the first URL turns out to be broken. After that
//! single substitution the slot stops reacting to errors, so a broken
//! placeholder can never cause a fallback loop.

const PLACEHOLDER_HOST: &str = "https://placehold.co";

/// Card poster when the record has none.
pub fn card_poster_placeholder() -> String {
    format!("{PLACEHOLDER_HOST}/180x260/555/FFF?text=No+Poster")
}

/// Card poster after a load failure.
pub fn card_poster_error() -> String {
    format!("{PLACEHOLDER_HOST}/180x260/E50914/FFFFFF?text=No+Poster+Available")
}

/// Detail-panel poster when the record has none.
pub fn detail_poster_placeholder() -> String {
    format!("{PLACEHOLDER_HOST}/300x450/333/fff?text=No+Poster")
}

/// Detail-panel poster after a load failure.
pub fn detail_poster_error() -> String {
    format!("{PLACEHOLDER_HOST}/300x450/E50914/FFFFFF?text=No+Poster+Available")
}

/// Actor photo placeholder labelled with the actor's initial.
pub fn actor_photo_placeholder(initial: &str) -> String {
    format!("{PLACEHOLDER_HOST}/70x70/333/fff?text={initial}")
}

/// Actor photo after a load failure.
pub fn actor_photo_error(initial: &str) -> String {
    format!("{PLACEHOLDER_HOST}/70x70/E50914/FFFFFF?text={initial}")
}

/// A resolved image URL with a one-shot error fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSlot {
    src: String,
    on_error: Option<String>,
}

impl ImageSlot {
    pub fn new(src: impl Into<String>, on_error: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            on_error: Some(on_error.into()),
        }
    }

    /// The URL currently displayed.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Whether a load failure would still be handled.
    pub fn handles_errors(&self) -> bool {
        self.on_error.is_some()
    }

    /// React to a load failure of the current URL. Swaps in the fallback the
    /// first time and returns `true`; every later call is a no-op.
    pub fn fail(&mut self) -> bool {
        match self.on_error.take() {
            Some(fallback) => {
                self.src = fallback;
                true
            }
            None => false,
        }
    }

    /// Apply every known failure: keeps failing over while the displayed URL
    /// is reported broken, which with a one-shot fallback means at most once.
    pub fn settle(mut self, is_broken: impl Fn(&str) -> bool) -> Self {
        while is_broken(&self.src) && self.fail() {}
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fallback_is_applied_exactly_once() {
        let mut slot = ImageSlot::new("p.jpg", card_poster_error());
        assert!(slot.handles_errors());
        assert!(slot.fail());
        assert_eq!(slot.src(), card_poster_error());
        assert!(!slot.handles_errors());
        assert!(!slot.fail());
        assert_eq!(slot.src(), card_poster_error());
    }

    #[test]
    fn settle_stops_even_if_fallback_is_broken() {
        let slot = ImageSlot::new("p.jpg", "fallback.jpg").settle(|_| true);
        assert_eq!(slot.src(), "fallback.jpg");
    }

    #[test]
    fn settle_keeps_healthy_urls() {
        let slot = ImageSlot::new("p.jpg", "fallback.jpg").settle(|url| url == "other.jpg");
        assert_eq!(slot.src(), "p.jpg");
        assert!(slot.handles_errors());
    }

    #[test]
    fn actor_placeholders_carry_the_initial() {
        assert_eq!(
            actor_photo_placeholder("K"),
            "https://placehold.co/70x70/333/fff?text=K"
        );
        assert_eq!(
            actor_photo_error("K"),
            "https://placehold.co/70x70/E50914/FFFFFF?text=K"
        );
    }
}
