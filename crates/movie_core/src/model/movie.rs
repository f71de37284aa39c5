//! Movie domain model.
//!
//! # Responsibility
//! - Define the canonical movie document stored in the `movies` collection.
//! - Provide field validation shared by add and update use-cases.
//!
//! # Invariants
//! - `id` is stable and never reused for another movie.
//! - `title` is the application-level lookup key; uniqueness is a convention,
//!   not a store constraint.
//! - A movie passed to a write path must satisfy `Movie::validate()`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable document identifier for a stored movie.
pub type MovieId = Uuid;

/// Inclusive upper bound of the rating scale.
pub const MAX_RATING: f64 = 10.0;

/// Canonical movie document.
///
/// Serialized field names follow the external document shape
/// (`Title`, `YearReleased`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Movie {
    /// Document id. Not part of the caller-visible lookup key.
    pub id: MovieId,
    pub title: String,
    pub director: String,
    pub year_released: i32,
    pub genre: String,
    /// Running time in minutes.
    pub duration: i32,
    /// Score on a `0.0..=10.0` scale.
    pub rating: f64,
}

/// A single violated field constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieField {
    Title,
    Director,
    YearReleased,
    Genre,
    Duration,
    Rating,
}

impl MovieField {
    /// External document field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Director => "Director",
            Self::YearReleased => "YearReleased",
            Self::Genre => "Genre",
            Self::Duration => "Duration",
            Self::Rating => "Rating",
        }
    }

    fn constraint(self) -> &'static str {
        match self {
            Self::Title | Self::Director | Self::Genre => "is required",
            Self::YearReleased | Self::Duration => "must be greater than 0",
            Self::Rating => "must be between 0 and 10",
        }
    }
}

impl Display for MovieField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failure listing every violated field constraint.
///
/// Never empty when returned from [`Movie::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieValidationError {
    pub violations: Vec<MovieField>,
}

impl MovieValidationError {
    /// Returns whether `field` is among the violations.
    pub fn has(&self, field: MovieField) -> bool {
        self.violations.contains(&field)
    }
}

impl Display for MovieValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("invalid movie:")?;
        for (index, field) in self.violations.iter().enumerate() {
            let separator = if index == 0 { " " } else { "; " };
            write!(f, "{separator}{field} {}", field.constraint())?;
        }
        Ok(())
    }
}

impl Error for MovieValidationError {}

impl Movie {
    /// Creates a movie with a generated stable ID.
    ///
    /// This constructor does not validate; call [`Movie::validate`] or go
    /// through the service layer.
    pub fn new(
        title: impl Into<String>,
        director: impl Into<String>,
        year_released: i32,
        genre: impl Into<String>,
        duration: i32,
        rating: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            director: director.into(),
            year_released,
            genre: genre.into(),
            duration,
            rating,
        }
    }

    /// Checks every required field and collects all violations.
    pub fn validate(&self) -> Result<(), MovieValidationError> {
        let mut violations = Vec::new();

        if is_blank(&self.title) {
            violations.push(MovieField::Title);
        }
        if is_blank(&self.director) {
            violations.push(MovieField::Director);
        }
        if self.year_released <= 0 {
            violations.push(MovieField::YearReleased);
        }
        if is_blank(&self.genre) {
            violations.push(MovieField::Genre);
        }
        if self.duration <= 0 {
            violations.push(MovieField::Duration);
        }
        // NaN fails the range check as well.
        if !(0.0..=MAX_RATING).contains(&self.rating) {
            violations.push(MovieField::Rating);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(MovieValidationError { violations })
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::{Movie, MovieField};

    fn sample() -> Movie {
        Movie::new("Heat", "Michael Mann", 1995, "Crime", 170, 8.3)
    }

    #[test]
    fn valid_movie_passes_validation() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn validation_collects_every_violation() {
        let mut movie = sample();
        movie.title = "  ".to_string();
        movie.duration = 0;
        movie.rating = 11.0;

        let err = movie.validate().unwrap_err();
        assert_eq!(
            err.violations,
            vec![MovieField::Title, MovieField::Duration, MovieField::Rating]
        );
        assert_eq!(
            err.to_string(),
            "invalid movie: Title is required; Duration must be greater than 0; Rating must be between 0 and 10"
        );
    }

    #[test]
    fn nan_rating_is_rejected() {
        let mut movie = sample();
        movie.rating = f64::NAN;
        assert!(movie.validate().unwrap_err().has(MovieField::Rating));
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        let mut movie = sample();
        movie.rating = 0.0;
        assert!(movie.validate().is_ok());
        movie.rating = 10.0;
        assert!(movie.validate().is_ok());
    }

    #[test]
    fn serializes_with_document_field_names() {
        let movie = sample();
        let value = serde_json::to_value(&movie).unwrap();

        assert_eq!(value["Title"], "Heat");
        assert_eq!(value["YearReleased"], 1995);
        assert_eq!(value["Duration"], 170);
        assert_eq!(value["Id"], movie.id.to_string());

        let decoded: Movie = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, movie);
    }

    #[test]
    fn new_generates_distinct_ids() {
        assert_ne!(sample().id, sample().id);
    }
}
