//! Movie use-case service.
//!
//! # Responsibility
//! - Validate requests before they reach the repository.
//! - Translate repository outcomes into domain-level errors.
//!
//! # Invariants
//! - Invalid movies are never written; the store is not touched.
//! - Delete checks the argument, then existence, then deletes, in that order.
//! - `get_movie_by_title` reports a miss as `None`, while
//!   `search_by_title_fragment` reports zero hits as `NoTitleMatch`.

use crate::model::movie::{Movie, MovieId, MovieValidationError};
use crate::repo::movie_repo::{MovieRepository, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type ServiceResult<T> = Result<T, MovieServiceError>;

/// Service error for movie use-cases.
#[derive(Debug)]
pub enum MovieServiceError {
    /// One or more required fields are missing or out of range.
    Validation(MovieValidationError),
    /// Caller passed an unusable argument.
    InvalidArgument {
        name: &'static str,
        message: &'static str,
    },
    /// Operation targeted a title that does not exist.
    NotFound { title: String },
    /// Fragment search matched zero titles.
    NoTitleMatch { fragment: String },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for MovieServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidArgument { name, message } => write!(f, "{message} (parameter `{name}`)"),
            Self::NotFound { title } => write!(f, "Movie with title '{title}' not found."),
            Self::NoTitleMatch { fragment } => {
                write!(f, "No movies found with title containing '{fragment}'.")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MovieServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MovieValidationError> for MovieServiceError {
    fn from(value: MovieValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for MovieServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TitleNotFound(title) => Self::NotFound { title },
            RepoError::NoTitleMatch(fragment) => Self::NoTitleMatch { fragment },
            other => Self::Repo(other),
        }
    }
}

/// Use-case service wrapper for movie operations.
pub struct MovieService<R: MovieRepository> {
    repo: R,
}

impl<R: MovieRepository> MovieService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and inserts a new movie.
    ///
    /// No duplicate-title check is performed.
    pub fn add_movie(&self, movie: &Movie) -> ServiceResult<MovieId> {
        let started_at = Instant::now();
        if let Err(err) = movie.validate() {
            warn!(
                "event=movie_add module=service status=rejected violations={}",
                err.violations.len()
            );
            return Err(err.into());
        }

        let id = self.repo.insert_movie(movie)?;
        info!(
            "event=movie_add module=service status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(id)
    }

    /// Deletes the movie with exactly this title.
    ///
    /// # Errors
    /// - `InvalidArgument` for a blank title; the store is not queried.
    /// - `NotFound` when no movie carries the title.
    pub fn delete_movie(&self, title: &str) -> ServiceResult<()> {
        if title.trim().is_empty() {
            warn!("event=movie_delete module=service status=rejected reason=blank_title");
            return Err(MovieServiceError::InvalidArgument {
                name: "title",
                message: "title cannot be null or empty",
            });
        }

        let started_at = Instant::now();
        if self.repo.get_movie_by_title(title)?.is_none() {
            info!(
                "event=movie_delete module=service status=not_found title_len={}",
                title.len()
            );
            return Err(MovieServiceError::NotFound {
                title: title.to_string(),
            });
        }

        self.repo.delete_movie_by_title(title)?;
        info!(
            "event=movie_delete module=service status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Returns every stored movie; empty when the collection is empty.
    pub fn list_movies(&self) -> ServiceResult<Vec<Movie>> {
        Ok(self.repo.list_movies()?)
    }

    /// Returns the first movie with exactly this title, if any.
    pub fn get_movie_by_title(&self, title: &str) -> ServiceResult<Option<Movie>> {
        Ok(self.repo.get_movie_by_title(title)?)
    }

    /// Returns all movies whose title contains `fragment`.
    ///
    /// Fails with `NoTitleMatch` instead of returning an empty list.
    pub fn search_by_title_fragment(&self, fragment: &str) -> ServiceResult<Vec<Movie>> {
        let movies = self.repo.search_by_title_fragment(fragment)?;
        info!(
            "event=movie_search module=service status=ok hits={}",
            movies.len()
        );
        Ok(movies)
    }

    /// Validates and replaces the stored document identified by `movie.id`.
    ///
    /// The title may change; the document id ties the update to the record
    /// originally fetched by title.
    pub fn update_movie(&self, movie: &Movie) -> ServiceResult<()> {
        let started_at = Instant::now();
        if let Err(err) = movie.validate() {
            warn!(
                "event=movie_update module=service status=rejected violations={}",
                err.violations.len()
            );
            return Err(err.into());
        }

        self.repo.update_movie(movie)?;
        info!(
            "event=movie_update module=service status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Returns the number of stored movies.
    pub fn count_movies(&self) -> ServiceResult<u64> {
        Ok(self.repo.count_movies()?)
    }
}

#[cfg(test)]
mod tests {
    use super::{MovieService, MovieServiceError};
    use crate::model::movie::{Movie, MovieId};
    use crate::repo::movie_repo::{MovieRepository, RepoError, RepoResult};
    use std::cell::RefCell;

    /// Repository double that records every call it receives.
    #[derive(Default)]
    struct RecordingRepo {
        calls: RefCell<Vec<&'static str>>,
        stored: RefCell<Vec<Movie>>,
    }

    impl MovieRepository for RecordingRepo {
        fn insert_movie(&self, movie: &Movie) -> RepoResult<MovieId> {
            self.calls.borrow_mut().push("insert");
            self.stored.borrow_mut().push(movie.clone());
            Ok(movie.id)
        }

        fn list_movies(&self) -> RepoResult<Vec<Movie>> {
            self.calls.borrow_mut().push("list");
            Ok(self.stored.borrow().clone())
        }

        fn get_movie_by_title(&self, title: &str) -> RepoResult<Option<Movie>> {
            self.calls.borrow_mut().push("get");
            Ok(self
                .stored
                .borrow()
                .iter()
                .find(|movie| movie.title == title)
                .cloned())
        }

        fn search_by_title_fragment(&self, fragment: &str) -> RepoResult<Vec<Movie>> {
            self.calls.borrow_mut().push("search");
            Err(RepoError::NoTitleMatch(fragment.to_string()))
        }

        fn update_movie(&self, _movie: &Movie) -> RepoResult<()> {
            self.calls.borrow_mut().push("update");
            Ok(())
        }

        fn delete_movie_by_title(&self, title: &str) -> RepoResult<()> {
            self.calls.borrow_mut().push("delete");
            let mut stored = self.stored.borrow_mut();
            match stored.iter().position(|movie| movie.title == title) {
                Some(index) => {
                    stored.remove(index);
                    Ok(())
                }
                None => Err(RepoError::TitleNotFound(title.to_string())),
            }
        }

        fn count_movies(&self) -> RepoResult<u64> {
            self.calls.borrow_mut().push("count");
            Ok(self.stored.borrow().len() as u64)
        }
    }

    fn movie(title: &str) -> Movie {
        Movie::new(title, "Director", 2001, "Drama", 120, 7.5)
    }

    #[test]
    fn blank_title_delete_never_reaches_repository() {
        let repo = RecordingRepo::default();
        let service = MovieService::new(&repo);

        for title in ["", "   "] {
            let err = service.delete_movie(title).unwrap_err();
            assert!(matches!(
                err,
                MovieServiceError::InvalidArgument { name: "title", .. }
            ));
        }
        assert!(repo.calls.borrow().is_empty());
    }

    #[test]
    fn delete_checks_existence_before_deleting() {
        let repo = RecordingRepo::default();
        let service = MovieService::new(&repo);
        service.add_movie(&movie("Alien")).unwrap();

        service.delete_movie("Alien").unwrap();
        assert_eq!(*repo.calls.borrow(), vec!["insert", "get", "delete"]);
    }

    #[test]
    fn invalid_add_does_not_insert() {
        let repo = RecordingRepo::default();
        let service = MovieService::new(&repo);

        let mut invalid = movie("x");
        invalid.year_released = 0;
        let err = service.add_movie(&invalid).unwrap_err();
        assert!(matches!(err, MovieServiceError::Validation(_)));
        assert!(repo.calls.borrow().is_empty());
    }

    #[test]
    fn repository_title_miss_maps_to_not_found_message() {
        let err = MovieServiceError::from(RepoError::TitleNotFound("Gone".to_string()));
        assert_eq!(err.to_string(), "Movie with title 'Gone' not found.");
    }

    #[test]
    fn repository_search_miss_maps_to_no_title_match() {
        let repo = RecordingRepo::default();
        let service = MovieService::new(&repo);

        let err = service.search_by_title_fragment("zzz").unwrap_err();
        assert!(matches!(
            err,
            MovieServiceError::NoTitleMatch { ref fragment } if fragment == "zzz"
        ));
    }
}
