//! Movie repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and title-search APIs over the `movies` collection.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Title matching is exact and case-sensitive; fragment matching is a
//!   case-sensitive substring test.
//! - Exact-title lookup misses return `None`; fragment searches with zero
//!   hits fail with `NoTitleMatch`.
//! - Multi-row reads are ordered by insertion.

use crate::db::{verify_schema, DbError};
use crate::model::movie::{Movie, MovieId};
use rusqlite::{params, Connection, Row, Rows};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const MOVIES_TABLE: &str = "movies";
const MOVIE_COLUMNS: &[&str] = &[
    "id",
    "title",
    "director",
    "year_released",
    "genre",
    "duration",
    "rating",
];

const MOVIE_SELECT_SQL: &str = "SELECT
    id,
    title,
    director,
    year_released,
    genre,
    duration,
    rating
FROM movies";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for movie persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// No document carries the given id.
    NotFound(MovieId),
    /// No document carries the given exact title.
    TitleNotFound(String),
    /// A fragment search matched zero documents.
    NoTitleMatch(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "movie not found: {id}"),
            Self::TitleNotFound(title) => write!(f, "no movie with title '{title}'"),
            Self::NoTitleMatch(fragment) => {
                write!(f, "no movies found with title containing '{fragment}'")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted movie data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for movie documents.
pub trait MovieRepository {
    fn insert_movie(&self, movie: &Movie) -> RepoResult<MovieId>;
    fn list_movies(&self) -> RepoResult<Vec<Movie>>;
    fn get_movie_by_title(&self, title: &str) -> RepoResult<Option<Movie>>;
    fn search_by_title_fragment(&self, fragment: &str) -> RepoResult<Vec<Movie>>;
    fn update_movie(&self, movie: &Movie) -> RepoResult<()>;
    fn delete_movie_by_title(&self, title: &str) -> RepoResult<()>;
    fn count_movies(&self) -> RepoResult<u64>;
}

impl<R: MovieRepository + ?Sized> MovieRepository for &R {
    fn insert_movie(&self, movie: &Movie) -> RepoResult<MovieId> {
        (**self).insert_movie(movie)
    }

    fn list_movies(&self) -> RepoResult<Vec<Movie>> {
        (**self).list_movies()
    }

    fn get_movie_by_title(&self, title: &str) -> RepoResult<Option<Movie>> {
        (**self).get_movie_by_title(title)
    }

    fn search_by_title_fragment(&self, fragment: &str) -> RepoResult<Vec<Movie>> {
        (**self).search_by_title_fragment(fragment)
    }

    fn update_movie(&self, movie: &Movie) -> RepoResult<()> {
        (**self).update_movie(movie)
    }

    fn delete_movie_by_title(&self, title: &str) -> RepoResult<()> {
        (**self).delete_movie_by_title(title)
    }

    fn count_movies(&self) -> RepoResult<u64> {
        (**self).count_movies()
    }
}

/// SQLite-backed movie repository.
pub struct SqliteMovieRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMovieRepository<'conn> {
    /// Wraps a connection opened through [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`].
    ///
    /// # Errors
    /// - `RepoError::Db` when the schema version or `movies` layout does not
    ///   match this binary.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        verify_schema(conn, MOVIES_TABLE, MOVIE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl MovieRepository for SqliteMovieRepository<'_> {
    fn insert_movie(&self, movie: &Movie) -> RepoResult<MovieId> {
        self.conn.execute(
            "INSERT INTO movies (
                id,
                title,
                director,
                year_released,
                genre,
                duration,
                rating
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                movie.id.to_string(),
                movie.title.as_str(),
                movie.director.as_str(),
                movie.year_released,
                movie.genre.as_str(),
                movie.duration,
                movie.rating,
            ],
        )?;

        Ok(movie.id)
    }

    fn list_movies(&self) -> RepoResult<Vec<Movie>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MOVIE_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let rows = stmt.query([])?;
        collect_movies(rows)
    }

    fn get_movie_by_title(&self, title: &str) -> RepoResult<Option<Movie>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MOVIE_SELECT_SQL}
             WHERE title = ?1
             ORDER BY rowid ASC
             LIMIT 1;"
        ))?;

        let mut rows = stmt.query([title])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_movie_row(row)?)),
            None => Ok(None),
        }
    }

    fn search_by_title_fragment(&self, fragment: &str) -> RepoResult<Vec<Movie>> {
        // `instr` is byte-wise, unlike `LIKE` which folds ASCII case.
        let mut stmt = self.conn.prepare(&format!(
            "{MOVIE_SELECT_SQL}
             WHERE instr(title, ?1) > 0
             ORDER BY rowid ASC;"
        ))?;

        let movies = collect_movies(stmt.query([fragment])?)?;
        if movies.is_empty() {
            return Err(RepoError::NoTitleMatch(fragment.to_string()));
        }

        Ok(movies)
    }

    fn update_movie(&self, movie: &Movie) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE movies
             SET
                title = ?1,
                director = ?2,
                year_released = ?3,
                genre = ?4,
                duration = ?5,
                rating = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?7;",
            params![
                movie.title.as_str(),
                movie.director.as_str(),
                movie.year_released,
                movie.genre.as_str(),
                movie.duration,
                movie.rating,
                movie.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(movie.id));
        }

        Ok(())
    }

    fn delete_movie_by_title(&self, title: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM movies
             WHERE rowid = (
                SELECT rowid FROM movies
                WHERE title = ?1
                ORDER BY rowid ASC
                LIMIT 1
             );",
            [title],
        )?;

        if changed == 0 {
            return Err(RepoError::TitleNotFound(title.to_string()));
        }

        Ok(())
    }

    fn count_movies(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM movies;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative movie count `{count}`")))
    }
}

fn collect_movies(mut rows: Rows<'_>) -> RepoResult<Vec<Movie>> {
    let mut movies = Vec::new();
    while let Some(row) = rows.next()? {
        movies.push(parse_movie_row(row)?);
    }
    Ok(movies)
}

fn parse_movie_row(row: &Row<'_>) -> RepoResult<Movie> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in movies.id"))
    })?;

    Ok(Movie {
        id,
        title: row.get("title")?,
        director: row.get("director")?,
        year_released: row.get("year_released")?,
        genre: row.get("genre")?,
        duration: row.get("duration")?,
        rating: row.get("rating")?,
    })
}
