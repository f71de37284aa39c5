//! Command-line front end for the movie catalog.
//!
//! # Responsibility
//! - Map subcommands onto `MovieService` use-cases.
//! - Print movies as JSON documents on stdout.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use movie_core::{CatalogConfig, Movie, MovieService, SqliteMovieRepository};
use std::path::PathBuf;

/// Manage the movie catalog
#[derive(Parser, Debug)]
#[command(name = "movies")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML config file with `[database]` and `[logging]` tables
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SQLite file; overrides `[database].path`
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a new movie
    Add(MovieArgs),
    /// Show the movie with exactly this title
    Get { title: String },
    /// List every movie
    List,
    /// List movies whose title contains FRAGMENT (case-sensitive)
    Search { fragment: String },
    /// Replace fields of the movie currently titled TITLE
    Update {
        title: String,
        #[command(flatten)]
        changes: MovieChanges,
    },
    /// Delete the movie with exactly this title
    Delete { title: String },
    /// Print the number of stored movies
    Count,
}

#[derive(Args, Debug)]
struct MovieArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    director: String,
    #[arg(long)]
    year: i32,
    #[arg(long)]
    genre: String,
    /// Running time in minutes
    #[arg(long)]
    duration: i32,
    #[arg(long)]
    rating: f64,
}

#[derive(Args, Debug)]
struct MovieChanges {
    #[arg(long)]
    new_title: Option<String>,
    #[arg(long)]
    director: Option<String>,
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    genre: Option<String>,
    #[arg(long)]
    duration: Option<i32>,
    #[arg(long)]
    rating: Option<f64>,
}

impl MovieChanges {
    fn apply(self, movie: &mut Movie) {
        if let Some(title) = self.new_title {
            movie.title = title;
        }
        if let Some(director) = self.director {
            movie.director = director;
        }
        if let Some(year) = self.year {
            movie.year_released = year;
        }
        if let Some(genre) = self.genre {
            movie.genre = genre;
        }
        if let Some(duration) = self.duration {
            movie.duration = duration;
        }
        if let Some(rating) = self.rating {
            movie.rating = rating;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config.as_deref() {
        Some(path) => CatalogConfig::load(path)
            .with_context(|| format!("loading config `{}`", path.display()))?,
        None => CatalogConfig::default(),
    };
    if cli.db.is_some() {
        config.database.path = cli.db;
    }
    config.init_logging()?;

    let conn = config.open_store().context("opening movie store")?;
    let service = MovieService::new(SqliteMovieRepository::try_new(&conn)?);
    info!("event=cli_start module=cli status=ok version={}", movie_core::core_version());

    match cli.command {
        Command::Add(args) => {
            let movie = Movie::new(
                args.title,
                args.director,
                args.year,
                args.genre,
                args.duration,
                args.rating,
            );
            service.add_movie(&movie)?;
            print_json(&movie)?;
        }
        Command::Get { title } => match service.get_movie_by_title(&title)? {
            Some(movie) => print_json(&movie)?,
            None => bail!("no movie titled '{title}'"),
        },
        Command::List => print_json(&service.list_movies()?)?,
        Command::Search { fragment } => {
            print_json(&service.search_by_title_fragment(&fragment)?)?
        }
        Command::Update { title, changes } => {
            let Some(mut movie) = service.get_movie_by_title(&title)? else {
                bail!("Movie with title '{title}' not found.");
            };
            changes.apply(&mut movie);
            service.update_movie(&movie)?;
            print_json(&movie)?;
        }
        Command::Delete { title } => service.delete_movie(&title)?,
        Command::Count => println!("{}", service.count_movies()?),
    }

    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
