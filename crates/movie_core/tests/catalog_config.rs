use movie_core::{CatalogConfig, ConfigError, Movie, MovieService, SqliteMovieRepository};
use std::io::Write;

#[test]
fn load_reads_config_file_and_opens_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("catalog.sqlite3");
    let config_path = dir.path().join("catalog.toml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    writeln!(file, "[database]").unwrap();
    writeln!(file, "path = {:?}", db_path.to_str().unwrap()).unwrap();
    drop(file);

    let config = CatalogConfig::load(&config_path).unwrap();
    assert_eq!(config.database.path.as_deref(), Some(db_path.as_path()));

    {
        let conn = config.open_store().unwrap();
        let service = MovieService::new(SqliteMovieRepository::try_new(&conn).unwrap());
        service
            .add_movie(&Movie::new("Configured", "D", 2015, "Drama", 95, 7.7))
            .unwrap();
    }

    let conn = config.open_store().unwrap();
    let service = MovieService::new(SqliteMovieRepository::try_new(&conn).unwrap());
    assert_eq!(service.count_movies().unwrap(), 1);
}

#[test]
fn default_config_opens_in_memory_store() {
    let config = CatalogConfig::default();
    let conn = config.open_store().unwrap();
    let service = MovieService::new(SqliteMovieRepository::try_new(&conn).unwrap());
    assert!(service.list_movies().unwrap().is_empty());
}

#[test]
fn load_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    match CatalogConfig::load(&missing).unwrap_err() {
        ConfigError::Io { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn relative_log_dir_is_rejected_at_init() {
    let config = CatalogConfig::from_toml_str("[logging]\ndir = \"relative/logs\"\n").unwrap();
    let err = config.init_logging().unwrap_err();
    assert!(matches!(err, ConfigError::Logging(ref message) if message.contains("absolute")));
}
