//! SQLite database connection pool and migration runner.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;

use crate::config::DatabaseConfig;
use crate::error::{RepoResult, RepositoryError};

/// Holds a connection pool to the SQLite database.
///
/// Shared by the direct-SQL and ORM backends; construct it once at startup
/// and hand clones of [`Database::pool`] to each repository.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect using the configured parameters. Only the `sqlite` protocol
    /// is compiled in.
    pub async fn connect(config: &DatabaseConfig) -> RepoResult<Self> {
        let url = config.connection_url();
        if !url.starts_with("sqlite:") {
            return Err(RepositoryError::Config(format!(
                "unsupported database protocol in '{}'",
                redact(&url)
            )));
        }

        if url == "sqlite::memory:" {
            return Self::new_in_memory().await;
        }

        let path = url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
        Self::open(Path::new(path)).await
    }

    /// Open (or create) the database at `path`, run migrations, and return
    /// a ready-to-use `Database`.
    pub async fn open(path: &Path) -> RepoResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.run_migrations().await?;
        tracing::info!(path = %path.display(), "Opened SQLite database");
        Ok(db)
    }

    /// Create an in-memory database. Migrations are applied.
    ///
    /// The pool is capped at one connection: every new in-memory connection
    /// would otherwise see its own empty database.
    pub async fn new_in_memory() -> RepoResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Run embedded migrations from `store/migrations/`.
    async fn run_migrations(&self) -> RepoResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Strip the password out of a connection URL before it reaches a log line
/// or error message.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let credentials = &url[scheme_end + 3..at];
            match credentials.split_once(':') {
                Some((user, _)) => format!("{}{user}:***{}", &url[..scheme_end + 3], &url[at..]),
                None => url.to_string(),
            }
        }
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = Database::new_in_memory().await.unwrap();
        let row: (i64,) = sqlx::query_as("SELECT 1")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(row.0, 1);
    }

    #[tokio::test]
    async fn test_migrations_create_tables() {
        let db = Database::new_in_memory().await.unwrap();
        let tables: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
                .fetch_all(db.pool())
                .await
                .unwrap();
        let names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        for table in ["AGENT", "MAP", "MATCH", "PLAYER", "WEAPON", "MATCH_PLAYER"] {
            assert!(names.contains(&table), "missing table {table}");
        }
    }

    #[tokio::test]
    async fn test_open_file_based() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("valorant.db");
        let db = Database::open(&db_path).await.unwrap();
        let row: (i64,) = sqlx::query_as("SELECT 1")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(row.0, 1);
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_connect_with_sqlite_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            database: dir.path().join("valorant.db").display().to_string(),
            ..DatabaseConfig::default()
        };
        Database::connect(&config).await.unwrap();
        assert!(dir.path().join("valorant.db").exists());
    }

    #[tokio::test]
    async fn test_connect_rejects_other_protocols() {
        let config = DatabaseConfig {
            protocol: "postgres".to_string(),
            host: "localhost".to_string(),
            database: "valorant".to_string(),
            user: "admin".to_string(),
            password: "secret".to_string(),
            url: None,
        };
        let err = Database::connect(&config).await.err().unwrap();
        assert!(matches!(err, RepositoryError::Config(_)));
        assert!(!err.to_string().contains("secret"));
    }
}
