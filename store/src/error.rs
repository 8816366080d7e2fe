//! Errors surfaced across the repository boundary.
//!
//! "Not found" is never an error here: lookups return `Option`/empty
//! collections. Everything below is a store failure the caller cannot fix
//! by retrying the same call.

/// Result alias for repository operations.
pub type RepoResult<T> = Result<T, RepositoryError>;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("ORM error: {0}")]
    Orm(#[from] sea_orm::DbErr),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The largest stored id is `i64::MAX`; no new id can be assigned.
    #[error("No {0} ids left to assign")]
    IdsExhausted(&'static str),
}

impl From<sea_orm::TransactionError<sea_orm::DbErr>> for RepositoryError {
    fn from(err: sea_orm::TransactionError<sea_orm::DbErr>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(e) | sea_orm::TransactionError::Transaction(e) => {
                RepositoryError::Orm(e)
            }
        }
    }
}
