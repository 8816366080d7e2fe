//! Error types for the HTTP front end.

use valorant_store::RepositoryError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of a single routed request.
///
/// `NotFound` becomes a 404; every other variant is reported as a 500 with
/// the message as body.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid id '{0}'")]
    InvalidId(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Failure of the listening socket itself.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Socket error: {0}")]
    Io(#[from] std::io::Error),
}
