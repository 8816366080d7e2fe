//! Errors raised while driving the console menus.

use valorant_store::RepositoryError;

/// A user answer that could not be turned into a field value.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("'{0}' is not a valid id")]
    InvalidId(String),

    #[error("{field} must be a number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} must look like YYYY-MM-DDTHH:MM:SS, got '{value}'")]
    InvalidTimestamp { field: &'static str, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum BackOfficeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("Operation failed: {0}")]
    Repository(#[from] RepositoryError),

    /// Standard input closed; treated like `exit`.
    #[error("End of input")]
    EndOfInput,
}
