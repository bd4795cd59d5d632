use diesel::r2d2::PoolError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("{0}")]
    Invalid(String),
    #[error("record not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl TodoError {
    /// Errors caused by the caller's input rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(self, TodoError::Invalid(_))
    }
}

pub type TodoResult<T> = std::result::Result<T, TodoError>;
