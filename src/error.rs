//! Error taxonomy surfaced by the engine.

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum EngineError {
    /// A referenced word, student or word-set does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input, rejected before any state is touched.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The store failed mid-operation. The whole unit of work was rolled back,
    /// so the call may be retried.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Sqlite(err))
    }
}

impl EngineError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
