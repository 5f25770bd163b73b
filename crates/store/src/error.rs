//! Store errors
//!
//! The store does not classify failures. Database errors are carried as-is so
//! the caller can decide how to report them.

use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No live row matched the lookup
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl StoreError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
