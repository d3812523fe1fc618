//! Shared error mapping for the in-memory stores

use application::ApplicationError;
use thiserror::Error;

/// Storage-level failures raised by the stores
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write would duplicate a value covered by a unique index
    #[error("unique index {index} already contains {key}")]
    UniqueViolation { index: &'static str, key: String },

    /// An update or delete targeted a row that does not exist
    #[error("{entity} {id} does not exist")]
    MissingRow { entity: &'static str, id: String },

    /// A first-row insert found the table already populated
    #[error("{table} already has rows")]
    NotEmpty { table: &'static str },
}

impl From<StoreError> for ApplicationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { index, .. } => {
                Self::Conflict(format!("{index} is already in use"))
            },
            StoreError::MissingRow { entity, id } => Self::NotFound { entity, id },
            StoreError::NotEmpty { table } => Self::Conflict(format!("{table} already has rows")),
        }
    }
}
