use thiserror::Error;

use crate::auth::AuthError;
use crate::database::DatabaseError;
use crate::filter::FilterError;
use crate::sql::SqlError;

/// Closed set of outcomes an entity operation can fail with.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    /// Anything the storage layer did not expect; not for clients to see.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Conflict,
    Unauthorized,
    Internal,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::BadRequest(_) => ErrorKind::BadRequest,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Conflict(_) => ErrorKind::Conflict,
            ServiceError::Unauthorized(_) => ErrorKind::Unauthorized,
            ServiceError::Database(_) | ServiceError::Auth(_) => ErrorKind::Internal,
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(e) if e.is_unique_violation() => ServiceError::Conflict(e.message().to_string()),
            err => ServiceError::Database(DatabaseError::Sqlx(err)),
        }
    }
}

impl From<SqlError> for ServiceError {
    fn from(err: SqlError) -> Self {
        ServiceError::BadRequest(err.to_string())
    }
}

impl From<FilterError> for ServiceError {
    fn from(err: FilterError) -> Self {
        ServiceError::BadRequest(err.to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
