use thiserror::Error;

/// Failure kinds surfaced by the service layer. Routes translate these into
/// redirects with a `?msg=` code, a rendered error page, or a 500.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// True when the underlying storage error is a UNIQUE constraint violation.
/// The schema's uniqueness backstops turn lost races into this, which the
/// services map back onto the same Conflict outcome the explicit existence
/// checks produce.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}
