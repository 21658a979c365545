use thiserror::Error;

/// Storage-level failures. There is no `NotFound` variant on purpose:
/// lookups return `Result<Option<T>, RepositoryError>` so callers can tell
/// a missing row apart from a broken store.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to check out a database connection: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("database query failed: {0}")]
    Query(#[from] diesel::result::Error),
}
