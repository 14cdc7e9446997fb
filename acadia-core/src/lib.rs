pub mod models;
pub mod repository;

/// Failure reported by a store operation. Constraint violations arrive as
/// `Database` errors; the boundary above collapses both variants into a
/// single failure signal, so callers never branch on the cause.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no active row matched")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
