//! Shared error types for the services crate.

use thiserror::Error;

use storage::sqlite::SqliteInitError;

/// Errors emitted while bootstrapping a store against durable storage.
///
/// Only opening the backend can fail. A missing or unreadable snapshot is not
/// an error: the store starts from seeded defaults instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreInitError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
