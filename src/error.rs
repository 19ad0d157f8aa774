use std::io;

use thiserror::Error;

use crate::lock::LockError;

/// Failures of a record store operation.
///
/// None of these terminate a session; the session layer turns each one into
/// a single reply line.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Open, read, write, sync or rename of the catalog or its side file failed.
    #[error("storage error during {op}: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    /// A stored line does not split into 12 fields. Aborts the whole
    /// operation that encountered it.
    #[error("malformed record on line {line}: expected 12 fields, found {found}")]
    MalformedRecord { line: usize, found: usize },

    /// A stored id is not a positive integer.
    #[error("malformed id {0:?} in catalog")]
    InvalidId(String),

    #[error("book already exists: {name} by {authors}")]
    DuplicateRecord { name: String, authors: String },

    /// None of the targeted ids exist.
    #[error("no books found with id {0}")]
    NotFound(String),

    #[error(transparent)]
    Lock(#[from] LockError),

    /// The pre-mutation backup failed and the mutation was not attempted.
    #[error("backup failed: {0}")]
    Backup(String),
}

impl StoreError {
    pub(crate) fn io(op: &'static str) -> impl FnOnce(io::Error) -> StoreError {
        move |source| StoreError::Io { op, source }
    }
}
