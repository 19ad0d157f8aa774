//! Record store: the durable catalog table.
//!
//! Reads are full sequential scans and never take the guard. Every mutation
//! (`create`, `modify`, `update`) holds the store's [`Lock`](crate::lock::Lock)
//! from start to finish, so id assignment, duplicate detection and rewrites
//! are serialized across all sessions of the process.
//!
//! ## Example
//!
//! ```no_run
//! use book_catalog::store::{FileStore, ReadBooks, WriteBooks};
//! use book_catalog::book::{Book, Field};
//!
//! let store = FileStore::open("books");
//! let mut book = Book::new();
//! book.name = "Dead Souls".into();
//! book.authors = "Gogol".into();
//! let created = store.create(book)?;
//! assert_eq!(store.search(Field::Id, &created.id)?.len(), 1);
//! # Ok::<(), book_catalog::StoreError>(())
//! ```

mod backup;
mod file;

pub use backup::{Backup, DirectoryBackup, NoBackup};
pub use file::{FileStore, Recovery};

use crate::book::{Book, Field};
use crate::error::StoreError;

/// What `modify` does with each matching line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyMode {
    /// Write the caller's replacement in place of the stored line.
    Update,
    /// Drop the stored line.
    Delete,
}

/// Records touched by a successful `modify`, in file order.
///
/// For `Update` these are the replacements; for `Delete`, the removed records
/// as they were stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyReport {
    pub mode: ModifyMode,
    pub affected: Vec<Book>,
}

/// Read-side operations. None of them block on the guard.
pub trait ReadBooks {
    /// Id of the last non-empty line plus one, or `1` for an empty table.
    fn next_id(&self) -> Result<u64, StoreError>;

    /// `true` when no stored record has the same (name, authors) pair.
    fn is_unique(&self, book: &Book) -> Result<bool, StoreError>;

    fn read_all(&self) -> Result<Vec<Book>, StoreError>;

    /// Exact match for id/year/width/height (id stops at the first hit),
    /// case-insensitive substring match for everything else.
    fn search(&self, field: Field, value: &str) -> Result<Vec<Book>, StoreError>;

    /// Like [`search`](ReadBooks::search) with the field given by wire name.
    /// An unknown name matches nothing.
    fn search_by_name(&self, field: &str, value: &str) -> Result<Vec<Book>, StoreError> {
        match field.parse::<Field>() {
            Ok(field) => self.search(field, value),
            Err(_) => Ok(Vec::new()),
        }
    }
}

/// Mutations. Each runs to completion under the guard once it has it.
pub trait WriteBooks {
    /// Assigns the next id, rejects a duplicate (name, authors) pair, and
    /// appends. Returns the stored record.
    fn create(&self, book: Book) -> Result<Book, StoreError>;

    /// Streams the table into a side file, replacing or dropping lines whose
    /// id is among `targets`, then swaps it over the original. Fails with
    /// `NotFound` (leaving the file untouched) when no target id is present.
    fn modify(&self, targets: &[Book], mode: ModifyMode) -> Result<ModifyReport, StoreError>;

    /// Replaces the record with the same id, rewriting the whole table.
    fn update(&self, book: Book) -> Result<Book, StoreError>;

    fn delete(&self, ids: &[&str]) -> Result<ModifyReport, StoreError> {
        let targets: Vec<Book> = ids.iter().map(|id| Book::with_id(*id)).collect();
        self.modify(&targets, ModifyMode::Delete)
    }
}

/// Full store: anything that reads and writes books and can be shared
/// between session threads.
pub trait BookStore: ReadBooks + WriteBooks + Send + Sync {}

impl<T> BookStore for T where T: ReadBooks + WriteBooks + Send + Sync {}
