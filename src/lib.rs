//! Networked book catalog.
//!
//! Clients talk a line-oriented menu protocol ([`session`]); every field they
//! enter passes through [`validate`]; records live in a pipe-delimited file
//! ([`store`]) whose writers are serialized by a capacity-one [`lock`].
//! The `server` feature adds the tokio TCP front end and the binaries.

pub mod book;
mod error;
pub mod lock;
pub mod session;
pub mod store;
pub mod validate;

#[cfg(feature = "server")]
pub mod server;

pub use book::{Book, Cover, Field, Source};
pub use error::StoreError;
pub use lock::{InMemoryLock, Lock, LockError, LockGuard, TokenLock};
pub use session::{Reply, Session};
pub use store::{
    Backup, BookStore, DirectoryBackup, FileStore, ModifyMode, ModifyReport, NoBackup, ReadBooks,
    Recovery, WriteBooks,
};
pub use validate::ValidationError;
