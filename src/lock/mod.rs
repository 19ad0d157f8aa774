//! Concurrency guard for the catalog file.
//!
//! A single capacity-one token that every mutating store operation holds
//! for its whole duration. Readers never take it.

mod error;
mod guard;
mod in_memory;
mod lock;
mod token;

pub use error::LockError;
pub use guard::LockGuard;
pub use in_memory::InMemoryLock;
pub use lock::Lock;
pub use token::TokenLock;
