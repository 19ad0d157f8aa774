use thiserror::Error;

/// Error type for guard operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    /// The underlying primitive was poisoned (a thread panicked while holding it).
    #[error("lock poisoned: {0}")]
    Poisoned(String),
    /// The token could not be taken.
    #[error("lock acquire failed: {0}")]
    AcquireFailed(String),
    /// The token could not be handed back.
    #[error("lock release failed: {0}")]
    ReleaseFailed(String),
}
