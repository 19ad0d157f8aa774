use super::LockError;

/// A capacity-one token serializing every mutation of the catalog file.
///
/// `lock` blocks without a timeout until the token is free. Callers normally
/// go through [`LockGuard::acquire`](super::LockGuard::acquire) so the token
/// is handed back on every exit path.
pub trait Lock: Send + Sync {
    /// Acquire the token, blocking until it becomes available.
    fn lock(&self) -> Result<(), LockError>;

    /// Try to acquire the token without blocking.
    /// Returns `Ok(true)` if acquired, `Ok(false)` if already held.
    fn try_lock(&self) -> Result<bool, LockError>;

    /// Release the token. Releasing a free token is a no-op.
    fn unlock(&self) -> Result<(), LockError>;
}
