use tracing::error;

use super::{Lock, LockError};

/// Holds a [`Lock`] for its lifetime and releases it on drop, including
/// when the holder returns early with an error or unwinds.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard<'a, L: Lock + ?Sized> {
    lock: &'a L,
}

impl<'a, L: Lock + ?Sized> LockGuard<'a, L> {
    /// Block until `lock` is free, then hold it.
    pub fn acquire(lock: &'a L) -> Result<Self, LockError> {
        lock.lock()?;
        Ok(LockGuard { lock })
    }

    /// Hold `lock` only if it is free right now.
    pub fn try_acquire(lock: &'a L) -> Result<Option<Self>, LockError> {
        Ok(lock.try_lock()?.then(|| LockGuard { lock }))
    }
}

impl<L: Lock + ?Sized> Drop for LockGuard<'_, L> {
    fn drop(&mut self) {
        if let Err(err) = self.lock.unlock() {
            error!(%err, "failed to release catalog lock");
        }
    }
}
