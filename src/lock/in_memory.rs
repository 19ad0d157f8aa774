use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use super::{Lock, LockError};

fn poisoned<T>(err: PoisonError<T>) -> LockError {
    LockError::Poisoned(err.to_string())
}

/// Process-wide guard: a held flag plus a condition variable waiters park on.
///
/// This is the default guard of a [`FileStore`](crate::store::FileStore):
/// one instance is owned by the store and shared by every session through
/// the store's `Arc`.
#[derive(Default)]
pub struct InMemoryLock {
    held: Mutex<bool>,
    released: Condvar,
}

impl InMemoryLock {
    pub fn new() -> Self {
        Self::default()
    }

    fn held(&self) -> Result<MutexGuard<'_, bool>, LockError> {
        self.held.lock().map_err(poisoned)
    }
}

impl Lock for InMemoryLock {
    fn lock(&self) -> Result<(), LockError> {
        let held = self.held()?;
        let mut held = self
            .released
            .wait_while(held, |held| *held)
            .map_err(poisoned)?;
        *held = true;
        Ok(())
    }

    fn try_lock(&self) -> Result<bool, LockError> {
        let mut held = self.held()?;
        let acquired = !*held;
        *held = true;
        Ok(acquired)
    }

    fn unlock(&self) -> Result<(), LockError> {
        let mut held = self.held()?;
        if std::mem::replace(&mut *held, false) {
            self.released.notify_one();
        }
        Ok(())
    }
}
