use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TryRecvError, TrySendError};
use std::sync::Mutex;

use super::{Lock, LockError};

/// Guard shaped as a bounded channel of capacity one: holding the lock means
/// the single slot is occupied, releasing means draining it.
///
/// Behaves like [`InMemoryLock`](super::InMemoryLock); waiters block in
/// `send` instead of on a condition variable.
pub struct TokenLock {
    slot: SyncSender<()>,
    drain: Mutex<Receiver<()>>,
}

impl TokenLock {
    pub fn new() -> Self {
        let (slot, drain) = sync_channel(1);
        TokenLock {
            slot,
            drain: Mutex::new(drain),
        }
    }
}

impl Default for TokenLock {
    fn default() -> Self {
        Self::new()
    }
}

impl Lock for TokenLock {
    fn lock(&self) -> Result<(), LockError> {
        self.slot
            .send(())
            .map_err(|e| LockError::AcquireFailed(e.to_string()))
    }

    fn try_lock(&self) -> Result<bool, LockError> {
        match self.slot.try_send(()) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(())) => Ok(false),
            Err(TrySendError::Disconnected(())) => {
                Err(LockError::AcquireFailed("token channel closed".into()))
            }
        }
    }

    fn unlock(&self) -> Result<(), LockError> {
        let drain = self
            .drain
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        match drain.try_recv() {
            Ok(()) | Err(TryRecvError::Empty) => Ok(()),
            Err(TryRecvError::Disconnected) => {
                Err(LockError::ReleaseFailed("token channel closed".into()))
            }
        }
    }
}
