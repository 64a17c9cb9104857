//! Mutex helpers.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex without surfacing poisoning.
///
/// Shared state guarded this way (call logs, canned responses) stays usable
/// after a panicking test thread.
pub trait IgnoreLock<T> {
    /// Lock, recovering the guard from a poisoned mutex.
    fn lock_ignore_poison(&self) -> MutexGuard<'_, T>;
}

impl<T> IgnoreLock<T> for Mutex<T> {
    fn lock_ignore_poison(&self) -> MutexGuard<'_, T> {
        self.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_poisoned_mutex_is_still_usable() {
        let shared = Arc::new(Mutex::new(1));
        let cloned = Arc::clone(&shared);
        let joined = thread::spawn(move || {
            let _guard = cloned.lock_ignore_poison();
            panic!("poison the lock");
        })
        .join();
        assert!(joined.is_err());
        assert!(shared.is_poisoned());
        *shared.lock_ignore_poison() += 1;
        assert_eq!(*shared.lock_ignore_poison(), 2);
    }
}
