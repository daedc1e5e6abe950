//! Lock poisoning helpers
//!
//! Stores guard their state with std mutexes. A poisoned lock means a thread
//! panicked mid-operation; callers get an error value instead of a panic.

use std::sync::LockResult;

/// Convert a poisoned lock (or condvar wait) result into an application error
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use rpsqueue::core::sync::handle_lock_poison;
/// use rpsqueue::store::StoreError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_lock_poison(mutex.lock(), "counter", StoreError::command).unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_lock_poison<T, E>(
    result: LockResult<T>,
    what: &str,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|_| {
        error_constructor(format!(
            "{} lock poisoned: a thread panicked while holding it",
            what
        ))
    })
}
