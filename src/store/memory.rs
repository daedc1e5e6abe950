//! In-process key-value store
//!
//! Mirrors the subset of Redis semantics the queue layer depends on: string
//! values with expiry, integer counters stored as strings, sets, and lists
//! with blocking pops. Empty sets and lists disappear, as they do in Redis.

use crate::core::sync::handle_lock_poison;
use crate::core::time::{SystemTimeProvider, TimeProvider};
use crate::store::{KeyValueStore, StoreError, StoreResult};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
enum Value {
    Str {
        value: String,
        expires_at: Option<Instant>,
    },
    Set(BTreeSet<String>),
    List(VecDeque<String>),
}

#[derive(Debug, Default)]
struct State {
    entries: HashMap<String, Value>,
}

/// Thread-safe in-memory store
///
/// Blocked `blocking_pop_head` callers are woken whenever an element is
/// pushed, and fail with [`StoreError::Unavailable`] when the store is marked
/// disconnected while they wait.
pub struct MemoryStore {
    state: Mutex<State>,
    pushed: Condvar,
    connected: AtomicBool,
    clock: Arc<dyn TimeProvider>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemTimeProvider))
    }

    /// Create a store whose TTL expiry is driven by `clock`
    pub fn with_clock(clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            pushed: Condvar::new(),
            connected: AtomicBool::new(true),
            clock,
        }
    }

    /// Simulate losing (or regaining) the connection
    pub fn set_connected(&self, connected: bool) {
        // Flip under the lock so a waiter cannot miss the wakeup
        let _state = self.lock();
        self.connected.store(connected, Ordering::SeqCst);
        if !connected {
            self.pushed.notify_all();
        }
    }

    /// Whether `key` currently holds a live value of any type
    pub fn contains_key(&self, key: &str) -> StoreResult<bool> {
        let now = self.clock.now();
        let mut state = self.lock()?;
        Self::purge_if_expired(&mut state, key, now);
        Ok(state.entries.contains_key(key))
    }

    /// Length of the list at `key` (0 when absent)
    pub fn list_len(&self, key: &str) -> StoreResult<usize> {
        let state = self.lock()?;
        match state.entries.get(key) {
            None => Ok(0),
            Some(Value::List(list)) => Ok(list.len()),
            Some(_) => Err(wrong_type(key)),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, State>> {
        handle_lock_poison(self.state.lock(), "memory store", StoreError::command)
    }

    fn ensure_connected(&self) -> StoreResult<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::unavailable("memory store disconnected"))
        }
    }

    fn purge_if_expired(state: &mut State, key: &str, now: Instant) {
        let expired = matches!(
            state.entries.get(key),
            Some(Value::Str { expires_at: Some(at), .. }) if *at <= now
        );
        if expired {
            state.entries.remove(key);
        }
    }

    /// Drop every string entry whose expiry has passed
    fn sweep_expired(state: &mut State, now: Instant) {
        state.entries.retain(|_, value| {
            !matches!(value, Value::Str { expires_at: Some(at), .. } if *at <= now)
        });
    }

    fn pop_front(state: &mut State, key: &str) -> StoreResult<Option<String>> {
        let (value, now_empty) = match state.entries.get_mut(key) {
            None => return Ok(None),
            Some(Value::List(list)) => {
                let value = list.pop_front();
                (value, list.is_empty())
            }
            Some(_) => return Err(wrong_type(key)),
        };
        if now_empty {
            state.entries.remove(key);
        }
        Ok(value)
    }
}

fn wrong_type(key: &str) -> StoreError {
    StoreError::command(format!(
        "WRONGTYPE operation against key '{}' holding the wrong kind of value",
        key
    ))
}

impl KeyValueStore for MemoryStore {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn increment(&self, key: &str) -> StoreResult<i64> {
        self.ensure_connected()?;
        let now = self.clock.now();
        let mut state = self.lock()?;
        Self::purge_if_expired(&mut state, key, now);

        let (current, expires_at) = match state.entries.get(key) {
            None => (0, None),
            Some(Value::Str { value, expires_at }) => {
                let parsed = value.parse::<i64>().map_err(|_| {
                    StoreError::command(format!("value at '{}' is not an integer", key))
                })?;
                (parsed, *expires_at)
            }
            Some(_) => return Err(wrong_type(key)),
        };

        let next = current
            .checked_add(1)
            .ok_or_else(|| StoreError::command(format!("increment of '{}' overflows", key)))?;
        state.entries.insert(
            key.to_string(),
            Value::Str {
                value: next.to_string(),
                expires_at,
            },
        );
        Ok(next)
    }

    fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        self.ensure_connected()?;
        if ttl.is_zero() {
            return Err(StoreError::command("invalid expire time in 'setex' command"));
        }
        let now = self.clock.now();
        let expires_at = now.checked_add(ttl).ok_or_else(|| {
            StoreError::command("invalid expire time in 'setex' command")
        })?;
        let mut state = self.lock()?;
        Self::sweep_expired(&mut state, now);
        state.entries.insert(
            key.to_string(),
            Value::Str {
                value: value.to_string(),
                expires_at: Some(expires_at),
            },
        );
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.ensure_connected()?;
        let now = self.clock.now();
        let mut state = self.lock()?;
        Self::purge_if_expired(&mut state, key, now);
        match state.entries.get(key) {
            None => Ok(None),
            Some(Value::Str { value, .. }) => Ok(Some(value.clone())),
            Some(_) => Err(wrong_type(key)),
        }
    }

    fn add_to_set(&self, key: &str, member: &str) -> StoreResult<()> {
        self.ensure_connected()?;
        let mut state = self.lock()?;
        match state
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Value::Set(BTreeSet::new()))
        {
            Value::Set(set) => {
                set.insert(member.to_string());
                Ok(())
            }
            _ => Err(wrong_type(key)),
        }
    }

    fn remove_from_set(&self, key: &str, member: &str) -> StoreResult<()> {
        self.ensure_connected()?;
        let mut state = self.lock()?;
        let now_empty = match state.entries.get_mut(key) {
            None => return Ok(()),
            Some(Value::Set(set)) => {
                set.remove(member);
                set.is_empty()
            }
            Some(_) => return Err(wrong_type(key)),
        };
        if now_empty {
            state.entries.remove(key);
        }
        Ok(())
    }

    fn members(&self, key: &str) -> StoreResult<Vec<String>> {
        self.ensure_connected()?;
        let state = self.lock()?;
        match state.entries.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Set(set)) => Ok(set.iter().cloned().collect()),
            Some(_) => Err(wrong_type(key)),
        }
    }

    fn push_tail(&self, key: &str, value: &str) -> StoreResult<()> {
        self.ensure_connected()?;
        let mut state = self.lock()?;
        match state
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Value::List(VecDeque::new()))
        {
            Value::List(list) => list.push_back(value.to_string()),
            _ => return Err(wrong_type(key)),
        }
        drop(state);
        self.pushed.notify_all();
        Ok(())
    }

    fn pop_head(&self, key: &str) -> StoreResult<Option<String>> {
        self.ensure_connected()?;
        let mut state = self.lock()?;
        Self::pop_front(&mut state, key)
    }

    fn blocking_pop_head(
        &self,
        key: &str,
        timeout: Duration,
    ) -> StoreResult<Option<(String, String)>> {
        self.ensure_connected()?;
        // Zero, or too far out to represent, waits forever
        let deadline = if timeout.is_zero() {
            None
        } else {
            Instant::now().checked_add(timeout)
        };

        let mut state = self.lock()?;
        loop {
            self.ensure_connected()?;
            if let Some(value) = Self::pop_front(&mut state, key)? {
                return Ok(Some((key.to_string(), value)));
            }

            state = match deadline {
                None => handle_lock_poison(
                    self.pushed.wait(state),
                    "memory store",
                    StoreError::command,
                )?,
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Ok(None);
                    }
                    handle_lock_poison(
                        self.pushed.wait_timeout(state, remaining),
                        "memory store",
                        StoreError::command,
                    )?
                    .0
                }
            };
        }
    }

    fn delete_key(&self, key: &str) -> StoreResult<()> {
        self.ensure_connected()?;
        let mut state = self.lock()?;
        state.entries.remove(key);
        Ok(())
    }
}
