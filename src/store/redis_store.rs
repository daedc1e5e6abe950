//! Redis-backed store
//!
//! Wraps a single synchronous `redis::Connection`. Every primitive is one
//! round trip; `blocking_pop_head` holds the connection for the duration of
//! the wait, exactly as a BLPOP does on a raw client.
//!
//! Every other call on the same `RedisStore` queues behind a pending
//! blocking pop. Publishers and blocking consumers should therefore each
//! connect their own store rather than share one.

use crate::core::sync::handle_lock_poison;
use crate::store::{KeyValueStore, StoreError, StoreResult};
use redis::{Commands, ConnectionLike};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

pub struct RedisStore {
    connection: Mutex<redis::Connection>,
}

impl RedisStore {
    /// Open a connection to the server at `url` (e.g. `redis://localhost:6379/`)
    pub fn connect(url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let connection = client.get_connection().map_err(map_redis_error)?;
        log::debug!("Connected to redis at {}", url);
        Ok(Self::from_connection(connection))
    }

    /// Wrap an already established connection
    pub fn from_connection(connection: redis::Connection) -> Self {
        Self {
            connection: Mutex::new(connection),
        }
    }

    fn connection(&self) -> StoreResult<MutexGuard<'_, redis::Connection>> {
        handle_lock_poison(self.connection.lock(), "redis connection", StoreError::command)
    }
}

/// Classify a client error as connectivity loss or command failure
fn map_redis_error(error: redis::RedisError) -> StoreError {
    if error.is_io_error()
        || error.is_connection_dropped()
        || error.is_connection_refusal()
        || error.is_timeout()
    {
        StoreError::unavailable(error.to_string())
    } else {
        StoreError::command(error.to_string())
    }
}

impl KeyValueStore for RedisStore {
    fn is_connected(&self) -> bool {
        match self.connection.lock() {
            Ok(connection) => connection.is_open(),
            Err(_) => false,
        }
    }

    fn increment(&self, key: &str) -> StoreResult<i64> {
        let mut con = self.connection()?;
        con.incr(key, 1).map_err(map_redis_error)
    }

    fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let mut con = self.connection()?;
        con.set_ex(key, value, ttl.as_secs()).map_err(map_redis_error)
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut con = self.connection()?;
        con.get(key).map_err(map_redis_error)
    }

    fn add_to_set(&self, key: &str, member: &str) -> StoreResult<()> {
        let mut con = self.connection()?;
        con.sadd(key, member).map_err(map_redis_error)
    }

    fn remove_from_set(&self, key: &str, member: &str) -> StoreResult<()> {
        let mut con = self.connection()?;
        con.srem(key, member).map_err(map_redis_error)
    }

    fn members(&self, key: &str) -> StoreResult<Vec<String>> {
        let mut con = self.connection()?;
        con.smembers(key).map_err(map_redis_error)
    }

    fn push_tail(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut con = self.connection()?;
        con.rpush(key, value).map_err(map_redis_error)
    }

    fn pop_head(&self, key: &str) -> StoreResult<Option<String>> {
        let mut con = self.connection()?;
        con.lpop(key, None).map_err(map_redis_error)
    }

    fn blocking_pop_head(
        &self,
        key: &str,
        timeout: Duration,
    ) -> StoreResult<Option<(String, String)>> {
        let mut con = self.connection()?;
        // BLPOP takes fractional seconds; 0 blocks forever
        redis::cmd("BLPOP")
            .arg(key)
            .arg(timeout.as_secs_f64())
            .query(&mut *con)
            .map_err(map_redis_error)
    }

    fn delete_key(&self, key: &str) -> StoreResult<()> {
        let mut con = self.connection()?;
        con.del(key).map_err(map_redis_error)
    }
}
