//! KvStore trait: the abstract interface for blob persistence.
//!
//! The receipt store writes its whole collection as one value under one key.
//! Implementations include SQLite (primary) and in-memory (for tests).

use std::sync::Arc;

use crate::error::Result;

/// A flat key-value store holding opaque byte blobs.
///
/// Methods take `&self`; implementations provide their own interior locking
/// so a backend can be shared behind an `Arc`.
///
/// # Design Notes
///
/// - **Overwrite semantics**: `put` replaces any prior value for the key.
/// - **Atomic writes**: a `put` either lands completely or not at all.
/// - **Missing keys**: `get` returns `Ok(None)`, never an error.
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// Check whether a value is stored under `key`.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KvStore + ?Sized> KvStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}
