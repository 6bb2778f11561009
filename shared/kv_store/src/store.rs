//! Uniform key-value store contract

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::KvStoreResult;

/// Lifecycle and CRUD contract shared by key-value store backends
///
/// Values are any `serde` type; each backend decides how they are encoded.
#[async_trait]
pub trait Store: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns `KvStoreError::Validation` if `key` is empty or `value` is nil,
    /// otherwise any encoding or storage error
    async fn set<T>(&self, key: &str, value: &T) -> KvStoreResult<()>
    where
        T: Serialize + ?Sized + Sync;

    /// Retrieves the value stored under `key`
    ///
    /// Returns `Ok(None)` if nothing is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `KvStoreError::Validation` if `key` is empty, otherwise any
    /// decoding or storage error
    async fn get<T>(&self, key: &str) -> KvStoreResult<Option<T>>
    where
        T: DeserializeOwned + Send;

    /// Retrieves the value stored under `key` into `dest`
    ///
    /// Returns `Ok(true)` and overwrites `dest` if a value was found,
    /// `Ok(false)` and leaves `dest` untouched otherwise.
    ///
    /// # Errors
    ///
    /// Same as [`Store::get`]
    async fn get_into<T>(&self, key: &str, dest: &mut T) -> KvStoreResult<bool>
    where
        T: DeserializeOwned + Send,
    {
        match self.get(key).await? {
            Some(value) => {
                *dest = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Deletes the value stored under `key`
    ///
    /// Deleting a key that holds no value is not an error.
    ///
    /// # Errors
    ///
    /// Returns `KvStoreError::Validation` if `key` is empty, otherwise any
    /// storage error
    async fn delete(&self, key: &str) -> KvStoreResult<()>;

    /// Releases resources held by the store
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to shut down
    async fn close(&self) -> KvStoreResult<()>;
}
