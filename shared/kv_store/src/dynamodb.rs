//! Key-value store backed by a `DynamoDB` table
//!
//! Each key maps to one item: the key in attribute `k`, the codec output in
//! the binary attribute `v` and, when a TTL is configured, the expiry in
//! attribute `ttl` as a Unix timestamp in seconds so the table's native TTL
//! feature can remove it.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::TableDescription;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use chrono::{TimeDelta, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument};

use crate::client::DynamoDbApi;
use crate::codec::{Codec, JsonCodec};
use crate::error::{KvStoreError, KvStoreResult};
use crate::item::{key_of, new_item, value_of, StoredValue};
use crate::options::{Options, DESCRIBE_TABLE_TIMEOUT};
use crate::store::Store;
use crate::validation::{check_key, check_key_and_value};

/// Key-value store client for `DynamoDB` operations
///
/// Holds no mutable state of its own; clones share the same client and can be
/// used concurrently. Concurrent writes to one key race in the table and the
/// last write wins.
pub struct DynamoDbStore<D = DynamoDbClient, C = JsonCodec> {
    client: Arc<D>,
    table_name: String,
    codec: C,
    ttl: Option<TimeDelta>,
}

impl<D, C> DynamoDbStore<D, C>
where
    D: DynamoDbApi,
    C: Codec,
{
    /// Creates a new store and checks that its table exists
    ///
    /// The check is a single describe-table call bounded by
    /// [`DESCRIBE_TABLE_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// * `KvStoreError::Config` if the table name is empty or no client is set
    /// * `KvStoreError::InvalidTtl` if the TTL is out of range
    /// * `KvStoreError::TableUnavailable` if the table cannot be described
    /// * `KvStoreError::Timeout` if the check does not finish in time
    #[instrument(skip(options), fields(table_name = %options.table_name))]
    pub async fn new(options: Options<D, C>) -> KvStoreResult<Self> {
        let ttl = options.effective_ttl();
        let Options {
            table_name,
            client,
            codec,
            ..
        } = options;

        if table_name.trim().is_empty() {
            return Err(KvStoreError::Config(
                "no table name specified".to_string(),
            ));
        }
        let client = client
            .ok_or_else(|| KvStoreError::Config("no storage client specified".to_string()))?;
        let ttl = ttl
            .map(|ttl| TimeDelta::from_std(ttl).map_err(|_| KvStoreError::InvalidTtl))
            .transpose()?;

        // Doubles as a connection test
        let described =
            tokio::time::timeout(DESCRIBE_TABLE_TIMEOUT, client.describe_table(&table_name)).await;
        let description = match described {
            Ok(Ok(description)) => description,
            Ok(Err(err)) => {
                return Err(KvStoreError::TableUnavailable {
                    table_name,
                    source: Box::new(err),
                })
            }
            Err(_) => {
                return Err(KvStoreError::Timeout {
                    table_name,
                    timeout: DESCRIBE_TABLE_TIMEOUT,
                })
            }
        };
        debug!(
            status = ?description.as_ref().and_then(TableDescription::table_status),
            "Table is available"
        );

        Ok(Self {
            client,
            table_name,
            codec,
            ttl,
        })
    }

    /// Table the store reads from and writes to
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Stores `value` under `key`, replacing the whole item
    ///
    /// # Arguments
    ///
    /// * `key` - Non-empty key
    /// * `value` - Value to encode with the configured codec, must not be nil
    ///
    /// # Errors
    ///
    /// * `KvStoreError::Validation` if `key` is empty or `value` is nil, no
    ///   request is sent in that case
    /// * `KvStoreError::Encode` if the codec fails
    /// * `KvStoreError::Storage` if the put operation fails
    #[instrument(skip(self, value), fields(table_name = %self.table_name))]
    pub async fn set<T>(&self, key: &str, value: &T) -> KvStoreResult<()>
    where
        T: Serialize + ?Sized + Sync,
    {
        check_key_and_value(key, value)?;

        let data = self.codec.marshal(value).map_err(KvStoreError::Encode)?;
        let item = new_item(key, data, self.expires_at()?);

        self.client
            .put_item(&self.table_name, item)
            .await
            .map_err(KvStoreError::storage)?;

        Ok(())
    }

    /// Retrieves the value stored under `key`
    ///
    /// Returns `Ok(None)` if there is no item for `key`, and also if the item
    /// has no value attribute.
    ///
    /// # Errors
    ///
    /// * `KvStoreError::Validation` if `key` is empty
    /// * `KvStoreError::Storage` if the get operation fails
    /// * `KvStoreError::Decode` or `KvStoreError::InvalidValueAttribute` if the
    ///   item exists but its value cannot be decoded, see
    ///   [`KvStoreError::item_found`]
    #[instrument(skip(self), fields(table_name = %self.table_name))]
    pub async fn get<T>(&self, key: &str) -> KvStoreResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        check_key(key)?;

        let Some(item) = self
            .client
            .get_item(&self.table_name, key_of(key))
            .await
            .map_err(KvStoreError::storage)?
        else {
            return Ok(None);
        };

        match value_of(&item) {
            StoredValue::Bytes(data) => self
                .codec
                .unmarshal(data)
                .map(Some)
                .map_err(|source| KvStoreError::Decode {
                    key: key.to_string(),
                    source,
                }),
            StoredValue::Missing => {
                debug!("Item has no value attribute, treating it as missing");
                Ok(None)
            }
            StoredValue::Malformed => Err(KvStoreError::InvalidValueAttribute {
                key: key.to_string(),
            }),
        }
    }

    /// Deletes the item stored under `key`
    ///
    /// Deleting a key without an item succeeds.
    ///
    /// # Errors
    ///
    /// * `KvStoreError::Validation` if `key` is empty
    /// * `KvStoreError::Storage` if the delete operation fails
    #[instrument(skip(self), fields(table_name = %self.table_name))]
    pub async fn delete(&self, key: &str) -> KvStoreResult<()> {
        check_key(key)?;

        self.client
            .delete_item(&self.table_name, key_of(key))
            .await
            .map_err(KvStoreError::storage)?;

        Ok(())
    }

    /// Closes the store
    ///
    /// The SDK client owns its connections, so there is nothing to release.
    ///
    /// # Errors
    ///
    /// Never fails
    pub const fn close(&self) -> KvStoreResult<()> {
        Ok(())
    }

    /// Expiry timestamp for an item written now, rounded up to whole seconds
    fn expires_at(&self) -> KvStoreResult<Option<i64>> {
        self.ttl
            .map(|ttl| {
                let expires_at = Utc::now()
                    .checked_add_signed(ttl)
                    .ok_or(KvStoreError::InvalidTtl)?;
                let seconds = expires_at.timestamp();
                if expires_at.timestamp_subsec_nanos() > 0 {
                    seconds.checked_add(1).ok_or(KvStoreError::InvalidTtl)
                } else {
                    Ok(seconds)
                }
            })
            .transpose()
    }
}

impl<D, C: Clone> Clone for DynamoDbStore<D, C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            table_name: self.table_name.clone(),
            codec: self.codec.clone(),
            ttl: self.ttl,
        }
    }
}

impl<D, C> fmt::Debug for DynamoDbStore<D, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamoDbStore")
            .field("table_name", &self.table_name)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<D, C> Store for DynamoDbStore<D, C>
where
    D: DynamoDbApi,
    C: Codec,
{
    async fn set<T>(&self, key: &str, value: &T) -> KvStoreResult<()>
    where
        T: Serialize + ?Sized + Sync,
    {
        Self::set(self, key, value).await
    }

    async fn get<T>(&self, key: &str) -> KvStoreResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        Self::get(self, key).await
    }

    async fn delete(&self, key: &str) -> KvStoreResult<()> {
        Self::delete(self, key).await
    }

    async fn close(&self) -> KvStoreResult<()> {
        Self::close(self)
    }
}
