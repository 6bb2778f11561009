//! Construction options for [`DynamoDbStore`](crate::DynamoDbStore)

use std::sync::Arc;
use std::time::Duration;

use crate::codec::JsonCodec;

/// Time budget for the table check performed on construction
pub const DESCRIBE_TABLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Options for a key-value store
///
/// Only the table name and the client are required. The codec defaults to
/// JSON and no TTL is attached to written items.
///
/// ```ignore
/// let options = Options::new("kv")
///     .client(client)
///     .codec(CborCodec)
///     .ttl(Duration::from_secs(3600));
/// let store = DynamoDbStore::new(options).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Options<D, C = JsonCodec> {
    /// Table holding the items
    pub table_name: String,
    /// Storage client performing the table operations
    pub client: Option<Arc<D>>,
    /// Codec for values
    pub codec: C,
    /// Lifetime of written items, `None` or zero disables expiry
    pub ttl: Option<Duration>,
}

impl<D> Options<D> {
    /// Creates options for `table_name` with the default codec and no TTL
    #[must_use]
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            client: None,
            codec: JsonCodec,
            ttl: None,
        }
    }
}

impl<D, C> Options<D, C> {
    /// Sets the storage client
    #[must_use]
    pub fn client(mut self, client: Arc<D>) -> Self {
        self.client = Some(client);
        self
    }

    /// Replaces the codec
    #[must_use]
    pub fn codec<C2>(self, codec: C2) -> Options<D, C2> {
        Options {
            table_name: self.table_name,
            client: self.client,
            codec,
            ttl: self.ttl,
        }
    }

    /// Sets the lifetime of written items
    ///
    /// Expiry is stored in whole seconds and rounded up, so a sub-second TTL
    /// still lands after the write. A zero TTL disables expiry.
    #[must_use]
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// TTL to apply on writes, ignoring a zero duration
    pub(crate) fn effective_ttl(&self) -> Option<Duration> {
        self.ttl.filter(|ttl| !ttl.is_zero())
    }
}
