//! Error types for key-value store operations

use std::time::Duration;

use thiserror::Error;

use crate::codec::CodecError;
use crate::validation::ValidationError;

/// Boxed error returned by storage client implementations
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for key-value store operations
pub type KvStoreResult<T> = Result<T, KvStoreError>;

/// Errors that can occur during key-value store operations
#[derive(Error, Debug)]
pub enum KvStoreError {
    /// A required construction option is missing or empty
    #[error("Invalid store configuration: {0}")]
    Config(String),

    /// The table could not be described during construction
    #[error("Table {table_name} is not available: {source}")]
    TableUnavailable {
        /// Name of the table that was checked
        table_name: String,
        /// Error reported by the storage client
        #[source]
        source: BoxError,
    },

    /// The table check during construction did not finish in time
    #[error("Timed out after {timeout:?} while describing table {table_name}")]
    Timeout {
        /// Name of the table that was checked
        table_name: String,
        /// Time budget that elapsed
        timeout: Duration,
    },

    /// Invalid key or value passed to an operation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Failed to encode a value with the configured codec
    #[error("Failed to encode value: {0}")]
    Encode(#[source] CodecError),

    /// Failed to decode a stored value with the configured codec
    #[error("Failed to decode value stored under {key:?}: {source}")]
    Decode {
        /// Key of the item that was read
        key: String,
        /// Codec error
        #[source]
        source: CodecError,
    },

    /// The stored value attribute is not a binary attribute
    #[error("Value attribute of item {key:?} is not binary")]
    InvalidValueAttribute {
        /// Key of the item that was read
        key: String,
    },

    /// The configured TTL cannot be turned into an expiry timestamp
    #[error("Invalid TTL")]
    InvalidTtl,

    /// The storage client reported an error
    #[error("Storage operation failed: {0}")]
    Storage(#[source] BoxError),
}

impl KvStoreError {
    /// Wraps a storage client error without translating it
    pub fn storage(err: impl Into<BoxError>) -> Self {
        Self::Storage(err.into())
    }

    /// Whether the item existed even though the read failed.
    ///
    /// A `get` that fails while decoding still found a row for the key.
    #[must_use]
    pub const fn item_found(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. } | Self::InvalidValueAttribute { .. }
        )
    }
}
