//! Mapping between key-value pairs and table items

use std::collections::HashMap;

use aws_sdk_dynamodb::{primitives::Blob, types::AttributeValue};
use strum::Display;

/// Attribute map of a single table item
pub type Item = HashMap<String, AttributeValue>;

/// Attribute names for the key-value table
#[derive(Debug, Clone, Copy, Display, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum KvAttribute {
    /// Key (Partition Key)
    K,
    /// Codec-encoded value
    V,
    /// Expiry timestamp (Unix timestamp in seconds)
    Ttl,
}

/// Builds the primary key of the item stored under `key`
#[must_use]
pub fn key_of(key: &str) -> Item {
    HashMap::from([(
        KvAttribute::K.to_string(),
        AttributeValue::S(key.to_string()),
    )])
}

/// Builds a full item for a write
///
/// `expires_at` is only attached when present, so an item written without TTL
/// never carries the expiry attribute.
#[must_use]
pub fn new_item(key: &str, data: Vec<u8>, expires_at: Option<i64>) -> Item {
    let mut item = key_of(key);
    item.insert(KvAttribute::V.to_string(), AttributeValue::B(Blob::new(data)));
    if let Some(expires_at) = expires_at {
        item.insert(
            KvAttribute::Ttl.to_string(),
            AttributeValue::N(expires_at.to_string()),
        );
    }
    item
}

/// Value attribute of a stored item
#[derive(Debug, PartialEq, Eq)]
pub enum StoredValue<'a> {
    /// The item has no value attribute
    Missing,
    /// The value attribute holds binary data
    Bytes(&'a [u8]),
    /// The value attribute has another type
    Malformed,
}

/// Extracts the value attribute of an item
#[must_use]
pub fn value_of(item: &Item) -> StoredValue<'_> {
    match item.get(&KvAttribute::V.to_string()) {
        None => StoredValue::Missing,
        Some(AttributeValue::B(blob)) => StoredValue::Bytes(blob.as_ref()),
        Some(_) => StoredValue::Malformed,
    }
}
