//! Key-value store backed by a `DynamoDB` table
//!
//! Stores any `serde` value under a string key. Values are encoded with a
//! pluggable [`Codec`] (JSON by default) and written as a single item per key,
//! so application code depends on the [`Store`] contract rather than on the
//! `DynamoDB` API.
//!
//! ```ignore
//! use kv_store::{ClientOptions, DynamoDbStore, Options, Store};
//!
//! let client = ClientOptions::default()
//!     .endpoint_url("http://localhost:4566")
//!     .build_client()
//!     .await;
//! let store = DynamoDbStore::new(Options::new("kv").client(client)).await?;
//!
//! store.set("greeting", "hello").await?;
//! let greeting: Option<String> = store.get("greeting").await?;
//! store.delete("greeting").await?;
//! ```

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

pub mod client;
pub mod codec;
mod dynamodb;
mod error;
pub mod item;
mod options;
mod store;
pub mod validation;

pub use client::{ClientOptions, DynamoDbApi, DynamoDbError};
pub use codec::{CborCodec, Codec, CodecError, JsonCodec};
pub use dynamodb::DynamoDbStore;
pub use error::{BoxError, KvStoreError, KvStoreResult};
pub use options::{Options, DESCRIBE_TABLE_TIMEOUT};
pub use store::Store;
pub use validation::ValidationError;
