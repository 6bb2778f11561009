#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, TableDescription, TableStatus};
use kv_store::item::Item;
use kv_store::{DynamoDbApi, DynamoDbStore, Options};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Table name the mock reports as not existing
pub const MISSING_TABLE: &str = "missing";

/// Table name whose describe response carries no description
pub const BARE_TABLE: &str = "bare";

/// Table name whose describe call never finishes in time
pub const SLOW_TABLE: &str = "slow";

/// Errors returned by the mock client
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MockError {
    #[error("Requested resource not found: Table: {0} not found")]
    TableNotFound(String),

    #[error("Injected failure: {0}")]
    Injected(String),
}

/// In-memory stand-in for a `DynamoDB` table client
///
/// Records every written item so tests can inspect the exact attributes.
#[derive(Default)]
pub struct MockDynamoDb {
    tables: Mutex<HashMap<String, HashMap<String, Item>>>,
    put_items: Mutex<Vec<Item>>,
    requests: AtomicUsize,
    failure: Mutex<Option<String>>,
}

impl MockDynamoDb {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes every following item operation fail with `message`
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// Number of put, get and delete calls received
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Items passed to put calls, oldest first
    pub fn put_items(&self) -> Vec<Item> {
        self.put_items.lock().unwrap().clone()
    }

    /// Item currently stored under `key`
    pub fn stored_item(&self, table_name: &str, key: &str) -> Option<Item> {
        self.tables
            .lock()
            .unwrap()
            .get(table_name)
            .and_then(|items| items.get(key))
            .cloned()
    }

    /// Stores `item` directly, bypassing the store
    pub fn insert_raw(&self, table_name: &str, key: &str, item: Item) {
        self.tables
            .lock()
            .unwrap()
            .entry(table_name.to_string())
            .or_default()
            .insert(key.to_string(), item);
    }

    fn begin_request(&self) -> Result<(), MockError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match self.failure.lock().unwrap().clone() {
            Some(message) => Err(MockError::Injected(message)),
            None => Ok(()),
        }
    }

    fn key_string(key: &Item) -> String {
        match key.get("k") {
            Some(AttributeValue::S(key)) => key.clone(),
            other => panic!("unexpected key attribute: {other:?}"),
        }
    }
}

#[async_trait]
impl DynamoDbApi for MockDynamoDb {
    type Error = MockError;

    async fn describe_table(
        &self,
        table_name: &str,
    ) -> Result<Option<TableDescription>, Self::Error> {
        match table_name {
            MISSING_TABLE => Err(MockError::TableNotFound(table_name.to_string())),
            SLOW_TABLE => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(None)
            }
            BARE_TABLE => Ok(None),
            _ => Ok(Some(
                TableDescription::builder()
                    .table_name(table_name)
                    .table_status(TableStatus::Active)
                    .build(),
            )),
        }
    }

    async fn put_item(&self, table_name: &str, item: Item) -> Result<(), Self::Error> {
        self.begin_request()?;
        let key = Self::key_string(&item);
        self.put_items.lock().unwrap().push(item.clone());
        self.insert_raw(table_name, &key, item);
        Ok(())
    }

    async fn get_item(&self, table_name: &str, key: Item) -> Result<Option<Item>, Self::Error> {
        self.begin_request()?;
        Ok(self.stored_item(table_name, &Self::key_string(&key)))
    }

    async fn delete_item(&self, table_name: &str, key: Item) -> Result<(), Self::Error> {
        self.begin_request()?;
        if let Some(items) = self.tables.lock().unwrap().get_mut(table_name) {
            items.remove(&Self::key_string(&key));
        }
        Ok(())
    }
}

/// Installs a test subscriber so `RUST_LOG=kv_store=debug` shows store spans
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Creates a JSON store on `table_name` backed by `client`
pub async fn setup_store(
    client: &Arc<MockDynamoDb>,
    table_name: &str,
    ttl: Option<Duration>,
) -> DynamoDbStore<MockDynamoDb> {
    init_tracing();

    let mut options = Options::new(table_name).client(Arc::clone(client));
    if let Some(ttl) = ttl {
        options = options.ttl(ttl);
    }

    DynamoDbStore::new(options)
        .await
        .expect("Failed to create store")
}
