//! Storage client abstraction over `DynamoDB`
//!
//! The store only needs four single-item operations, so it depends on the
//! [`DynamoDbApi`] trait instead of the concrete SDK client. The trait is
//! implemented for [`aws_sdk_dynamodb::Client`]; tests plug in their own.

use std::sync::Arc;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::{
    delete_item::DeleteItemError, describe_table::DescribeTableError, get_item::GetItemError,
    put_item::PutItemError,
};
use aws_sdk_dynamodb::types::TableDescription;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use thiserror::Error;

use crate::item::Item;

/// Errors reported by the `DynamoDB` SDK client
#[derive(Error, Debug)]
pub enum DynamoDbError {
    /// Failed to describe the table
    #[error("Failed to describe table in DynamoDB: {0}")]
    DescribeTable(#[from] SdkError<DescribeTableError>),

    /// Failed to put an item into the table
    #[error("Failed to insert item into DynamoDB: {0}")]
    PutItem(#[from] SdkError<PutItemError>),

    /// Failed to get an item from the table
    #[error("Failed to get item from DynamoDB: {0}")]
    GetItem(#[from] SdkError<GetItemError>),

    /// Failed to delete an item from the table
    #[error("Failed to delete item from DynamoDB: {0}")]
    DeleteItem(#[from] SdkError<DeleteItemError>),
}

impl DynamoDbError {
    /// Whether the error means the table does not exist
    #[must_use]
    pub fn is_table_not_found(&self) -> bool {
        match self {
            Self::DescribeTable(SdkError::ServiceError(svc)) => {
                svc.err().is_resource_not_found_exception()
            }
            Self::PutItem(SdkError::ServiceError(svc)) => {
                svc.err().is_resource_not_found_exception()
            }
            Self::GetItem(SdkError::ServiceError(svc)) => {
                svc.err().is_resource_not_found_exception()
            }
            Self::DeleteItem(SdkError::ServiceError(svc)) => {
                svc.err().is_resource_not_found_exception()
            }
            _ => false,
        }
    }
}

/// Single-item operations the store performs against a table
///
/// Implementations own connection handling, retries and credentials. Errors
/// are returned as-is and surfaced by the store without translation.
#[async_trait]
pub trait DynamoDbApi: Send + Sync + 'static {
    /// Error type reported by the client
    type Error: std::error::Error + Send + Sync + 'static;

    /// Describes `table_name`, failing if it does not exist
    ///
    /// The description is `None` when the response carries none.
    async fn describe_table(
        &self,
        table_name: &str,
    ) -> Result<Option<TableDescription>, Self::Error>;

    /// Writes `item`, replacing any item with the same key
    async fn put_item(&self, table_name: &str, item: Item) -> Result<(), Self::Error>;

    /// Reads the item stored under `key`
    async fn get_item(&self, table_name: &str, key: Item) -> Result<Option<Item>, Self::Error>;

    /// Deletes the item stored under `key`, succeeding if there is none
    async fn delete_item(&self, table_name: &str, key: Item) -> Result<(), Self::Error>;
}

#[async_trait]
impl DynamoDbApi for DynamoDbClient {
    type Error = DynamoDbError;

    async fn describe_table(
        &self,
        table_name: &str,
    ) -> Result<Option<TableDescription>, Self::Error> {
        let response = self
            .describe_table()
            .table_name(table_name)
            .send()
            .await?;

        Ok(response.table)
    }

    async fn put_item(&self, table_name: &str, item: Item) -> Result<(), Self::Error> {
        self.put_item()
            .table_name(table_name)
            .set_item(Some(item))
            .send()
            .await?;

        Ok(())
    }

    async fn get_item(&self, table_name: &str, key: Item) -> Result<Option<Item>, Self::Error> {
        let response = self
            .get_item()
            .table_name(table_name)
            .set_key(Some(key))
            .send()
            .await?;

        Ok(response.item)
    }

    async fn delete_item(&self, table_name: &str, key: Item) -> Result<(), Self::Error> {
        self.delete_item()
            .table_name(table_name)
            .set_key(Some(key))
            .send()
            .await?;

        Ok(())
    }
}

/// Options for building a `DynamoDB` SDK client
///
/// Anything left unset falls back to the standard AWS provider chain (shared
/// config files and `AWS_*` environment variables).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// AWS region, e.g. `us-east-1`
    pub region: Option<String>,
    /// Custom service endpoint
    ///
    /// Useful for `DynamoDB` Local or `LocalStack`, e.g. `http://localhost:4566`.
    pub endpoint_url: Option<String>,
}

impl ClientOptions {
    /// Sets the region
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets a custom endpoint
    #[must_use]
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Loads the AWS shared config and builds a `DynamoDB` client from it
    pub async fn build_client(&self) -> Arc<DynamoDbClient> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint_url) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let config = loader.load().await;
        Arc::new(DynamoDbClient::new(&config))
    }
}
