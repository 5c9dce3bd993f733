use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, KeySchemaElement, KeyType,
    Projection, ProjectionType, ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::{Client as DynamoDbClient, Error as DynamoDbError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use super::beer_repository::DynamoDbBeerRepository;
use crate::models::{RepositoryError, RepositoryResult};

const MAX_ACTIVE_CHECKS: u32 = 30;
const ACTIVE_CHECK_INTERVAL: Duration = Duration::from_secs(2);

/// Creates the Beers and Customers tables when they are missing
pub struct TableManager {
    client: Arc<DynamoDbClient>,
}

impl TableManager {
    pub fn new(client: Arc<DynamoDbClient>) -> Self {
        Self { client }
    }

    /// Create the Beers table keyed on `id` with a GSI on `beer_style`
    #[instrument(skip(self), fields(table_name = %table_name))]
    pub async fn create_beers_table(&self, table_name: &str) -> RepositoryResult<()> {
        if self.table_exists(table_name).await? {
            info!("Table {} already exists", table_name);
            return Ok(());
        }

        info!("Creating Beers table");

        let style_index = GlobalSecondaryIndex::builder()
            .index_name(DynamoDbBeerRepository::BEER_STYLE_INDEX)
            .key_schema(hash_key("beer_style")?)
            .projection(
                Projection::builder()
                    .projection_type(ProjectionType::All)
                    .build(),
            )
            .build()
            .map_err(|e| build_error("GSI", e))?;

        self.client
            .create_table()
            .table_name(table_name)
            .attribute_definitions(string_attribute("id")?)
            .attribute_definitions(string_attribute("beer_style")?)
            .key_schema(hash_key("id")?)
            .global_secondary_indexes(style_index)
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
            .map_err(|e| map_dynamodb_error(e.into()))?;

        self.wait_for_table_active(table_name).await?;
        info!("Beers table created successfully");
        Ok(())
    }

    /// Create the Customers table keyed on `id`
    #[instrument(skip(self), fields(table_name = %table_name))]
    pub async fn create_customers_table(&self, table_name: &str) -> RepositoryResult<()> {
        if self.table_exists(table_name).await? {
            info!("Table {} already exists", table_name);
            return Ok(());
        }

        info!("Creating Customers table");

        self.client
            .create_table()
            .table_name(table_name)
            .attribute_definitions(string_attribute("id")?)
            .key_schema(hash_key("id")?)
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
            .map_err(|e| map_dynamodb_error(e.into()))?;

        self.wait_for_table_active(table_name).await?;
        info!("Customers table created successfully");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn create_all_tables(
        &self,
        beers_table: &str,
        customers_table: &str,
    ) -> RepositoryResult<()> {
        let (beers, customers) = tokio::join!(
            self.create_beers_table(beers_table),
            self.create_customers_table(customers_table)
        );

        beers?;
        customers?;

        info!("All tables ready");
        Ok(())
    }

    #[instrument(skip(self), fields(table_name = %table_name))]
    pub async fn table_exists(&self, table_name: &str) -> RepositoryResult<bool> {
        match self.client.describe_table().table_name(table_name).send().await {
            Ok(_) => Ok(true),
            Err(e) => match DynamoDbError::from(e) {
                DynamoDbError::ResourceNotFoundException(_) => {
                    info!("Table {} does not exist", table_name);
                    Ok(false)
                }
                other => {
                    error!("Error checking table existence: {}", other);
                    Err(RepositoryError::ConnectionFailed)
                }
            },
        }
    }

    #[instrument(skip(self), fields(table_name = %table_name))]
    async fn wait_for_table_active(&self, table_name: &str) -> RepositoryResult<()> {
        for _ in 0..MAX_ACTIVE_CHECKS {
            let response = self
                .client
                .describe_table()
                .table_name(table_name)
                .send()
                .await
                .map_err(|e| map_dynamodb_error(e.into()))?;

            match response.table.and_then(|table| table.table_status) {
                Some(TableStatus::Active) => {
                    info!("Table {} is now active", table_name);
                    return Ok(());
                }
                Some(status) => info!("Table {} status: {:?}, waiting...", table_name, status),
                None => warn!("Table {} status unknown, waiting...", table_name),
            }

            tokio::time::sleep(ACTIVE_CHECK_INTERVAL).await;
        }

        error!("Timeout waiting for table {} to become active", table_name);
        Err(RepositoryError::Timeout)
    }
}

fn string_attribute(name: &str) -> RepositoryResult<AttributeDefinition> {
    AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(|e| build_error("attribute definition", e))
}

fn hash_key(name: &str) -> RepositoryResult<KeySchemaElement> {
    KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(KeyType::Hash)
        .build()
        .map_err(|e| build_error("key schema", e))
}

fn build_error(what: &str, error: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::AwsSdk {
        message: format!("Failed to build {}: {}", what, error),
    }
}

fn map_dynamodb_error(error: DynamoDbError) -> RepositoryError {
    error!("DynamoDB error: {:?}", error);
    RepositoryError::AwsSdk {
        message: error.to_string(),
    }
}
