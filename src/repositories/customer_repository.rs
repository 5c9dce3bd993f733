use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, Select};
use aws_sdk_dynamodb::{Client as DynamoDbClient, Error as DynamoDbError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument, warn, Instrument};

use super::item::{self, Item};
use crate::models::{Customer, RepositoryError, RepositoryResult};

/// Trait defining the interface for customer data access operations
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_all(&self) -> RepositoryResult<Vec<Customer>>;

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Customer>>;

    /// Insert or replace a customer document
    async fn save(&self, customer: Customer) -> RepositoryResult<Customer>;

    async fn delete_by_id(&self, id: &str) -> RepositoryResult<()>;

    async fn exists_by_id(&self, id: &str) -> RepositoryResult<bool>;

    async fn count(&self) -> RepositoryResult<usize>;
}

/// DynamoDB implementation of the CustomerRepository trait
pub struct DynamoDbCustomerRepository {
    client: Arc<DynamoDbClient>,
    table_name: String,
    region: String,
}

impl DynamoDbCustomerRepository {
    pub fn new(client: Arc<DynamoDbClient>, table_name: String, region: String) -> Self {
        Self {
            client,
            table_name,
            region,
        }
    }

    fn create_dynamodb_span(&self, operation: &str) -> tracing::Span {
        tracing::info_span!(
            "DynamoDB",
            "aws.service" = "DynamoDB",
            "aws.operation" = operation,
            "aws.region" = %self.region,
            "aws.dynamodb.table_name" = %self.table_name,
            "otel.kind" = "client",
            "otel.name" = format!("DynamoDB.{}", operation),
            "db.system" = "dynamodb",
            "db.name" = %self.table_name,
            "db.operation" = operation,
        )
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Convert a Customer struct to DynamoDB attribute values
    pub fn customer_to_item(&self, customer: &Customer) -> Item {
        let mut item = HashMap::new();

        item::put_string(&mut item, "id", &customer.id);
        item::put_string(&mut item, "customer_name", &customer.customer_name);
        item::put_optional_datetime(&mut item, "created_date", customer.created_date);
        item::put_optional_datetime(
            &mut item,
            "last_modified_date",
            customer.last_modified_date,
        );

        item
    }

    /// Convert DynamoDB item to Customer struct
    pub fn item_to_customer(&self, item: Item) -> RepositoryResult<Customer> {
        Ok(Customer {
            id: item::required_string(&item, "id")?,
            customer_name: item::required_string(&item, "customer_name")?,
            created_date: item::optional_datetime(&item, "created_date"),
            last_modified_date: item::optional_datetime(&item, "last_modified_date"),
        })
    }

    fn map_dynamodb_error(&self, error: DynamoDbError) -> RepositoryError {
        error!("DynamoDB error: {:?}", error);

        if let DynamoDbError::ResourceNotFoundException(_) = error {
            return RepositoryError::TableNotFound {
                table_name: self.table_name.clone(),
            };
        }

        RepositoryError::AwsSdk {
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl CustomerRepository for DynamoDbCustomerRepository {
    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn find_all(&self) -> RepositoryResult<Vec<Customer>> {
        info!("Finding all customers");

        let mut customers = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let response = self
                .client
                .scan()
                .table_name(&self.table_name)
                .select(Select::AllAttributes)
                .set_exclusive_start_key(start_key.take())
                .send()
                .instrument(self.create_dynamodb_span("Scan"))
                .await
                .map_err(|e| self.map_dynamodb_error(e.into()))?;

            for item in response.items.unwrap_or_default() {
                match self.item_to_customer(item) {
                    Ok(customer) => customers.push(customer),
                    Err(e) => warn!("Failed to parse customer item: {}", e),
                }
            }

            match response.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        info!("Found {} customers", customers.len());
        Ok(customers)
    }

    #[instrument(skip(self), fields(table = %self.table_name, id = %id))]
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Customer>> {
        info!("Finding customer by ID");

        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .instrument(self.create_dynamodb_span("GetItem"))
            .await
            .map_err(|e| self.map_dynamodb_error(e.into()))?;

        response
            .item
            .map(|item| self.item_to_customer(item))
            .transpose()
    }

    #[instrument(skip(self, customer), fields(table = %self.table_name, id = %customer.id))]
    async fn save(&self, customer: Customer) -> RepositoryResult<Customer> {
        info!("Saving customer");

        let item = self.customer_to_item(&customer);

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .instrument(self.create_dynamodb_span("PutItem"))
            .await
            .map_err(|e| self.map_dynamodb_error(e.into()))?;

        info!("Customer saved successfully");
        Ok(customer)
    }

    #[instrument(skip(self), fields(table = %self.table_name, id = %id))]
    async fn delete_by_id(&self, id: &str) -> RepositoryResult<()> {
        info!("Deleting customer");

        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .instrument(self.create_dynamodb_span("DeleteItem"))
            .await
            .map_err(|e| self.map_dynamodb_error(e.into()))?;

        info!("Customer deleted successfully");
        Ok(())
    }

    #[instrument(skip(self), fields(table = %self.table_name, id = %id))]
    async fn exists_by_id(&self, id: &str) -> RepositoryResult<bool> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .projection_expression("id")
            .send()
            .instrument(self.create_dynamodb_span("GetItem"))
            .await
            .map_err(|e| self.map_dynamodb_error(e.into()))?;

        Ok(response.item.is_some())
    }

    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn count(&self) -> RepositoryResult<usize> {
        let mut count = 0usize;
        let mut start_key: Option<Item> = None;

        loop {
            let response = self
                .client
                .scan()
                .table_name(&self.table_name)
                .select(Select::Count)
                .set_exclusive_start_key(start_key.take())
                .send()
                .instrument(self.create_dynamodb_span("Scan"))
                .await
                .map_err(|e| self.map_dynamodb_error(e.into()))?;

            count += response.count() as usize;

            match response.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        info!("Customer count: {}", count);
        Ok(count)
    }
}
