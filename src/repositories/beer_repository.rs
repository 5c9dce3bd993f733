use async_trait::async_trait;
use aws_sdk_dynamodb::operation::RequestId;
use aws_sdk_dynamodb::types::{AttributeValue, Select};
use aws_sdk_dynamodb::{Client as DynamoDbClient, Error as DynamoDbError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument, warn, Instrument};

use super::item::{self, Item};
use crate::models::{Beer, RepositoryError, RepositoryResult};

/// Trait defining the interface for beer data access operations
#[async_trait]
pub trait BeerRepository: Send + Sync {
    /// Find every beer in the collection
    async fn find_all(&self) -> RepositoryResult<Vec<Beer>>;

    /// Find a beer by its ID
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Beer>>;

    /// Find the first beer whose name matches exactly
    async fn find_first_by_beer_name(&self, beer_name: &str) -> RepositoryResult<Option<Beer>>;

    /// Find all beers of a given style using the style index
    async fn find_by_beer_style(&self, beer_style: &str) -> RepositoryResult<Vec<Beer>>;

    /// Insert or replace a beer document
    async fn save(&self, beer: Beer) -> RepositoryResult<Beer>;

    /// Delete a beer document by ID
    async fn delete_by_id(&self, id: &str) -> RepositoryResult<()>;

    /// Check if a beer exists
    async fn exists_by_id(&self, id: &str) -> RepositoryResult<bool>;

    /// Count all beers
    async fn count(&self) -> RepositoryResult<usize>;
}

/// DynamoDB implementation of the BeerRepository trait
pub struct DynamoDbBeerRepository {
    client: Arc<DynamoDbClient>,
    table_name: String,
    beer_style_index: String,
    region: String,
}

impl DynamoDbBeerRepository {
    pub const BEER_STYLE_INDEX: &'static str = "BeerStyleIndex";

    /// Create a new DynamoDB beer repository
    pub fn new(client: Arc<DynamoDbClient>, table_name: String, region: String) -> Self {
        Self {
            client,
            table_name,
            beer_style_index: Self::BEER_STYLE_INDEX.to_string(),
            region,
        }
    }

    /// Create a DynamoDB client span carrying database semantic attributes
    fn create_dynamodb_span(&self, operation: &str) -> tracing::Span {
        tracing::info_span!(
            "DynamoDB",
            "aws.service" = "DynamoDB",
            "aws.operation" = operation,
            "aws.region" = %self.region,
            "aws.dynamodb.table_name" = %self.table_name,
            "aws.request_id" = tracing::field::Empty,
            "otel.kind" = "client",
            "otel.name" = format!("DynamoDB.{}", operation),
            "rpc.system" = "aws-api",
            "rpc.service" = "AmazonDynamoDBv2",
            "rpc.method" = operation,
            "db.system" = "dynamodb",
            "db.name" = %self.table_name,
            "db.operation" = operation,
        )
    }

    /// Get the table name (for testing)
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Get the beer style index name (for testing)
    pub fn beer_style_index(&self) -> &str {
        &self.beer_style_index
    }

    /// Convert a Beer struct to DynamoDB attribute values
    pub fn beer_to_item(&self, beer: &Beer) -> Item {
        let mut item = HashMap::new();

        item::put_string(&mut item, "id", &beer.id);
        item::put_string(&mut item, "beer_name", &beer.beer_name);
        item::put_string(&mut item, "beer_style", &beer.beer_style);
        item::put_string(&mut item, "upc", &beer.upc);
        item::put_optional_number(&mut item, "quantity_on_hand", beer.quantity_on_hand);
        item::put_optional_number(&mut item, "price", beer.price);
        item::put_optional_datetime(&mut item, "created_date", beer.created_date);
        item::put_optional_datetime(&mut item, "last_modified_date", beer.last_modified_date);

        item
    }

    /// Convert DynamoDB item to Beer struct
    pub fn item_to_beer(&self, item: Item) -> RepositoryResult<Beer> {
        Ok(Beer {
            id: item::required_string(&item, "id")?,
            beer_name: item::required_string(&item, "beer_name")?,
            beer_style: item::required_string(&item, "beer_style")?,
            upc: item::required_string(&item, "upc")?,
            quantity_on_hand: item::optional_number(&item, "quantity_on_hand")?,
            price: item::optional_number(&item, "price")?,
            created_date: item::optional_datetime(&item, "created_date"),
            last_modified_date: item::optional_datetime(&item, "last_modified_date"),
        })
    }

    /// Parse a page of items, skipping malformed documents
    fn collect_beers(&self, items: Option<Vec<Item>>, beers: &mut Vec<Beer>) {
        for item in items.unwrap_or_default() {
            match self.item_to_beer(item) {
                Ok(beer) => beers.push(beer),
                Err(e) => {
                    warn!("Failed to parse beer item: {}", e);
                }
            }
        }
    }

    /// Convert DynamoDB error to RepositoryError
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
impl BeerRepository for DynamoDbBeerRepository {
    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn find_all(&self) -> RepositoryResult<Vec<Beer>> {
        info!("Finding all beers");

        let mut beers = Vec::new();
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

            self.collect_beers(response.items, &mut beers);

            match response.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        info!("Found {} beers", beers.len());
        Ok(beers)
    }

    #[instrument(skip(self), fields(table = %self.table_name, id = %id))]
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Beer>> {
        info!("Finding beer by ID");

        let get_span = self.create_dynamodb_span("GetItem");

        let response = async {
            let result = self
                .client
                .get_item()
                .table_name(&self.table_name)
                .key("id", AttributeValue::S(id.to_string()))
                .send()
                .await;

            if let Ok(output) = &result {
                if let Some(request_id) = output.request_id() {
                    tracing::Span::current().record("aws.request_id", request_id);
                }
            }

            result.map_err(|e| self.map_dynamodb_error(e.into()))
        }
        .instrument(get_span)
        .await?;

        match response.item {
            Some(item) => {
                let beer = self.item_to_beer(item)?;
                info!("Beer found");
                Ok(Some(beer))
            }
            None => {
                info!("Beer not found");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self), fields(table = %self.table_name, beer_name = %beer_name))]
    async fn find_first_by_beer_name(&self, beer_name: &str) -> RepositoryResult<Option<Beer>> {
        info!("Finding first beer by name");

        let mut start_key: Option<Item> = None;

        // Filters apply after each page is read, so an empty page does not mean no match
        loop {
            let response = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression("beer_name = :beer_name")
                .expression_attribute_values(":beer_name", AttributeValue::S(beer_name.to_string()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .instrument(self.create_dynamodb_span("Scan"))
                .await
                .map_err(|e| self.map_dynamodb_error(e.into()))?;

            let mut beers = Vec::new();
            self.collect_beers(response.items, &mut beers);

            if let Some(beer) = beers.into_iter().next() {
                info!("Beer found by name");
                return Ok(Some(beer));
            }

            match response.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        info!("No beer matches name");
        Ok(None)
    }

    #[instrument(skip(self), fields(table = %self.table_name, beer_style = %beer_style))]
    async fn find_by_beer_style(&self, beer_style: &str) -> RepositoryResult<Vec<Beer>> {
        info!("Finding beers by style using GSI");

        let mut beers = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let response = self
                .client
                .query()
                .table_name(&self.table_name)
                .index_name(&self.beer_style_index)
                .key_condition_expression("beer_style = :beer_style")
                .expression_attribute_values(
                    ":beer_style",
                    AttributeValue::S(beer_style.to_string()),
                )
                .set_exclusive_start_key(start_key.take())
                .send()
                .instrument(self.create_dynamodb_span("Query"))
                .await
                .map_err(|e| self.map_dynamodb_error(e.into()))?;

            self.collect_beers(response.items, &mut beers);

            match response.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        info!("Found {} beers for style {}", beers.len(), beer_style);
        Ok(beers)
    }

    #[instrument(skip(self, beer), fields(table = %self.table_name, id = %beer.id))]
    async fn save(&self, beer: Beer) -> RepositoryResult<Beer> {
        info!("Saving beer");

        let item = self.beer_to_item(&beer);

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .instrument(self.create_dynamodb_span("PutItem"))
            .await
            .map_err(|e| self.map_dynamodb_error(e.into()))?;

        info!("Beer saved successfully");
        Ok(beer)
    }

    #[instrument(skip(self), fields(table = %self.table_name, id = %id))]
    async fn delete_by_id(&self, id: &str) -> RepositoryResult<()> {
        info!("Deleting beer");

        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .instrument(self.create_dynamodb_span("DeleteItem"))
            .await
            .map_err(|e| self.map_dynamodb_error(e.into()))?;

        info!("Beer deleted successfully");
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

        let exists = response.item.is_some();
        info!("Beer exists: {}", exists);
        Ok(exists)
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

        info!("Beer count: {}", count);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn create_test_repository() -> DynamoDbBeerRepository {
        let config = aws_sdk_dynamodb::Config::builder()
            .region(aws_sdk_dynamodb::config::Region::new("us-east-1"))
            .behavior_version(aws_sdk_dynamodb::config::BehaviorVersion::latest())
            .build();
        let client = Arc::new(aws_sdk_dynamodb::Client::from_conf(config));
        DynamoDbBeerRepository::new(client, "test-beers".to_string(), "us-east-1".to_string())
    }

    fn create_test_beer() -> Beer {
        let mut beer = Beer {
            id: Beer::generate_id(),
            beer_name: "Galaxy Cat".to_string(),
            beer_style: "Pale Ale".to_string(),
            upc: "12356222".to_string(),
            quantity_on_hand: Some(122),
            price: Some(dec!(12.99)),
            created_date: None,
            last_modified_date: None,
        };
        beer.mark_created();
        beer
    }

    #[test]
    fn test_beer_to_item_conversion() {
        let repo = create_test_repository();
        let beer = create_test_beer();

        let item = repo.beer_to_item(&beer);

        assert!(item.contains_key("id"));
        assert!(item.contains_key("beer_style"));
        assert!(item.contains_key("created_date"));

        if let Some(AttributeValue::N(price)) = item.get("price") {
            assert_eq!(price, "12.99");
        } else {
            panic!("Expected number value for price");
        }

        if let Some(AttributeValue::S(style)) = item.get("beer_style") {
            assert_eq!(style, "Pale Ale");
        } else {
            panic!("Expected string value for beer_style");
        }
    }

    #[test]
    fn test_item_to_beer_conversion() {
        let repo = create_test_repository();
        let beer = create_test_beer();

        let converted = repo.item_to_beer(repo.beer_to_item(&beer)).unwrap();

        assert_eq!(converted.id, beer.id);
        assert_eq!(converted.beer_name, beer.beer_name);
        assert_eq!(converted.upc, beer.upc);
        assert_eq!(converted.quantity_on_hand, Some(122));
        assert_eq!(converted.price, Some(dec!(12.99)));
        assert!(converted.created_date.is_some());
    }

    #[test]
    fn test_item_without_optional_fields() {
        let repo = create_test_repository();
        let mut beer = create_test_beer();
        beer.price = None;
        beer.quantity_on_hand = None;
        beer.created_date = None;
        beer.last_modified_date = None;

        let item = repo.beer_to_item(&beer);
        assert!(!item.contains_key("price"));
        assert!(!item.contains_key("quantity_on_hand"));

        let converted = repo.item_to_beer(item).unwrap();
        assert_eq!(converted, beer);
    }

    #[test]
    fn test_item_missing_required_field() {
        let repo = create_test_repository();
        let mut item = repo.beer_to_item(&create_test_beer());
        item.remove("beer_name");

        match repo.item_to_beer(item) {
            Err(RepositoryError::InvalidItem { message }) => {
                assert!(message.contains("beer_name"));
            }
            other => panic!("Expected InvalidItem error, got {:?}", other),
        }
    }

    #[test]
    fn test_repository_creation() {
        let repo = create_test_repository();

        assert_eq!(repo.table_name(), "test-beers");
        assert_eq!(repo.beer_style_index(), "BeerStyleIndex");
    }
}
