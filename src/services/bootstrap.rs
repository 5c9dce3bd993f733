use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::models::{Beer, Customer, RepositoryResult};
use crate::repositories::{BeerRepository, CustomerRepository};

/// Loads sample beers and customers into empty collections at startup
pub struct DataSeeder {
    beer_repository: Arc<dyn BeerRepository>,
    customer_repository: Arc<dyn CustomerRepository>,
}

/// Number of documents written by a seeding run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub beers_created: usize,
    pub customers_created: usize,
}

impl DataSeeder {
    pub fn new(
        beer_repository: Arc<dyn BeerRepository>,
        customer_repository: Arc<dyn CustomerRepository>,
    ) -> Self {
        Self {
            beer_repository,
            customer_repository,
        }
    }

    #[instrument(skip(self))]
    pub async fn seed(&self) -> RepositoryResult<SeedReport> {
        let report = SeedReport {
            beers_created: self.seed_beers().await?,
            customers_created: self.seed_customers().await?,
        };

        info!(
            beers = report.beers_created,
            customers = report.customers_created,
            "Seeding finished"
        );
        Ok(report)
    }

    async fn seed_beers(&self) -> RepositoryResult<usize> {
        let existing = self.beer_repository.count().await?;
        if existing > 0 {
            info!("Beers collection already holds {} documents, skipping", existing);
            return Ok(0);
        }

        let mut created = 0;
        for mut beer in sample_beers() {
            beer.mark_created();
            match self.beer_repository.save(beer).await {
                Ok(saved) => {
                    info!("Seeded beer: {}", saved.beer_name);
                    created += 1;
                }
                Err(e) => warn!("Failed to seed beer: {}", e),
            }
        }
        Ok(created)
    }

    async fn seed_customers(&self) -> RepositoryResult<usize> {
        let existing = self.customer_repository.count().await?;
        if existing > 0 {
            info!("Customers collection already holds {} documents, skipping", existing);
            return Ok(0);
        }

        let mut created = 0;
        for mut customer in sample_customers() {
            customer.mark_created();
            match self.customer_repository.save(customer).await {
                Ok(saved) => {
                    info!("Seeded customer: {}", saved.customer_name);
                    created += 1;
                }
                Err(e) => warn!("Failed to seed customer: {}", e),
            }
        }
        Ok(created)
    }
}

fn sample_beers() -> Vec<Beer> {
    let beer = |name: &str, style: &str, upc: &str, quantity: i32, price| Beer {
        id: Beer::generate_id(),
        beer_name: name.to_string(),
        beer_style: style.to_string(),
        upc: upc.to_string(),
        quantity_on_hand: Some(quantity),
        price: Some(price),
        created_date: None,
        last_modified_date: None,
    };

    vec![
        beer("Galaxy Cat", "Pale Ale", "12356", 122, dec!(12.99)),
        beer("Crank", "Pale Ale", "12356222", 392, dec!(11.99)),
        beer("Sunshine City", "IPA", "12356", 144, dec!(13.99)),
    ]
}

fn sample_customers() -> Vec<Customer> {
    ["Customer 1", "Customer 2", "Customer 3"]
        .into_iter()
        .map(|name| Customer {
            id: Customer::generate_id(),
            customer_name: name.to_string(),
            created_date: None,
            last_modified_date: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RepositoryError;
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        SeedBeerRepository {}

        #[async_trait]
        impl BeerRepository for SeedBeerRepository {
            async fn find_all(&self) -> Result<Vec<Beer>, RepositoryError>;
            async fn find_by_id(&self, id: &str) -> Result<Option<Beer>, RepositoryError>;
            async fn find_first_by_beer_name(&self, beer_name: &str) -> Result<Option<Beer>, RepositoryError>;
            async fn find_by_beer_style(&self, beer_style: &str) -> Result<Vec<Beer>, RepositoryError>;
            async fn save(&self, beer: Beer) -> Result<Beer, RepositoryError>;
            async fn delete_by_id(&self, id: &str) -> Result<(), RepositoryError>;
            async fn exists_by_id(&self, id: &str) -> Result<bool, RepositoryError>;
            async fn count(&self) -> Result<usize, RepositoryError>;
        }
    }

    mock! {
        SeedCustomerRepository {}

        #[async_trait]
        impl CustomerRepository for SeedCustomerRepository {
            async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError>;
            async fn find_by_id(&self, id: &str) -> Result<Option<Customer>, RepositoryError>;
            async fn save(&self, customer: Customer) -> Result<Customer, RepositoryError>;
            async fn delete_by_id(&self, id: &str) -> Result<(), RepositoryError>;
            async fn exists_by_id(&self, id: &str) -> Result<bool, RepositoryError>;
            async fn count(&self) -> Result<usize, RepositoryError>;
        }
    }

    #[tokio::test]
    async fn test_seed_fills_empty_collections() {
        let mut beers = MockSeedBeerRepository::new();
        beers.expect_count().returning(|| Ok(0));
        beers
            .expect_save()
            .times(3)
            .withf(|beer| beer.created_date.is_some() && !beer.id.is_empty())
            .returning(Ok);

        let mut customers = MockSeedCustomerRepository::new();
        customers.expect_count().returning(|| Ok(0));
        customers.expect_save().times(3).returning(Ok);

        let seeder = DataSeeder::new(Arc::new(beers), Arc::new(customers));
        let report = seeder.seed().await.unwrap();

        assert_eq!(
            report,
            SeedReport {
                beers_created: 3,
                customers_created: 3
            }
        );
    }

    #[tokio::test]
    async fn test_seed_skips_populated_collections() {
        let mut beers = MockSeedBeerRepository::new();
        beers.expect_count().returning(|| Ok(5));
        beers.expect_save().never();

        let mut customers = MockSeedCustomerRepository::new();
        customers.expect_count().returning(|| Ok(1));
        customers.expect_save().never();

        let seeder = DataSeeder::new(Arc::new(beers), Arc::new(customers));
        assert_eq!(seeder.seed().await.unwrap(), SeedReport::default());
    }

    #[test]
    fn test_sample_beers_pass_validation() {
        use crate::models::{BeerDto, Validate};

        for beer in sample_beers() {
            assert!(BeerDto::from(beer).validate().is_ok());
        }
    }
}
