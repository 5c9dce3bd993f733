#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::net::TcpListener;

use brewery_rs::config::ServerConfig;
use brewery_rs::create_app;
use brewery_rs::models::{Beer, Customer, RepositoryResult};
use brewery_rs::repositories::{BeerRepository, CustomerRepository};
use brewery_rs::services::{BeerService, CustomerService};
use brewery_rs::Metrics;

/// Beer repository kept in process memory, ordered by insertion
#[derive(Default)]
pub struct InMemoryBeerRepository {
    beers: Mutex<Vec<Beer>>,
}

#[async_trait]
impl BeerRepository for InMemoryBeerRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<Beer>> {
        Ok(self.beers.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Beer>> {
        Ok(self
            .beers
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn find_first_by_beer_name(&self, beer_name: &str) -> RepositoryResult<Option<Beer>> {
        Ok(self
            .beers
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.beer_name == beer_name)
            .cloned())
    }

    async fn find_by_beer_style(&self, beer_style: &str) -> RepositoryResult<Vec<Beer>> {
        Ok(self
            .beers
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.beer_style == beer_style)
            .cloned()
            .collect())
    }

    async fn save(&self, beer: Beer) -> RepositoryResult<Beer> {
        let mut beers = self.beers.lock().unwrap();
        match beers.iter_mut().find(|b| b.id == beer.id) {
            Some(existing) => *existing = beer.clone(),
            None => beers.push(beer.clone()),
        }
        Ok(beer)
    }

    async fn delete_by_id(&self, id: &str) -> RepositoryResult<()> {
        self.beers.lock().unwrap().retain(|b| b.id != id);
        Ok(())
    }

    async fn exists_by_id(&self, id: &str) -> RepositoryResult<bool> {
        Ok(self.beers.lock().unwrap().iter().any(|b| b.id == id))
    }

    async fn count(&self) -> RepositoryResult<usize> {
        Ok(self.beers.lock().unwrap().len())
    }
}

#[derive(Default)]
pub struct InMemoryCustomerRepository {
    customers: Mutex<HashMap<String, Customer>>,
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<Customer>> {
        Ok(self.customers.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Customer>> {
        Ok(self.customers.lock().unwrap().get(id).cloned())
    }

    async fn save(&self, customer: Customer) -> RepositoryResult<Customer> {
        self.customers
            .lock()
            .unwrap()
            .insert(customer.id.clone(), customer.clone());
        Ok(customer)
    }

    async fn delete_by_id(&self, id: &str) -> RepositoryResult<()> {
        self.customers.lock().unwrap().remove(id);
        Ok(())
    }

    async fn exists_by_id(&self, id: &str) -> RepositoryResult<bool> {
        Ok(self.customers.lock().unwrap().contains_key(id))
    }

    async fn count(&self) -> RepositoryResult<usize> {
        Ok(self.customers.lock().unwrap().len())
    }
}

pub struct TestEnvironment {
    pub client: Client,
    pub base_url: String,
    pub beers: Arc<InMemoryBeerRepository>,
    pub customers: Arc<InMemoryCustomerRepository>,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        let beers = Arc::new(InMemoryBeerRepository::default());
        let customers = Arc::new(InMemoryCustomerRepository::default());

        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_seconds: 5,
            max_request_size: 64 * 1024,
        };

        let app = create_app(
            Arc::new(Metrics::new().expect("Failed to create metrics")),
            Arc::new(BeerService::new(beers.clone())),
            Arc::new(CustomerService::new(customers.clone())),
            &server,
        );

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local address");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Failed to serve app");
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            client: Client::new(),
            base_url,
            beers,
            customers,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
