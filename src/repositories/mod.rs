// Repositories module - data access layer

pub mod beer_repository;
pub mod customer_repository;
mod item;
pub mod table_manager;

pub use beer_repository::{BeerRepository, DynamoDbBeerRepository};
pub use customer_repository::{CustomerRepository, DynamoDbCustomerRepository};
pub use table_manager::TableManager;
