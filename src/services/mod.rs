// Services module - business logic layer

pub mod beer_service;
pub mod bootstrap;
pub mod customer_service;

pub use beer_service::BeerService;
pub use bootstrap::{DataSeeder, SeedReport};
pub use customer_service::CustomerService;
