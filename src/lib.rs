pub mod config;
pub mod handlers;
pub mod mappers;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod services;

pub use config::{Config, ConfigError};
pub use handlers::create_app;
pub use observability::{init_observability, shutdown_observability, Metrics};
