pub mod beer;
pub mod customer;
pub mod error;
pub mod health;
pub mod metrics;
pub mod middleware;
pub mod routes;

pub use error::{service_error_to_response, ApiError, ApiResult};
pub use health::*;
pub use metrics::*;
pub use middleware::*;
pub use routes::create_app;
