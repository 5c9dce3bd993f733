use axum::{
    http::{header, Method},
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
};

use super::beer::{self, BeerState};
use super::customer::{self, CustomerState};
use super::{health_check, metrics_handler, request_validation_middleware, security_headers_middleware};
use crate::config::ServerConfig;
use crate::observability::{observability_middleware, BusinessTracingMiddleware, Metrics};
use crate::services::{BeerService, CustomerService};

pub const BEER_PATH: &str = "/api/beer";
pub const BEER_PATH_ID: &str = "/api/beer/:beer_id";
pub const BEER_SAVE_PATH: &str = "/api/beer/save";
pub const BEER_UPDATE_PATH: &str = "/api/update";
pub const BEER_PATCH_PATH: &str = "/api/patch";
pub const BEER_DELETE_PATH: &str = "/api/delete";
pub const BEER_UPDATE_PATH_ID: &str = "/api/update/:beer_id";
pub const BEER_PATCH_PATH_ID: &str = "/api/patch/:beer_id";
pub const BEER_DELETE_PATH_ID: &str = "/api/delete/:beer_id";

pub const CUSTOMER_PATH: &str = "/api/customer";
pub const CUSTOMER_PATH_ID: &str = "/api/customer/:customer_id";

pub const HEALTH_PATH: &str = "/health/status";
pub const METRICS_PATH: &str = "/metrics";

pub fn beer_routes(state: BeerState) -> Router {
    Router::new()
        .route(BEER_PATH, get(beer::list_beers))
        // Static segment wins over `:beer_id`, so GET /api/beer/save is 405
        .route(BEER_SAVE_PATH, post(beer::create_new_beer))
        .route(BEER_PATH_ID, get(beer::get_beer_by_id))
        .route(BEER_UPDATE_PATH, put(beer::update_beer_by_id))
        .route(BEER_UPDATE_PATH_ID, put(beer::update_beer_by_id))
        .route(BEER_PATCH_PATH, patch(beer::patch_beer_by_id))
        .route(BEER_PATCH_PATH_ID, patch(beer::patch_beer_by_id))
        .route(BEER_DELETE_PATH, delete(beer::delete_beer_by_id))
        .route(BEER_DELETE_PATH_ID, delete(beer::delete_beer_by_id))
        .with_state(state)
}

pub fn customer_routes(state: CustomerState) -> Router {
    Router::new()
        .route(
            CUSTOMER_PATH,
            get(customer::list_customers).post(customer::create_new_customer),
        )
        .route(
            CUSTOMER_PATH_ID,
            get(customer::get_customer_by_id)
                .put(customer::update_customer_by_id)
                .patch(customer::patch_customer_by_id)
                .delete(customer::delete_customer_by_id),
        )
        .with_state(state)
}

/// Assemble the full application router with its middleware stack
pub fn create_app(
    metrics: Arc<Metrics>,
    beer_service: Arc<BeerService>,
    customer_service: Arc<CustomerService>,
    server: &ServerConfig,
) -> Router {
    let tracer = Arc::new(BusinessTracingMiddleware::new(metrics.clone()));
    let metrics_for_middleware = metrics.clone();

    let beer_state = BeerState {
        beer_service,
        tracer: tracer.clone(),
    };
    let customer_state = CustomerState {
        customer_service,
        tracer,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(86400));

    Router::new()
        .route(HEALTH_PATH, get(health_check))
        .route(METRICS_PATH, get(metrics_handler))
        .with_state(metrics)
        .merge(beer_routes(beer_state))
        .merge(customer_routes(customer_state))
        // Outermost layer is listed last
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_validation_middleware))
        .layer(RequestBodyLimitLayer::new(server.max_request_size))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors)
        .layer(middleware::from_fn(move |req, next| {
            observability_middleware(metrics_for_middleware.clone(), req, next)
        }))
}
