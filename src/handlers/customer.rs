use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::Json,
};
use std::sync::Arc;
use tracing::instrument;

use super::error::{json_rejection_to_response, service_error_to_response, ApiResult};
use super::routes::CUSTOMER_PATH;
use crate::models::{CustomerDto, CustomerPatchDto};
use crate::observability::BusinessTracingMiddleware;
use crate::services::CustomerService;

#[derive(Clone)]
pub struct CustomerState {
    pub customer_service: Arc<CustomerService>,
    pub tracer: Arc<BusinessTracingMiddleware>,
}

type CreatedCustomer = (StatusCode, [(header::HeaderName, String); 1], Json<CustomerDto>);

#[instrument(name = "list_customers", skip(state))]
pub async fn list_customers(State(state): State<CustomerState>) -> ApiResult<Json<Vec<CustomerDto>>> {
    state
        .tracer
        .trace_customer_operation("list", state.customer_service.list_customers())
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

#[instrument(name = "get_customer_by_id", skip(state), fields(customer_id = %customer_id))]
pub async fn get_customer_by_id(
    State(state): State<CustomerState>,
    Path(customer_id): Path<String>,
) -> ApiResult<Json<CustomerDto>> {
    state
        .tracer
        .trace_customer_operation("get", state.customer_service.get_customer_by_id(&customer_id))
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

#[instrument(name = "create_new_customer", skip(state, body))]
pub async fn create_new_customer(
    State(state): State<CustomerState>,
    body: Result<Json<CustomerDto>, JsonRejection>,
) -> ApiResult<CreatedCustomer> {
    let Json(dto) = body.map_err(json_rejection_to_response)?;

    let saved = state
        .tracer
        .trace_customer_operation("create", state.customer_service.save_new_customer(dto))
        .await
        .map_err(service_error_to_response)?;

    let location = format!(
        "{}/{}",
        CUSTOMER_PATH,
        saved.id.as_deref().unwrap_or_default()
    );
    crate::info_with_trace!("Customer created at {}", location);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(saved)))
}

#[instrument(name = "update_customer_by_id", skip(state, body), fields(customer_id = %customer_id))]
pub async fn update_customer_by_id(
    State(state): State<CustomerState>,
    Path(customer_id): Path<String>,
    body: Result<Json<CustomerDto>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(dto) = body.map_err(json_rejection_to_response)?;

    state
        .tracer
        .trace_customer_operation(
            "update",
            state.customer_service.update_customer(&customer_id, dto),
        )
        .await
        .map_err(service_error_to_response)?;

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(name = "patch_customer_by_id", skip(state, body), fields(customer_id = %customer_id))]
pub async fn patch_customer_by_id(
    State(state): State<CustomerState>,
    Path(customer_id): Path<String>,
    body: Result<Json<CustomerPatchDto>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(patch) = body.map_err(json_rejection_to_response)?;

    state
        .tracer
        .trace_customer_operation(
            "patch",
            state.customer_service.patch_customer(&customer_id, patch),
        )
        .await
        .map_err(service_error_to_response)?;

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(name = "delete_customer_by_id", skip(state), fields(customer_id = %customer_id))]
pub async fn delete_customer_by_id(
    State(state): State<CustomerState>,
    Path(customer_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .tracer
        .trace_customer_operation(
            "delete",
            state.customer_service.delete_customer_by_id(&customer_id),
        )
        .await
        .map_err(service_error_to_response)?;

    Ok(StatusCode::NO_CONTENT)
}
