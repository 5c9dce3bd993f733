use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument};

use super::error::{
    error_response, json_rejection_to_response, service_error_to_response, ApiResult,
};
use super::routes::BEER_PATH;
use crate::models::{BeerDto, BeerPatchDto};
use crate::observability::BusinessTracingMiddleware;
use crate::services::BeerService;

#[derive(Clone)]
pub struct BeerState {
    pub beer_service: Arc<BeerService>,
    pub tracer: Arc<BusinessTracingMiddleware>,
}

/// Optional filters for listing beers
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBeersQuery {
    pub beer_style: Option<String>,
    pub beer_name: Option<String>,
}

/// Beer id for routes declared without a path variable
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeerIdQuery {
    pub beer_id: Option<String>,
}

type CreatedBeer = (StatusCode, [(header::HeaderName, String); 1], Json<BeerDto>);

/// List beers, narrowed by `beerName` and/or `beerStyle` when given
#[instrument(name = "list_beers", skip(state), fields(
    beer_style = query.beer_style.as_deref(),
    beer_name = query.beer_name.as_deref(),
))]
pub async fn list_beers(
    State(state): State<BeerState>,
    Query(query): Query<ListBeersQuery>,
) -> ApiResult<Json<Vec<BeerDto>>> {
    let style = non_blank(query.beer_style);
    let name = non_blank(query.beer_name);
    let service = &state.beer_service;

    let lookup = async {
        match (&name, &style) {
            (Some(name), style) => service.find_first_by_beer_name(name).await.map(|found| {
                found
                    .into_iter()
                    .filter(|beer| style.as_ref().map_or(true, |s| &beer.beer_style == s))
                    .collect()
            }),
            (None, Some(style)) => service.find_by_beer_style(style).await,
            (None, None) => service.list_beers().await,
        }
    };

    let beers = state
        .tracer
        .trace_beer_operation("list", style.as_deref(), lookup)
        .await
        .map_err(|err| {
            error!("Failed to list beers: {}", err);
            service_error_to_response(err)
        })?;

    info!("Returning {} beers", beers.len());
    Ok(Json(beers))
}

#[instrument(name = "get_beer_by_id", skip(state), fields(beer_id = %beer_id))]
pub async fn get_beer_by_id(
    State(state): State<BeerState>,
    Path(beer_id): Path<String>,
) -> ApiResult<Json<BeerDto>> {
    state
        .tracer
        .trace_beer_operation("get", None, state.beer_service.get_beer_by_id(&beer_id))
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

/// Create a beer and point the client at its new location
#[instrument(name = "create_new_beer", skip(state, body))]
pub async fn create_new_beer(
    State(state): State<BeerState>,
    body: Result<Json<BeerDto>, JsonRejection>,
) -> ApiResult<CreatedBeer> {
    let Json(dto) = body.map_err(json_rejection_to_response)?;
    let style = dto.beer_style.clone();

    let saved = state
        .tracer
        .trace_beer_operation("create", Some(style.as_str()), state.beer_service.save_new_beer(dto))
        .await
        .map_err(service_error_to_response)?;

    let location = format!("{}/{}", BEER_PATH, saved.id.as_deref().unwrap_or_default());
    crate::info_with_trace!("Beer created at {}", location);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(saved)))
}

/// Replace a beer; id comes from the path, `beerId` query, or the body
#[instrument(name = "update_beer_by_id", skip(state, path, query, body))]
pub async fn update_beer_by_id(
    State(state): State<BeerState>,
    path: Option<Path<String>>,
    Query(query): Query<BeerIdQuery>,
    body: Result<Json<BeerDto>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(dto) = body.map_err(json_rejection_to_response)?;
    let beer_id = resolve_beer_id(path, query, dto.id.clone())?;

    state
        .tracer
        .trace_beer_operation("update", None, state.beer_service.update_beer(&beer_id, dto))
        .await
        .map_err(service_error_to_response)?;

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(name = "patch_beer_by_id", skip(state, path, query, body))]
pub async fn patch_beer_by_id(
    State(state): State<BeerState>,
    path: Option<Path<String>>,
    Query(query): Query<BeerIdQuery>,
    body: Result<Json<BeerPatchDto>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(patch) = body.map_err(json_rejection_to_response)?;
    let beer_id = resolve_beer_id(path, query, None)?;

    state
        .tracer
        .trace_beer_operation("patch", None, state.beer_service.patch_beer(&beer_id, patch))
        .await
        .map_err(service_error_to_response)?;

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(name = "delete_beer_by_id", skip(state, path, query))]
pub async fn delete_beer_by_id(
    State(state): State<BeerState>,
    path: Option<Path<String>>,
    Query(query): Query<BeerIdQuery>,
) -> ApiResult<StatusCode> {
    let beer_id = resolve_beer_id(path, query, None)?;

    state
        .tracer
        .trace_beer_operation("delete", None, state.beer_service.delete_beer_by_id(&beer_id))
        .await
        .map_err(service_error_to_response)?;

    Ok(StatusCode::NO_CONTENT)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Path beats query beats body
fn resolve_beer_id(
    path: Option<Path<String>>,
    query: BeerIdQuery,
    body_id: Option<String>,
) -> ApiResult<String> {
    path.map(|Path(id)| id)
        .or(query.beer_id)
        .or(body_id)
        .and_then(|id| non_blank(Some(id)))
        .ok_or_else(|| error_response(StatusCode::BAD_REQUEST, "Missing beer id"))
}
