//! Address API routes
//!
//! - `GET /api/v1/addresses` (`city`, `postal_code` filters)
//! - `GET|PUT|PATCH|DELETE /api/v1/addresses/:id`
//! - `POST /api/v1/addresses`
//! - `GET /api/v1/address-types`
//! - `GET /api/v1/state-provinces` (`country_region_code` filter)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::{
    commands::{CreateAddressCommand, DeleteAddressCommand, PatchAddressCommand, UpdateAddressCommand},
    queries::{GetAddressQuery, ListAddressTypesQuery, ListAddressesQuery, ListStateProvincesQuery},
};
use crate::api::response::ApiResponse;
use crate::cqrs::{dispatch, AppMediator};
use crate::error::AppError;

pub fn addresses_routes() -> Router<AppMediator> {
    Router::new()
        .route("/", get(list_addresses).post(create_address))
        .route(
            "/:id",
            get(get_address)
                .put(update_address)
                .patch(patch_address)
                .delete(delete_address),
        )
}

/// Lookup tables used when entering addresses
pub fn address_reference_routes() -> Router<AppMediator> {
    Router::new()
        .route("/address-types", get(list_address_types))
        .route("/state-provinces", get(list_state_provinces))
}

async fn list_addresses(
    State(mediator): State<AppMediator>,
    Query(query): Query<ListAddressesQuery>,
) -> Result<Response, AppError> {
    let page = dispatch(&mediator, query).await?;
    Ok(ApiResponse::paginated(page.items, &page.pagination).into_response())
}

async fn get_address(
    State(mediator): State<AppMediator>,
    Path(address_id): Path<i32>,
) -> Result<Response, AppError> {
    let address = dispatch(&mediator, GetAddressQuery { address_id }).await?;
    Ok(ApiResponse::success(address).into_response())
}

async fn create_address(
    State(mediator): State<AppMediator>,
    Json(command): Json<CreateAddressCommand>,
) -> Result<Response, AppError> {
    let address = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(address).created())
}

async fn update_address(
    State(mediator): State<AppMediator>,
    Path(address_id): Path<i32>,
    Json(mut command): Json<UpdateAddressCommand>,
) -> Result<Response, AppError> {
    command.address_id = address_id;
    let address = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(address).into_response())
}

async fn patch_address(
    State(mediator): State<AppMediator>,
    Path(address_id): Path<i32>,
    Json(mut command): Json<PatchAddressCommand>,
) -> Result<Response, AppError> {
    command.address_id = address_id;
    let address = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(address).into_response())
}

async fn delete_address(
    State(mediator): State<AppMediator>,
    Path(address_id): Path<i32>,
) -> Result<Response, AppError> {
    dispatch(&mediator, DeleteAddressCommand { address_id }).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn list_address_types(State(mediator): State<AppMediator>) -> Result<Response, AppError> {
    let types = dispatch(&mediator, ListAddressTypesQuery).await?;
    Ok(ApiResponse::success(types).into_response())
}

async fn list_state_provinces(
    State(mediator): State<AppMediator>,
    Query(query): Query<ListStateProvincesQuery>,
) -> Result<Response, AppError> {
    let provinces = dispatch(&mediator, query).await?;
    Ok(ApiResponse::success(provinces).into_response())
}
