//! Store API routes
//!
//! - `GET /api/v1/stores` (`sales_person_id` filter)
//! - `GET|PUT|DELETE /api/v1/stores/:id`
//! - `POST /api/v1/stores`

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::{
    commands::{CreateStoreCommand, DeleteStoreCommand, UpdateStoreCommand},
    queries::{GetStoreQuery, ListStoresQuery},
};
use crate::api::response::ApiResponse;
use crate::cqrs::{dispatch, AppMediator};
use crate::error::AppError;

pub fn stores_routes() -> Router<AppMediator> {
    Router::new()
        .route("/", get(list_stores).post(create_store))
        .route("/:id", get(get_store).put(update_store).delete(delete_store))
}

async fn list_stores(
    State(mediator): State<AppMediator>,
    Query(query): Query<ListStoresQuery>,
) -> Result<Response, AppError> {
    let page = dispatch(&mediator, query).await?;
    Ok(ApiResponse::paginated(page.items, &page.pagination).into_response())
}

async fn get_store(
    State(mediator): State<AppMediator>,
    Path(business_entity_id): Path<i32>,
) -> Result<Response, AppError> {
    let store = dispatch(&mediator, GetStoreQuery { business_entity_id }).await?;
    Ok(ApiResponse::success(store).into_response())
}

#[tracing::instrument(skip(mediator, command), fields(name = %command.name))]
async fn create_store(
    State(mediator): State<AppMediator>,
    Json(command): Json<CreateStoreCommand>,
) -> Result<Response, AppError> {
    let store = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(store).created())
}

async fn update_store(
    State(mediator): State<AppMediator>,
    Path(business_entity_id): Path<i32>,
    Json(mut command): Json<UpdateStoreCommand>,
) -> Result<Response, AppError> {
    command.business_entity_id = business_entity_id;
    let store = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(store).into_response())
}

async fn delete_store(
    State(mediator): State<AppMediator>,
    Path(business_entity_id): Path<i32>,
) -> Result<Response, AppError> {
    dispatch(&mediator, DeleteStoreCommand { business_entity_id }).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
