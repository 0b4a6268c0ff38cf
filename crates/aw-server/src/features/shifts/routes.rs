//! Shift API routes
//!
//! - `GET /api/v1/shifts` and `GET /api/v1/shifts/:id`
//! - `POST /api/v1/shifts`
//! - `PUT /api/v1/shifts/:id`
//! - `DELETE /api/v1/shifts/:id`

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::{
    commands::{CreateShiftCommand, DeleteShiftCommand, UpdateShiftCommand},
    queries::{GetShiftQuery, ListShiftsQuery},
};
use crate::api::response::ApiResponse;
use crate::cqrs::{dispatch, AppMediator};
use crate::error::AppError;

pub fn shifts_routes() -> Router<AppMediator> {
    Router::new()
        .route("/", get(list_shifts).post(create_shift))
        .route("/:id", get(get_shift).put(update_shift).delete(delete_shift))
}

async fn list_shifts(
    State(mediator): State<AppMediator>,
    Query(query): Query<ListShiftsQuery>,
) -> Result<Response, AppError> {
    let page = dispatch(&mediator, query).await?;
    Ok(ApiResponse::paginated(page.items, &page.pagination).into_response())
}

async fn get_shift(
    State(mediator): State<AppMediator>,
    Path(shift_id): Path<i16>,
) -> Result<Response, AppError> {
    let shift = dispatch(&mediator, GetShiftQuery { shift_id }).await?;
    Ok(ApiResponse::success(shift).into_response())
}

async fn create_shift(
    State(mediator): State<AppMediator>,
    Json(command): Json<CreateShiftCommand>,
) -> Result<Response, AppError> {
    let shift = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(shift).created())
}

async fn update_shift(
    State(mediator): State<AppMediator>,
    Path(shift_id): Path<i16>,
    Json(mut command): Json<UpdateShiftCommand>,
) -> Result<Response, AppError> {
    command.shift_id = shift_id;
    let shift = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(shift).into_response())
}

async fn delete_shift(
    State(mediator): State<AppMediator>,
    Path(shift_id): Path<i16>,
) -> Result<Response, AppError> {
    dispatch(&mediator, DeleteShiftCommand { shift_id }).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
