//! Department API routes
//!
//! - `GET /api/v1/departments` - List departments (`group_name` filter)
//! - `GET /api/v1/departments/:id` - Get one department
//! - `POST /api/v1/departments` - Create a department
//! - `PUT /api/v1/departments/:id` - Replace name and group
//! - `PATCH /api/v1/departments/:id` - Partial update
//! - `DELETE /api/v1/departments/:id` - Delete an unreferenced department

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::{
    commands::{
        CreateDepartmentCommand, DeleteDepartmentCommand, PatchDepartmentCommand,
        UpdateDepartmentCommand,
    },
    queries::{GetDepartmentQuery, ListDepartmentsQuery},
};
use crate::api::response::ApiResponse;
use crate::cqrs::{dispatch, AppMediator};
use crate::error::AppError;

pub fn departments_routes() -> Router<AppMediator> {
    Router::new()
        .route("/", get(list_departments).post(create_department))
        .route(
            "/:id",
            get(get_department)
                .put(update_department)
                .patch(patch_department)
                .delete(delete_department),
        )
}

async fn list_departments(
    State(mediator): State<AppMediator>,
    Query(query): Query<ListDepartmentsQuery>,
) -> Result<Response, AppError> {
    let page = dispatch(&mediator, query).await?;
    Ok(ApiResponse::paginated(page.items, &page.pagination).into_response())
}

async fn get_department(
    State(mediator): State<AppMediator>,
    Path(department_id): Path<i16>,
) -> Result<Response, AppError> {
    let department = dispatch(&mediator, GetDepartmentQuery { department_id }).await?;
    Ok(ApiResponse::success(department).into_response())
}

#[tracing::instrument(skip(mediator, command), fields(name = %command.name))]
async fn create_department(
    State(mediator): State<AppMediator>,
    Json(command): Json<CreateDepartmentCommand>,
) -> Result<Response, AppError> {
    let department = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(department).created())
}

async fn update_department(
    State(mediator): State<AppMediator>,
    Path(department_id): Path<i16>,
    Json(mut command): Json<UpdateDepartmentCommand>,
) -> Result<Response, AppError> {
    command.department_id = department_id;
    let department = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(department).into_response())
}

async fn patch_department(
    State(mediator): State<AppMediator>,
    Path(department_id): Path<i16>,
    Json(mut command): Json<PatchDepartmentCommand>,
) -> Result<Response, AppError> {
    command.department_id = department_id;
    let department = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(department).into_response())
}

async fn delete_department(
    State(mediator): State<AppMediator>,
    Path(department_id): Path<i16>,
) -> Result<Response, AppError> {
    dispatch(&mediator, DeleteDepartmentCommand { department_id }).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
