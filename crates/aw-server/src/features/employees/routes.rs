//! Employee API routes
//!
//! - `GET /api/v1/employees` - List (`current_flag`, `job_title_contains`, `department_id`)
//! - `POST /api/v1/employees` - Create person, employee, contact details and first assignment
//! - `GET|PUT|PATCH|DELETE /api/v1/employees/:id`
//! - `GET /api/v1/employees/:id/department-history`
//! - `GET|POST /api/v1/employees/:id/pay-history`
//! - `GET|POST /api/v1/employees/:id/addresses`
//! - `POST /api/v1/employees/:id/hire`
//! - `POST /api/v1/employees/:id/terminate`
//! - `POST /api/v1/employees/:id/rehire`

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use super::{
    commands::{
        AddEmployeeAddressCommand, AddPayHistoryCommand, CreateEmployeeCommand,
        DeleteEmployeeCommand, HireEmployeeCommand, PatchEmployeeCommand, RehireEmployeeCommand,
        TerminateEmployeeCommand, UpdateEmployeeCommand,
    },
    queries::{
        GetDepartmentHistoryQuery, GetEmployeeQuery, GetPayHistoryQuery,
        ListEmployeeAddressesQuery, ListEmployeesQuery,
    },
};
use crate::api::response::ApiResponse;
use crate::cqrs::{dispatch, AppMediator};
use crate::error::AppError;

pub fn employees_routes() -> Router<AppMediator> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route(
            "/:id",
            get(get_employee)
                .put(update_employee)
                .patch(patch_employee)
                .delete(delete_employee),
        )
        .route("/:id/department-history", get(get_department_history))
        .route("/:id/pay-history", get(get_pay_history).post(add_pay_history))
        .route("/:id/addresses", get(list_addresses).post(add_address))
        .route("/:id/hire", post(hire_employee))
        .route("/:id/terminate", post(terminate_employee))
        .route("/:id/rehire", post(rehire_employee))
}

async fn list_employees(
    State(mediator): State<AppMediator>,
    Query(query): Query<ListEmployeesQuery>,
) -> Result<Response, AppError> {
    let page = dispatch(&mediator, query).await?;
    Ok(ApiResponse::paginated(page.items, &page.pagination).into_response())
}

async fn get_employee(
    State(mediator): State<AppMediator>,
    Path(business_entity_id): Path<i32>,
) -> Result<Response, AppError> {
    let employee = dispatch(&mediator, GetEmployeeQuery { business_entity_id }).await?;
    Ok(ApiResponse::success(employee).into_response())
}

#[tracing::instrument(skip(mediator, command), fields(login_id = %command.login_id))]
async fn create_employee(
    State(mediator): State<AppMediator>,
    Json(command): Json<CreateEmployeeCommand>,
) -> Result<Response, AppError> {
    let employee = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(employee).created())
}

async fn update_employee(
    State(mediator): State<AppMediator>,
    Path(business_entity_id): Path<i32>,
    Json(mut command): Json<UpdateEmployeeCommand>,
) -> Result<Response, AppError> {
    command.business_entity_id = business_entity_id;
    let employee = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(employee).into_response())
}

async fn patch_employee(
    State(mediator): State<AppMediator>,
    Path(business_entity_id): Path<i32>,
    Json(mut command): Json<PatchEmployeeCommand>,
) -> Result<Response, AppError> {
    command.business_entity_id = business_entity_id;
    let employee = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(employee).into_response())
}

async fn delete_employee(
    State(mediator): State<AppMediator>,
    Path(business_entity_id): Path<i32>,
) -> Result<Response, AppError> {
    dispatch(&mediator, DeleteEmployeeCommand { business_entity_id }).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn get_department_history(
    State(mediator): State<AppMediator>,
    Path(business_entity_id): Path<i32>,
) -> Result<Response, AppError> {
    let history = dispatch(&mediator, GetDepartmentHistoryQuery { business_entity_id }).await?;
    Ok(ApiResponse::success(history).into_response())
}

async fn get_pay_history(
    State(mediator): State<AppMediator>,
    Path(business_entity_id): Path<i32>,
) -> Result<Response, AppError> {
    let history = dispatch(&mediator, GetPayHistoryQuery { business_entity_id }).await?;
    Ok(ApiResponse::success(history).into_response())
}

async fn add_pay_history(
    State(mediator): State<AppMediator>,
    Path(business_entity_id): Path<i32>,
    Json(mut command): Json<AddPayHistoryCommand>,
) -> Result<Response, AppError> {
    command.business_entity_id = business_entity_id;
    let entry = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(entry).created())
}

async fn list_addresses(
    State(mediator): State<AppMediator>,
    Path(business_entity_id): Path<i32>,
) -> Result<Response, AppError> {
    let addresses = dispatch(&mediator, ListEmployeeAddressesQuery { business_entity_id }).await?;
    Ok(ApiResponse::success(addresses).into_response())
}

async fn add_address(
    State(mediator): State<AppMediator>,
    Path(business_entity_id): Path<i32>,
    Json(mut command): Json<AddEmployeeAddressCommand>,
) -> Result<Response, AppError> {
    command.business_entity_id = business_entity_id;
    let address = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(address).created())
}

#[tracing::instrument(skip(mediator, command), fields(hire_date = %command.hire_date))]
async fn hire_employee(
    State(mediator): State<AppMediator>,
    Path(business_entity_id): Path<i32>,
    Json(mut command): Json<HireEmployeeCommand>,
) -> Result<Response, AppError> {
    command.business_entity_id = business_entity_id;
    let outcome = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(outcome).into_response())
}

#[tracing::instrument(skip(mediator, command), fields(termination_date = %command.termination_date))]
async fn terminate_employee(
    State(mediator): State<AppMediator>,
    Path(business_entity_id): Path<i32>,
    Json(mut command): Json<TerminateEmployeeCommand>,
) -> Result<Response, AppError> {
    command.business_entity_id = business_entity_id;
    let outcome = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(outcome).into_response())
}

#[tracing::instrument(skip(mediator, command), fields(rehire_date = %command.rehire_date))]
async fn rehire_employee(
    State(mediator): State<AppMediator>,
    Path(business_entity_id): Path<i32>,
    Json(mut command): Json<RehireEmployeeCommand>,
) -> Result<Response, AppError> {
    command.business_entity_id = business_entity_id;
    let outcome = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(outcome).into_response())
}
