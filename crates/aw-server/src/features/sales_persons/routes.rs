//! Sales person API routes
//!
//! - `GET /api/v1/sales-persons` (`territory_id` filter)
//! - `GET|PUT|DELETE /api/v1/sales-persons/:id`
//! - `POST /api/v1/sales-persons` - Promote a current employee
//! - `GET /api/v1/sales-territories`

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::{
    commands::{CreateSalesPersonCommand, DeleteSalesPersonCommand, UpdateSalesPersonCommand},
    queries::{GetSalesPersonQuery, ListSalesPersonsQuery, ListTerritoriesQuery},
};
use crate::api::response::ApiResponse;
use crate::cqrs::{dispatch, AppMediator};
use crate::error::AppError;

pub fn sales_persons_routes() -> Router<AppMediator> {
    Router::new()
        .route("/", get(list_sales_persons).post(create_sales_person))
        .route(
            "/:id",
            get(get_sales_person)
                .put(update_sales_person)
                .delete(delete_sales_person),
        )
}

pub fn sales_territory_routes() -> Router<AppMediator> {
    Router::new().route("/sales-territories", get(list_territories))
}

async fn list_sales_persons(
    State(mediator): State<AppMediator>,
    Query(query): Query<ListSalesPersonsQuery>,
) -> Result<Response, AppError> {
    let page = dispatch(&mediator, query).await?;
    Ok(ApiResponse::paginated(page.items, &page.pagination).into_response())
}

async fn get_sales_person(
    State(mediator): State<AppMediator>,
    Path(business_entity_id): Path<i32>,
) -> Result<Response, AppError> {
    let sales_person = dispatch(&mediator, GetSalesPersonQuery { business_entity_id }).await?;
    Ok(ApiResponse::success(sales_person).into_response())
}

async fn create_sales_person(
    State(mediator): State<AppMediator>,
    Json(command): Json<CreateSalesPersonCommand>,
) -> Result<Response, AppError> {
    let sales_person = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(sales_person).created())
}

async fn update_sales_person(
    State(mediator): State<AppMediator>,
    Path(business_entity_id): Path<i32>,
    Json(mut command): Json<UpdateSalesPersonCommand>,
) -> Result<Response, AppError> {
    command.business_entity_id = business_entity_id;
    let sales_person = dispatch(&mediator, command).await?;
    Ok(ApiResponse::success(sales_person).into_response())
}

async fn delete_sales_person(
    State(mediator): State<AppMediator>,
    Path(business_entity_id): Path<i32>,
) -> Result<Response, AppError> {
    dispatch(&mediator, DeleteSalesPersonCommand { business_entity_id }).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn list_territories(State(mediator): State<AppMediator>) -> Result<Response, AppError> {
    let territories = dispatch(&mediator, ListTerritoriesQuery).await?;
    Ok(ApiResponse::success(territories).into_response())
}
