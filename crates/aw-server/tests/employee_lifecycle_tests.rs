//! End-to-end employee lifecycle over HTTP
//!
//! Requires a PostgreSQL server (`DATABASE_URL`); run with `--ignored`.

use axum::http::{Method, StatusCode};
use axum::Router;
use serde_json::{json, Value};

mod common;

use common::{app_with_pool, call, fresh_database};

async fn seed_reference_rows(app: &Router) -> (i64, i64) {
    let (status, department) = call(
        app,
        Method::POST,
        "/api/v1/departments",
        Some(json!({ "name": "Engineering", "group_name": "Research and Development" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, shift) = call(
        app,
        Method::POST,
        "/api/v1/shifts",
        Some(json!({ "name": "Day", "start_time": "07:00:00", "end_time": "15:00:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    (
        department["data"]["department_id"].as_i64().unwrap(),
        shift["data"]["shift_id"].as_i64().unwrap(),
    )
}

fn new_employee(department_id: i64, shift_id: i64) -> Value {
    json!({
        "first_name": "Roberto",
        "last_name": "Tamburello",
        "national_id_number": "509647174",
        "login_id": "adventure-works\\roberto0",
        "job_title": "Engineering Manager",
        "birth_date": "1974-11-12",
        "marital_status": "M",
        "gender": "M",
        "hire_date": "2007-11-11",
        "vacation_hours": 2,
        "sick_leave_hours": 21,
        "email_address": "roberto0@adventure-works.com",
        "department_id": department_id,
        "shift_id": shift_id,
        "rate": "43.2692",
        "pay_frequency": 2
    })
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
async fn test_create_terminate_rehire_flow() {
    let app = app_with_pool(fresh_database().await);
    let (department_id, shift_id) = seed_reference_rows(&app).await;

    let (status, created) = call(
        &app,
        Method::POST,
        "/api/v1/employees",
        Some(new_employee(department_id, shift_id)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    let id = created["data"]["business_entity_id"].as_i64().unwrap();
    assert_eq!(created["data"]["department_id"], department_id);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/employees",
        Some(new_employee(department_id, shift_id)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, terminated) = call(
        &app,
        Method::POST,
        &format!("/api/v1/employees/{id}/terminate"),
        Some(json!({ "termination_date": "2024-03-01", "reason": "Relocation" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{terminated}");
    assert_eq!(terminated["data"]["current_flag"], false);
    assert_eq!(terminated["data"]["vacation_hours"], 0);
    assert_eq!(terminated["data"]["pto_hours_paid_out"], 23);

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/v1/employees/{id}/terminate"),
        Some(json!({ "termination_date": "2024-03-02" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_OPERATION");

    let rehire = |date: &str| {
        json!({
            "rehire_date": date,
            "department_id": department_id,
            "shift_id": shift_id,
            "rate": "45.00"
        })
    };

    // 2024-05-29 is 89 days after 2024-03-01
    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/api/v1/employees/{id}/rehire"),
        Some(rehire("2024-05-29")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, rehired) = call(
        &app,
        Method::POST,
        &format!("/api/v1/employees/{id}/rehire"),
        Some(rehire("2024-05-30")),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{rehired}");
    assert_eq!(rehired["data"]["current_flag"], true);
    assert_eq!(rehired["data"]["hire_date"], "2024-05-30");

    let (status, history) = call(
        &app,
        Method::GET,
        &format!("/api/v1/employees/{id}/department-history"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = history["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["end_date"], "2024-03-01");
    assert!(rows[1]["end_date"].is_null());

    let (status, pay) = call(&app, Method::GET, &format!("/api/v1/employees/{id}/pay-history"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pay["data"].as_array().unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
async fn test_sales_person_and_store_rules() {
    let app = app_with_pool(fresh_database().await);
    let (department_id, shift_id) = seed_reference_rows(&app).await;

    let (_, created) = call(
        &app,
        Method::POST,
        "/api/v1/employees",
        Some(new_employee(department_id, shift_id)),
    )
    .await;
    let id = created["data"]["business_entity_id"].as_i64().unwrap();

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/sales-persons",
        Some(json!({ "business_entity_id": 987654 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, promoted) = call(
        &app,
        Method::POST,
        "/api/v1/sales-persons",
        Some(json!({ "business_entity_id": id, "bonus": "500", "commission_pct": "0.015" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{promoted}");

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/sales-persons",
        Some(json!({ "business_entity_id": id })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, store) = call(
        &app,
        Method::POST,
        "/api/v1/stores",
        Some(json!({ "name": "Riders Bike Shop", "sales_person_id": id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let store_id = store["data"]["business_entity_id"].as_i64().unwrap();

    let (status, listed) = call(&app, Method::GET, &format!("/api/v1/stores?sales_person_id={id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["meta"]["pagination"]["total"], 1);

    let (status, _) = call(&app, Method::DELETE, &format!("/api/v1/sales-persons/{id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(&app, Method::DELETE, &format!("/api/v1/stores/{store_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, Method::DELETE, &format!("/api/v1/sales-persons/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
async fn test_pending_employee_is_hired_then_terminated() {
    let app = app_with_pool(fresh_database().await);
    let (department_id, shift_id) = seed_reference_rows(&app).await;

    let mut pending = new_employee(department_id, shift_id);
    for field in ["department_id", "shift_id", "rate", "pay_frequency"] {
        pending.as_object_mut().unwrap().remove(field);
    }
    let (status, created) = call(&app, Method::POST, "/api/v1/employees", Some(pending)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["current_flag"], false);
    let id = created["data"]["business_entity_id"].as_i64().unwrap();

    let (status, history) =
        call(&app, Method::GET, &format!("/api/v1/employees/{id}/department-history"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(history["data"].as_array().unwrap().is_empty());

    let hire = json!({
        "hire_date": "2024-03-01",
        "department_id": department_id,
        "shift_id": shift_id,
        "rate": "38.00",
        "pay_frequency": 2
    });
    let (status, hired) =
        call(&app, Method::POST, &format!("/api/v1/employees/{id}/hire"), Some(hire.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hired["data"]["current_flag"], true);

    let (status, body) =
        call(&app, Method::POST, &format!("/api/v1/employees/{id}/hire"), Some(hire.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_OPERATION");

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/api/v1/employees/{id}/terminate"),
        Some(json!({ "termination_date": "2024-05-31" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, Method::POST, &format!("/api/v1/employees/{id}/hire"), Some(hire)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
