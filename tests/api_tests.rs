use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;

use garage_dashboard::config::EnvironmentConfig;
use garage_dashboard::routes::create_router;
use garage_dashboard::state::AppState;
use garage_dashboard::store::MemoryRecordStore;

fn create_test_app() -> Router {
    let state = AppState::new(Arc::new(MemoryRecordStore::new()), EnvironmentConfig::default());
    create_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}

fn id_of(body: &Value) -> String {
    body["data"]["id"].as_str().unwrap().to_string()
}

/// Cliente con vehículo, servicio de 100.00 y mecánico
struct Fixture {
    customer_id: String,
    vehicle_id: String,
    service_id: String,
    mechanic_id: String,
}

async fn seed(app: &Router) -> Fixture {
    let (status, customer) = post(
        app,
        "/api/customers",
        json!({
            "name": "Lucía Romero",
            "email": "lucia@example.com",
            "phone": "600123123",
            "vehicle": { "make": "Seat", "model": "Ibiza", "year": 2015, "license_plate": "1234ABC" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let customer_id = id_of(&customer);

    let (_, detail) = get(app, &format!("/api/customers/{}", customer_id)).await;
    let vehicle_id = detail["vehicles"][0]["id"].as_str().unwrap().to_string();

    let (status, service) = post(
        app,
        "/api/services",
        json!({ "name": "Cambio de frenos", "estimated_hours": "1.5", "base_price": "100.00" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, mechanic) = post(
        app,
        "/api/mechanics",
        json!({ "name": "Pablo", "specialization": "Frenos", "hourly_rate": "35.00" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    Fixture {
        customer_id,
        vehicle_id,
        service_id: id_of(&service),
        mechanic_id: id_of(&mechanic),
    }
}

async fn create_job(app: &Router, fixture: &Fixture, scheduled_date: &str, total_cost: &str) -> String {
    let (status, job) = post(
        app,
        "/api/jobs",
        json!({
            "vehicle_id": fixture.vehicle_id,
            "service_id": fixture.service_id,
            "mechanic_id": fixture.mechanic_id,
            "scheduled_date": scheduled_date,
            "total_cost": total_cost
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(job["data"]["status"], "pending");
    id_of(&job)
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_customer_onboarding_with_vehicle() {
    let app = create_test_app();
    let fixture = seed(&app).await;

    let (status, body) = get(&app, &format!("/api/customers/{}", fixture.customer_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Lucía Romero");
    assert_eq!(body["vehicles"].as_array().unwrap().len(), 1);
    assert_eq!(body["vehicles"][0]["license_plate"], "1234ABC");
}

#[tokio::test]
async fn test_onboarding_rolls_back_on_duplicate_plate() {
    let app = create_test_app();
    seed(&app).await;

    let (status, _) = post(
        &app,
        "/api/customers",
        json!({
            "name": "Otro Cliente",
            "vehicle": { "make": "Opel", "model": "Corsa", "year": 2010, "license_plate": "1234ABC" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, customers) = get(&app, "/api/customers").await;
    assert_eq!(customers.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_customer_search() {
    let app = create_test_app();
    seed(&app).await;
    post(&app, "/api/customers", json!({ "name": "Marcos Gil", "phone": "911000000" })).await;

    let (_, by_name) = get(&app, "/api/customers?q=ROMERO").await;
    assert_eq!(by_name.as_array().unwrap().len(), 1);

    let (_, by_phone) = get(&app, "/api/customers?q=911").await;
    assert_eq!(by_phone.as_array().unwrap().len(), 1);
    assert_eq!(by_phone[0]["name"], "Marcos Gil");

    let (_, everyone) = get(&app, "/api/customers?q=").await;
    assert_eq!(everyone.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_payload_is_rejected() {
    let app = create_test_app();
    let (status, body) = post(&app, "/api/customers", json!({ "name": "Ana", "email": "no-es-email" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_missing_resources_return_404() {
    let app = create_test_app();
    let missing = uuid::Uuid::new_v4();

    let (status, _) = get(&app, &format!("/api/customers/{}", missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, &format!("/api/jobs/{}/invoice", missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/parts/{}", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_customer_with_vehicles_conflicts() {
    let app = create_test_app();
    let fixture = seed(&app).await;

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/customers/{}", fixture.customer_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/vehicles/{}", fixture.vehicle_id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/customers/{}", fixture.customer_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_invoice_totals() {
    let app = create_test_app();
    let fixture = seed(&app).await;
    let job_id = create_job(&app, &fixture, "2024-05-15T09:00:00Z", "0").await;

    let (_, part) = post(
        &app,
        "/api/parts",
        json!({ "name": "Pastillas de freno", "part_number": "PF-01", "quantity": 10, "unit_price": "25.00", "reorder_point": 2 }),
    )
    .await;
    let part_id = id_of(&part);

    let (status, line) = post(
        &app,
        &format!("/api/jobs/{}/parts", job_id),
        json!({ "part_id": part_id, "quantity": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&line["data"]["price_at_time"]), dec!(25));

    // El precio de catálogo cambia; la línea conserva el precio congelado
    send(
        &app,
        Method::PUT,
        &format!("/api/parts/{}", part_id),
        Some(json!({ "unit_price": "40.00" })),
    )
    .await;

    let (status, invoice) = get(&app, &format!("/api/jobs/{}/invoice", job_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&invoice["subtotal"]), dec!(150));
    assert_eq!(decimal(&invoice["tax"]), dec!(15));
    assert_eq!(decimal(&invoice["total"]), dec!(165));
    assert_eq!(invoice["lines"].as_array().unwrap().len(), 1);
    assert_eq!(invoice["lines"][0]["part_name"], "Pastillas de freno");
    assert_eq!(decimal(&invoice["lines"][0]["amount"]), dec!(50));
    assert_eq!(invoice["customer"]["name"], "Lucía Romero");
    assert_eq!(
        invoice["invoice_number"].as_str().unwrap(),
        job_id[..8].to_uppercase()
    );
}

#[tokio::test]
async fn test_remove_part_from_another_job_is_404() {
    let app = create_test_app();
    let fixture = seed(&app).await;
    let first = create_job(&app, &fixture, "2024-05-15T09:00:00Z", "0").await;
    let second = create_job(&app, &fixture, "2024-05-16T09:00:00Z", "0").await;

    let (_, part) = post(
        &app,
        "/api/parts",
        json!({ "name": "Filtro", "quantity": 5, "unit_price": "8.00", "reorder_point": 1 }),
    )
    .await;
    let (_, line) = post(
        &app,
        &format!("/api/jobs/{}/parts", first),
        json!({ "part_id": id_of(&part), "quantity": 1 }),
    )
    .await;
    let line_id = id_of(&line);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/jobs/{}/parts/{}", second, line_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/jobs/{}/parts/{}", first, line_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = get(&app, &format!("/api/jobs/{}", first)).await;
    assert!(detail["parts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_status_transitions_manage_completed_at() {
    let app = create_test_app();
    let fixture = seed(&app).await;
    let job_id = create_job(&app, &fixture, "2024-05-15T09:00:00Z", "120.00").await;
    let uri = format!("/api/jobs/{}/status", job_id);

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "status": "in_progress" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "in_progress");
    assert!(body["data"]["completed_at"].is_null());

    let (_, body) = send(&app, Method::PATCH, &uri, Some(json!({ "status": "completed" }))).await;
    assert_eq!(body["data"]["status"], "completed");
    let completed_at = body["data"]["completed_at"].clone();
    assert!(completed_at.is_string());

    // Repetir `completed` conserva la marca original
    let (_, body) = send(&app, Method::PATCH, &uri, Some(json!({ "status": "completed" }))).await;
    assert_eq!(body["data"]["completed_at"], completed_at);

    let (_, body) = send(&app, Method::PATCH, &uri, Some(json!({ "status": "pending" }))).await;
    assert_eq!(body["data"]["status"], "pending");
    assert!(body["data"]["completed_at"].is_null());

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({ "status": "archived" }))).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_job_list_filters_by_status() {
    let app = create_test_app();
    let fixture = seed(&app).await;
    let first = create_job(&app, &fixture, "2024-05-15T09:00:00Z", "0").await;
    create_job(&app, &fixture, "2024-05-16T09:00:00Z", "0").await;

    send(
        &app,
        Method::PATCH,
        &format!("/api/jobs/{}/status", first),
        Some(json!({ "status": "cancelled" })),
    )
    .await;

    let (_, pending) = get(&app, "/api/jobs?status=pending").await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let (_, cancelled) = get(&app, "/api/jobs?status=cancelled").await;
    assert_eq!(cancelled.as_array().unwrap().len(), 1);
    assert_eq!(cancelled[0]["id"], first);
    assert_eq!(cancelled[0]["service"]["name"], "Cambio de frenos");
}

#[tokio::test]
async fn test_dashboard_stats() {
    let app = create_test_app();
    let fixture = seed(&app).await;
    let first = create_job(&app, &fixture, "2024-05-15T09:00:00Z", "100.00").await;
    create_job(&app, &fixture, "2024-05-16T09:00:00Z", "50.50").await;

    send(
        &app,
        Method::PATCH,
        &format!("/api/jobs/{}/status", first),
        Some(json!({ "status": "completed" })),
    )
    .await;

    for (name, quantity, reorder_point) in [("A", 1, 5), ("B", 5, 5), ("C", 9, 5)] {
        post(
            &app,
            "/api/parts",
            json!({ "name": name, "quantity": quantity, "unit_price": "1.00", "reorder_point": reorder_point }),
        )
        .await;
    }

    let (status, stats) = get(&app, "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_customers"], 1);
    assert_eq!(stats["total_vehicles"], 1);
    assert_eq!(stats["pending_jobs"], 1);
    assert_eq!(stats["critical_parts"], 2);
    assert_eq!(stats["monthly_jobs"], 2);
    assert_eq!(decimal(&stats["monthly_revenue"]), dec!(150.50));
    assert_eq!(stats["recent_jobs"].as_array().unwrap().len(), 2);
    assert_eq!(stats["recent_jobs"][0]["vehicle"]["customer"]["name"], "Lucía Romero");
}

#[tokio::test]
async fn test_part_low_stock_flag() {
    let app = create_test_app();
    let (_, created) = post(
        &app,
        "/api/parts",
        json!({ "name": "Bujía", "quantity": 2, "unit_price": "4.50", "reorder_point": 3 }),
    )
    .await;
    assert_eq!(created["data"]["low_stock"], true);

    let (_, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/parts/{}", id_of(&created)),
        Some(json!({ "quantity": 20 })),
    )
    .await;
    assert_eq!(updated["data"]["low_stock"], false);
}

#[tokio::test]
async fn test_week_schedule_buckets() {
    let app = create_test_app();
    let fixture = seed(&app).await;
    create_job(&app, &fixture, "2024-05-12T08:00:00Z", "0").await; // domingo
    create_job(&app, &fixture, "2024-05-15T09:00:00Z", "0").await; // miércoles
    create_job(&app, &fixture, "2024-05-19T00:00:00Z", "0").await; // semana siguiente

    let (status, week) = get(&app, "/api/schedule?date=2024-05-15").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(week["week_start"], "2024-05-12");
    assert_eq!(week["week_end"], "2024-05-18");
    assert_eq!(week["previous_week"], "2024-05-05");
    assert_eq!(week["next_week"], "2024-05-19");

    let days = week["days"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0]["date"], "2024-05-12");
    assert_eq!(days[0]["items"].as_array().unwrap().len(), 1);
    assert_eq!(days[3]["items"].as_array().unwrap().len(), 1);
    let total: usize = days.iter().map(|d| d["items"].as_array().unwrap().len()).sum();
    assert_eq!(total, 2);

    let (status, _) = get(&app, "/api/schedule?date=15/05/2024").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_with_null_clears_optional_fields() {
    let app = create_test_app();
    let fixture = seed(&app).await;
    let uri = format!("/api/customers/{}", fixture.customer_id);

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "email": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], Value::Null);
    assert_eq!(body["data"]["phone"], "600123123");

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "name": "Lucía R." }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], Value::Null);
    assert_eq!(body["data"]["phone"], "600123123");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/mechanics/{}", fixture.mechanic_id),
        Some(json!({ "hourly_rate": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["hourly_rate"], Value::Null);
    assert_eq!(body["data"]["name"], "Pablo");
}

#[tokio::test]
async fn test_week_schedule_at_calendar_limits() {
    let app = create_test_app();

    let (status, body) = get(&app, "/api/schedule?date=%2B262142-12-31").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, week) = get(&app, "/api/schedule?date=9999-12-31").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(week["days"].as_array().unwrap().len(), 7);

    let (status, _) = get(&app, "/api/schedule?date=0001-01-01").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_vehicle_history_lists_jobs() {
    let app = create_test_app();
    let fixture = seed(&app).await;
    create_job(&app, &fixture, "2024-05-15T09:00:00Z", "0").await;

    let (status, vehicle) = get(&app, &format!("/api/vehicles/{}", fixture.vehicle_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(vehicle["customer"]["name"], "Lucía Romero");
    assert_eq!(vehicle["jobs"].as_array().unwrap().len(), 1);
    assert_eq!(vehicle["jobs"][0]["service"]["name"], "Cambio de frenos");
}
