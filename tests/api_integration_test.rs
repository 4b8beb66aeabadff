use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use device_loans::api;
use device_loans::db;
use device_loans::infrastructure::AppState;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

// Helper to create the API router over a fresh database
async fn setup_test_app() -> Router {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    api::api_router(AppState::new(db))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().uri(uri).method(method);
    let req = match body {
        Some(payload) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// Helper to create a category and one device in it
async fn create_test_device(app: &Router) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/categories",
        Some(json!({ "name": "Tablet", "daily_late_rate": "1.50", "damage_fee": "80.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = body["category"]["id"].as_i64().unwrap();

    let (status, body) = send(
        app,
        "POST",
        "/devices",
        Some(json!({ "name": "iPad Air", "tis_id": "TIS-0101", "category_id": category_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["device"]["status"], "available");
    assert_eq!(body["device"]["category_name"], "Tablet");
    body["device"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app().await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_loan_round_trip() {
    let app = setup_test_app().await;
    let device_id = create_test_device(&app).await;

    // 1. Open
    let (status, body) = send(
        &app,
        "POST",
        "/loans",
        Some(json!({
            "device_id": device_id,
            "course_id": 7,
            "patron_id": "s1234567",
            "check_out_date": "2024-03-01T09:00:00Z",
            "due_date": "2024-03-03T09:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let loan_id = body["loan"]["id"].as_i64().unwrap();
    assert_eq!(body["detail"]["patron_id"], "s1234567");
    assert_eq!(body["loan"]["return_flag"], false);

    let (_, body) = send(&app, "GET", &format!("/devices/{}", device_id), None).await;
    assert_eq!(body["device"]["status"], "loaned");

    let (_, body) = send(&app, "GET", "/loans/overdue", None).await;
    assert_eq!(body["total"], 1);

    // 2. A second open for the same device conflicts
    let (status, body) = send(
        &app,
        "POST",
        "/loans",
        Some(json!({
            "device_id": device_id,
            "course_id": 7,
            "patron_id": "s7654321",
            "due_date": "2030-01-01T00:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("not available"));

    // 3. Return three hours after the due date
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/loans/{}/return", loan_id),
        Some(json!({
            "check_in_date": "2024-03-03T12:00:00Z",
            "comments": "screen fine"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "closed");
    assert_eq!(body["loan"]["return_flag"], true);
    assert_eq!(body["loan"]["penalty"], "1.50");
    assert_eq!(body["amount_due"], "1.50");

    let (_, body) = send(&app, "GET", &format!("/loans/{}", loan_id), None).await;
    assert_eq!(body["loan"]["comments"], "screen fine");
    assert_eq!(body["detail"]["late"], true);

    // 4. Returning again conflicts
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/loans/{}/return", loan_id),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, "GET", &format!("/devices/{}", device_id), None).await;
    assert_eq!(body["device"]["status"], "available");

    let (_, body) = send(&app, "GET", "/loans?open=false", None).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_damaged_return_and_repair() {
    let app = setup_test_app().await;
    let device_id = create_test_device(&app).await;

    let (_, body) = send(
        &app,
        "POST",
        "/loans",
        Some(json!({
            "device_id": device_id,
            "course_id": 7,
            "patron_id": "s1234567",
            "check_out_date": "2024-03-01T09:00:00Z",
            "due_date": "2024-03-03T09:00:00Z"
        })),
    )
    .await;
    let loan_id = body["loan"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/loans/{}/return", loan_id),
        Some(json!({
            "check_in_date": "2024-03-02T09:00:00Z",
            "damage": { "damaged": true }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["loan"]["damaged_penalty"], "80.00");

    let (_, body) = send(&app, "GET", "/devices?status=damaged", None).await;
    assert_eq!(body["total"], 1);

    // Clients cannot hand out a device by setting its status
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/devices/{}/status", device_id),
        Some(json!({ "status": "loaned" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/devices/{}/status", device_id),
        Some(json!({ "status": "available" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["device"]["status"], "available");

    // History keeps the device from being deleted
    let (status, _) = send(&app, "DELETE", &format!("/devices/{}", device_id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", &format!("/loans/{}", loan_id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "DELETE", &format!("/devices/{}", device_id), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_device_and_annotations() {
    let app = setup_test_app().await;
    let device_id = create_test_device(&app).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/devices/{}", device_id),
        Some(json!({
            "name": "iPad Air (M2)",
            "tis_id": "TIS-0101",
            "category_id": 1,
            "notes": "keyboard case"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["device"]["name"], "iPad Air (M2)");
    assert_eq!(body["device"]["notes"], "keyboard case");
    assert_eq!(body["device"]["status"], "available");

    let (status, _) = send(
        &app,
        "PUT",
        "/devices/999",
        Some(json!({ "name": "Ghost", "tis_id": "TIS-9999", "category_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(
        &app,
        "POST",
        "/loans",
        Some(json!({
            "device_id": device_id,
            "course_id": 7,
            "patron_id": "s1234567",
            "due_date": "2030-01-01T00:00:00Z"
        })),
    )
    .await;
    let loan_id = body["loan"]["id"].as_i64().unwrap();
    let detail_id = body["detail"]["id"].as_i64().unwrap();

    // Lifecycle fields in the payload are ignored
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/loans/{}", loan_id),
        Some(json!({ "comments": "left at reception", "penalty": "99.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["loan"]["comments"], "left at reception");
    assert_eq!(body["loan"]["penalty"], "0.00");
    assert_eq!(body["state"], "open");

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/loan-details/{}", detail_id),
        Some(json!({ "notes": "charger missing", "late": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["loan_detail"]["notes"], "charger missing");
    assert_eq!(body["loan_detail"]["late"], false);

    let (status, _) = send(&app, "PATCH", "/loans/999", Some(json!({ "notes": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
