mod common;

use common::*;
use serde_json::{json, Value};

// =============================================================================
// Vacations
// =============================================================================

#[tokio::test]
async fn staff_submit_vacations_for_their_department() {
    let app = TestApp::spawn().await;

    let response = app.post("/vacations", &nurse(), &vacation_body()).await;
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["department"], "Nursing");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["days"], 5);
    assert_eq!(body["requester_name"], "Ana Nurse");

    app.cleanup().await;
}

#[tokio::test]
async fn staff_cannot_file_for_another_department() {
    let app = TestApp::spawn().await;

    let mut body = vacation_body();
    body["department"] = json!("Radiology");
    let response = app.post("/vacations", &nurse(), &body).await;
    assert_eq!(response.status().as_u16(), 403);

    let response = app.post("/vacations", &admin(), &body).await;
    assert_eq!(response.status().as_u16(), 201);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["department"], "Radiology");

    app.cleanup().await;
}

#[tokio::test]
async fn vacation_dates_are_checked() {
    let app = TestApp::spawn().await;

    let backwards = json!({ "start_date": "2026-11-06", "end_date": "2026-11-02" });
    let response = app.post("/vacations", &nurse(), &backwards).await;
    assert_eq!(response.status().as_u16(), 422);

    let too_long = json!({ "start_date": "2026-01-01", "end_date": "2026-06-30" });
    let response = app.post("/vacations", &nurse(), &too_long).await;
    assert_eq!(response.status().as_u16(), 422);

    app.cleanup().await;
}

#[tokio::test]
async fn vacation_lists_follow_visibility() {
    let app = TestApp::spawn().await;
    app.submit("/vacations", &nurse(), vacation_body()).await;
    app.submit("/vacations", &other_nurse(), vacation_body()).await;
    app.submit("/vacations", &radiology_head(), vacation_body()).await;

    let own: Value = app.get("/vacations", &nurse()).await.json().await.unwrap();
    assert_eq!(own["total"], 1);

    let head: Value = app.get("/vacations", &nursing_head()).await.json().await.unwrap();
    assert_eq!(head["total"], 2);

    let everyone: Value = app.get("/vacations", &admin()).await.json().await.unwrap();
    assert_eq!(everyone["total"], 3);

    let mine: Value = app
        .get("/vacations?mine=true", &nursing_head())
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(mine["total"], 0);

    app.cleanup().await;
}

#[tokio::test]
async fn pages_past_the_end_are_empty() {
    let app = TestApp::spawn().await;
    app.submit("/vacations", &nurse(), vacation_body()).await;

    let response = app
        .get("/vacations?page=18446744073709551615&page_size=100", &admin())
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["total"], 1);
    assert!(body["items"].as_array().unwrap().is_empty());

    app.cleanup().await;
}

#[tokio::test]
async fn invisible_requests_are_not_found() {
    let app = TestApp::spawn().await;
    let id = app.submit("/vacations", &nurse(), vacation_body()).await;

    let response = app.get(&format!("/vacations/{}", id), &other_nurse()).await;
    assert_eq!(response.status().as_u16(), 404);

    let response = app.get(&format!("/vacations/{}", id), &nursing_head()).await;
    assert_eq!(response.status().as_u16(), 200);

    app.cleanup().await;
}

#[tokio::test]
async fn list_status_filter_must_belong_to_the_kind() {
    let app = TestApp::spawn().await;
    app.submit("/vacations", &nurse(), vacation_body()).await;

    let response = app.get("/vacations?status=ordered", &nurse()).await;
    assert_eq!(response.status().as_u16(), 400);

    let pending: Value = app
        .get("/vacations?status=pending", &nurse())
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(pending["total"], 1);

    app.cleanup().await;
}

// =============================================================================
// Stock
// =============================================================================

#[tokio::test]
async fn stock_requests_are_validated() {
    let app = TestApp::spawn().await;

    let mut body = stock_body();
    body["quantity"] = json!(0);
    let response = app.post("/stock-requests", &nurse(), &body).await;
    assert_eq!(response.status().as_u16(), 422);

    let mut body = stock_body();
    body["justification"] = json!("   ");
    let response = app.post("/stock-requests", &nurse(), &body).await;
    assert_eq!(response.status().as_u16(), 422);

    let response = app.post("/stock-requests", &nurse(), &stock_body()).await;
    assert_eq!(response.status().as_u16(), 201);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["priority"], "urgent");
    assert_eq!(created["unit"], "boxes");

    app.cleanup().await;
}

#[tokio::test]
async fn purchasing_sees_every_stock_request() {
    let app = TestApp::spawn().await;
    app.submit("/stock-requests", &nurse(), stock_body()).await;
    app.submit("/stock-requests", &radiology_head(), stock_body()).await;

    let buyer_view: Value = app.get("/stock-requests", &buyer()).await.json().await.unwrap();
    assert_eq!(buyer_view["total"], 2);

    let head_view: Value = app
        .get("/stock-requests", &nursing_head())
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(head_view["total"], 1);

    app.cleanup().await;
}

// =============================================================================
// Department requests
// =============================================================================

#[tokio::test]
async fn department_requests_go_to_another_department() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/department-requests", &nurse(), &department_body(" Nursing "))
        .await;
    assert_eq!(response.status().as_u16(), 422);

    let response = app
        .post("/department-requests", &nurse(), &department_body("Maintenance"))
        .await;
    assert_eq!(response.status().as_u16(), 201);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["sender_department"], "Nursing");
    assert_eq!(created["receiver_department"], "Maintenance");

    app.cleanup().await;
}

#[tokio::test]
async fn receiving_department_sees_routed_requests() {
    let app = TestApp::spawn().await;
    let id = app
        .submit("/department-requests", &nurse(), department_body("Maintenance"))
        .await;

    let inbox: Value = app
        .get("/department-requests", &technician())
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(inbox["total"], 1);

    let outsider = app
        .get(&format!("/department-requests/{}", id), &radiology_head())
        .await;
    assert_eq!(outsider.status().as_u16(), 404);

    let sender_head = app
        .get(&format!("/department-requests/{}", id), &nursing_head())
        .await;
    assert_eq!(sender_head.status().as_u16(), 200);

    app.cleanup().await;
}
