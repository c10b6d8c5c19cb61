mod common;

use async_trait::async_trait;
use common::*;
use portal_core::error::AppError;
use portal_service::models::Notification;
use portal_service::services::Notifier;
use serde_json::{json, Value};
use std::sync::Arc;

/// A delivery channel that is always down.
struct UnreachableInbox;

#[async_trait]
impl Notifier for UnreachableInbox {
    async fn notify(&self, _notification: &Notification) -> Result<(), AppError> {
        Err(AppError::ServiceUnavailable)
    }
}

async fn approved_vacation(app: &TestApp) -> String {
    let id = app.submit("/vacations", &nurse(), vacation_body()).await;
    let response = app
        .move_card("vacation", &id, &nursing_head(), json!({ "to": "approved" }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    id
}

#[tokio::test]
async fn notifications_can_be_read_one_by_one() {
    let app = TestApp::spawn().await;
    approved_vacation(&app).await;
    approved_vacation(&app).await;

    let inbox: Value = app.get("/notifications", &nurse()).await.json().await.unwrap();
    let first = inbox[0]["id"].as_str().unwrap().to_string();

    let response = app
        .post(&format!("/notifications/{}/read", first), &nurse(), &json!({}))
        .await;
    assert_eq!(response.status().as_u16(), 204);

    let unread: Value = app
        .get("/notifications/unread-count", &nurse())
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(unread["unread"], 1);

    let unread_only: Value = app
        .get("/notifications?unread_only=true", &nurse())
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(unread_only.as_array().unwrap().len(), 1);
    assert_ne!(unread_only[0]["id"], first.as_str());

    app.cleanup().await;
}

#[tokio::test]
async fn another_users_notification_is_not_found() {
    let app = TestApp::spawn().await;
    approved_vacation(&app).await;

    let inbox: Value = app.get("/notifications", &nurse()).await.json().await.unwrap();
    let id = inbox[0]["id"].as_str().unwrap();

    let response = app
        .post(&format!("/notifications/{}/read", id), &other_nurse(), &json!({}))
        .await;
    assert_eq!(response.status().as_u16(), 404);

    let response = app
        .post("/notifications/does-not-exist/read", &nurse(), &json!({}))
        .await;
    assert_eq!(response.status().as_u16(), 404);

    app.cleanup().await;
}

#[tokio::test]
async fn read_all_clears_the_badge() {
    let app = TestApp::spawn().await;
    approved_vacation(&app).await;
    approved_vacation(&app).await;

    let response: Value = app
        .post("/notifications/read-all", &nurse(), &json!({}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(response["updated"], 2);

    let unread: Value = app
        .get("/notifications/unread-count", &nurse())
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(unread["unread"], 0);

    app.cleanup().await;
}

#[tokio::test]
async fn moving_your_own_card_does_not_notify_you() {
    let app = TestApp::spawn().await;
    let id = app
        .submit("/department-requests", &technician(), department_body("Nursing"))
        .await;

    let admin_id = app
        .submit("/department-requests", &admin(), department_body("Nursing"))
        .await;
    let response = app
        .move_card("department", &admin_id, &admin(), json!({ "to": "in_progress" }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let inbox: Value = app.get("/notifications", &admin()).await.json().await.unwrap();
    assert!(inbox.as_array().unwrap().is_empty());

    let response = app
        .move_card("department", &id, &nurse(), json!({ "to": "in_progress" }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let inbox: Value = app.get("/notifications", &technician()).await.json().await.unwrap();
    assert_eq!(inbox.as_array().unwrap().len(), 1);

    app.cleanup().await;
}

#[tokio::test]
async fn failed_delivery_does_not_undo_the_move() {
    let app = TestApp::spawn_with_notifier(|_| Arc::new(UnreachableInbox)).await;
    let id = app.submit("/vacations", &nurse(), vacation_body()).await;

    let response = app
        .move_card("vacation", &id, &nursing_head(), json!({ "to": "approved" }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["changed"], true);
    assert_eq!(body["request"]["status"], "approved");

    let stored: Value = app
        .get(&format!("/vacations/{}", id), &nurse())
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(stored["status"], "approved");

    let unread: Value = app
        .get("/notifications/unread-count", &nurse())
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(unread["unread"], 0);

    app.cleanup().await;
}
