mod common;

use common::*;
use serde_json::{json, Value};

fn notice(title: &str) -> Value {
    json!({ "title": title, "body": "Details inside" })
}

#[tokio::test]
async fn staff_cannot_publish_notices() {
    let app = TestApp::spawn().await;
    let response = app.post("/notices", &nurse(), &notice("Lunch")).await;
    assert_eq!(response.status().as_u16(), 403);
    app.cleanup().await;
}

#[tokio::test]
async fn heads_publish_to_their_own_department() {
    let app = TestApp::spawn().await;

    let response = app.post("/notices", &nursing_head(), &notice("Rota")).await;
    assert_eq!(response.status().as_u16(), 201);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["audience"], "Nursing");

    let mut elsewhere = notice("Rota");
    elsewhere["audience"] = json!("Radiology");
    let response = app.post("/notices", &nursing_head(), &elsewhere).await;
    assert_eq!(response.status().as_u16(), 403);

    let nursing: Value = app.get("/notices", &nurse()).await.json().await.unwrap();
    assert_eq!(nursing.as_array().unwrap().len(), 1);

    let radiology: Value = app.get("/notices", &radiology_head()).await.json().await.unwrap();
    assert!(radiology.as_array().unwrap().is_empty());

    app.cleanup().await;
}

#[tokio::test]
async fn hospital_wide_notices_reach_everyone_pinned_first() {
    let app = TestApp::spawn().await;
    app.post("/notices", &admin(), &notice("Parking")).await;
    let mut pinned = notice("Fire drill");
    pinned["pinned"] = json!(true);
    app.post("/notices", &admin(), &pinned).await;

    let feed: Value = app.get("/notices", &technician()).await.json().await.unwrap();
    let titles: Vec<&str> = feed
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Fire drill", "Parking"]);

    app.cleanup().await;
}

#[tokio::test]
async fn expiry_must_be_in_the_future() {
    let app = TestApp::spawn().await;
    let mut expired = notice("Old news");
    expired["expires_at"] = json!("2020-01-01T00:00:00Z");
    let response = app.post("/notices", &admin(), &expired).await;
    assert_eq!(response.status().as_u16(), 422);
    app.cleanup().await;
}

#[tokio::test]
async fn only_author_or_admin_archives() {
    let app = TestApp::spawn().await;
    let created: Value = app
        .post("/notices", &nursing_head(), &notice("Rota"))
        .await
        .json()
        .await
        .unwrap();
    let path = format!("/notices/{}", created["id"].as_str().unwrap());

    let response = app.delete(&path, &nurse()).await;
    assert_eq!(response.status().as_u16(), 403);

    let response = app.delete(&path, &nursing_head()).await;
    assert_eq!(response.status().as_u16(), 204);

    let response = app.delete(&path, &admin()).await;
    assert_eq!(response.status().as_u16(), 404);

    let feed: Value = app.get("/notices", &nurse()).await.json().await.unwrap();
    assert!(feed.as_array().unwrap().is_empty());

    app.cleanup().await;
}
