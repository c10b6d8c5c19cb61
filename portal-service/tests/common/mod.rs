#![allow(dead_code)]

use portal_core::config::Config as CoreConfig;
use portal_service::config::{
    AuthConfig, MongoConfig, ObservabilityConfig, PortalConfig, SecurityConfig, WorkflowConfig,
};
use portal_service::models::{Staff, StaffRole};
use portal_service::services::{init_metrics, MongoNotifier, Notifier, PortalDb, TokenService};
use portal_service::startup::Application;
use reqwest::{Client, Response};
use secrecy::Secret;
use serde_json::Value;
use std::sync::Arc;

pub const PURCHASING: &str = "Purchasing";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: PortalDb,
    pub database_name: String,
    pub tokens: TokenService,
    pub client: Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_notifier(|db| Arc::new(MongoNotifier::new(db.clone()))).await
    }

    pub async fn spawn_with_notifier<F>(notifier: F) -> Self
    where
        F: FnOnce(&PortalDb) -> Arc<dyn Notifier>,
    {
        init_metrics();

        let database_name = format!("portal_test_{}", uuid::Uuid::new_v4().simple());
        let auth = AuthConfig {
            jwt_secret: Secret::new("portal-test-secret".to_string()),
            jwt_issuer: None,
        };

        // Use random port for testing (port 0)
        let config = PortalConfig {
            common: CoreConfig {
                port: 0,
                log_level: "warn".to_string(),
            },
            mongodb: MongoConfig {
                uri: std::env::var("TEST_MONGODB_URI")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
                database: database_name.clone(),
            },
            auth: auth.clone(),
            workflow: WorkflowConfig {
                purchasing_department: PURCHASING.to_string(),
                board_event_capacity: 64,
            },
            security: SecurityConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            },
            observability: ObservabilityConfig {
                otlp_endpoint: None,
            },
        };

        let app = Application::build_with_notifier(config, notifier)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = Client::new();
        for _ in 0..50 {
            if client
                .get(format!("{}/health", address))
                .send()
                .await
                .is_ok()
            {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            database_name,
            tokens: TokenService::new(&auth),
            client,
        }
    }

    pub fn token_for(&self, staff: &Staff) -> String {
        self.tokens
            .issue(staff, chrono::Duration::minutes(30))
            .expect("Failed to issue test token")
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str, staff: &Staff) -> Response {
        self.client
            .get(self.url(path))
            .bearer_auth(self.token_for(staff))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post(&self, path: &str, staff: &Staff, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .bearer_auth(self.token_for(staff))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str, staff: &Staff) -> Response {
        self.client
            .delete(self.url(path))
            .bearer_auth(self.token_for(staff))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Submit a request and return its id.
    pub async fn submit(&self, path: &str, staff: &Staff, body: Value) -> String {
        let response = self.post(path, staff, &body).await;
        assert_eq!(response.status().as_u16(), 201, "submitting to {}", path);
        let created: Value = response.json().await.expect("Failed to parse response");
        created["id"].as_str().expect("id").to_string()
    }

    pub async fn move_card(&self, kind: &str, id: &str, staff: &Staff, body: Value) -> Response {
        self.post(&format!("/board/{}/{}/move", kind, id), staff, &body)
            .await
    }

    pub async fn cleanup(&self) {
        self.db
            .client()
            .database(&self.database_name)
            .drop(None)
            .await
            .ok();
    }
}

pub fn nurse() -> Staff {
    Staff::new("nurse-1", "Ana Nurse", StaffRole::Staff, "Nursing")
}

pub fn other_nurse() -> Staff {
    Staff::new("nurse-2", "Bruno Nurse", StaffRole::Staff, "Nursing")
}

pub fn nursing_head() -> Staff {
    Staff::new("head-nursing", "Carla Head", StaffRole::Head, "Nursing")
}

pub fn radiology_head() -> Staff {
    Staff::new("head-radiology", "Diego Head", StaffRole::Head, "Radiology")
}

pub fn buyer() -> Staff {
    Staff::new("buyer-1", "Eva Buyer", StaffRole::Staff, PURCHASING)
}

pub fn technician() -> Staff {
    Staff::new("tech-1", "Fabio Tech", StaffRole::Staff, "Maintenance")
}

pub fn maintenance_head() -> Staff {
    Staff::new("head-maintenance", "Gina Head", StaffRole::Head, "Maintenance")
}

pub fn admin() -> Staff {
    Staff::new("admin-1", "Hugo Admin", StaffRole::Admin, "Direction")
}

pub fn vacation_body() -> Value {
    serde_json::json!({
        "start_date": "2026-11-02",
        "end_date": "2026-11-06",
        "reason": "Family visit"
    })
}

pub fn stock_body() -> Value {
    serde_json::json!({
        "item": "Nitrile gloves",
        "quantity": 20,
        "unit": "boxes",
        "justification": "Ward 3 is running low",
        "priority": "urgent"
    })
}

pub fn department_body(receiver: &str) -> Value {
    serde_json::json!({
        "receiver_department": receiver,
        "subject": "Broken bed rail",
        "description": "Room 12, bed B"
    })
}
