#![allow(dead_code, unused_imports)]

mod mock_email;
mod request;

pub use mock_email::*;
pub use request::*;

use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tisa::app::build_app;
use tisa::config::AppConfig;
use tisa::memory::MemoryStore;
use tisa::state::AppState;
use uuid::Uuid;

/// Shared error response type for test assertions
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Test context containing all test infrastructure
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub email_service: Arc<MockEmailService>,
    pub state: AppState,
    pub app: Router,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(AppConfig::for_tests())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let email_service = Arc::new(MockEmailService::new());
        let state = AppState::from_parts(
            Arc::new(config),
            store.clone(),
            store.clone(),
            email_service.clone(),
        );
        let app = build_app(state.clone());
        Self {
            store,
            email_service,
            state,
            app,
        }
    }

    /// Run Registrate and return the pending id with the emailed code.
    pub async fn registrate(&self, username: &str, email: &str, password: &str) -> (Uuid, String) {
        let (status, body): (u16, tisa::responses::IdResponse) = post_json(
            &self.app,
            "/api/Auth/Registrate",
            json!({ "username": username, "email": email, "password": password }),
        )
        .await;
        assert_eq!(status, 200, "registrate should succeed");
        let code = self
            .email_service
            .last_code_for(&email.trim().to_lowercase())
            .expect("verification code emailed");
        (body.id, code)
    }

    /// Registrate + Verify; returns the issued token.
    pub async fn register_user(&self, username: &str, email: &str, password: &str) -> String {
        let (id, code) = self.registrate(username, email, password).await;
        let (status, body): (u16, tisa::responses::TokenResponse) = post_json(
            &self.app,
            &format!("/api/Auth/Verify?pendingRegId={id}"),
            json!(code),
        )
        .await;
        assert_eq!(status, 200, "verify should succeed");
        body.token
    }
}
