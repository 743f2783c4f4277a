use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::json;
use tower::ServiceExt;

use tallyboard::{
    config::AppConfig, game::repository::InMemoryGameRepository,
    player::repository::InMemoryPlayerRepository, session::repository::InMemorySessionRepository,
    tournament::repository::InMemoryTournamentRepository, AppState,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub app: Router,
    pub token: String,
}

pub struct TestSetupBuilder {
    password: String,
    grace_minutes: i64,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            password: "test-password".to_string(),
            grace_minutes: 15,
        }
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.password = password.to_string();
        self
    }

    pub fn with_grace_minutes(mut self, minutes: i64) -> Self {
        self.grace_minutes = minutes;
        self
    }

    pub async fn build(self) -> TestSetup {
        let config = AppConfig {
            addr: "127.0.0.1:0".to_string(),
            database_url: None,
            shared_password: self.password.clone(),
            jwt_secret: "workflow-test-secret".to_string(),
            session_expiration_days: 7,
            game_delete_grace_minutes: self.grace_minutes,
        };

        let state = AppState::new(
            Arc::new(InMemoryPlayerRepository::new()),
            Arc::new(InMemoryTournamentRepository::new()),
            Arc::new(InMemoryGameRepository::new()),
            Arc::new(InMemorySessionRepository::new()),
            config,
        );
        let app = tallyboard::app(state);

        // Log in once so the actions can authenticate their requests
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({ "password": self.password }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let token = body["token"].as_str().unwrap().to_string();

        TestSetup { app, token }
    }
}
