use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use super::setup::TestSetup;

// ============================================================================
// Request Helpers
// ============================================================================

impl TestSetup {
    /// Send an authenticated request and return the status with the parsed body
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.send(method, uri, body, Some(&self.token)).await
    }

    /// Send a request without the session token
    pub async fn request_without_token(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.send(method, uri, body, None).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        // Non-JSON bodies (health probe, empty responses) come back as plain values
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    /// Register a player and return their id
    pub async fn create_player(&self, display_name: &str) -> Uuid {
        let (status, body) = self
            .post("/players", json!({ "display_name": display_name }))
            .await;
        assert_eq!(status, StatusCode::OK);
        parse_id(&body)
    }

    /// Create a draft tournament and return its id
    pub async fn create_tournament(&self, name: &str) -> Uuid {
        let (status, body) = self.post("/tournaments", json!({ "name": name })).await;
        assert_eq!(status, StatusCode::OK);
        parse_id(&body)
    }

    /// Add a player to a tournament roster
    pub async fn join_roster(&self, tournament_id: Uuid, player_id: Uuid) {
        let (status, _) = self
            .post(
                &format!("/tournaments/{tournament_id}/roster"),
                json!({ "player_id": player_id }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    /// Move a tournament to a new lifecycle status
    pub async fn set_tournament_status(&self, tournament_id: Uuid, status_name: &str) {
        let (status, _) = self
            .post(
                &format!("/tournaments/{tournament_id}/status"),
                json!({ "status": status_name }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    /// Record a game for a tournament and return the game id
    pub async fn record_tournament_game(&self, tournament_id: Uuid, events: Vec<Value>) -> Uuid {
        let (status, body) = self
            .post(
                "/games",
                json!({ "tournament_id": tournament_id, "events": events }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        parse_id(&body)
    }

    /// Record a casual game played at a given time and return the game id
    pub async fn record_casual_game_at(&self, played_at: &str, events: Vec<Value>) -> Uuid {
        let (status, body) = self
            .post("/games", json!({ "played_at": played_at, "events": events }))
            .await;
        assert_eq!(status, StatusCode::OK);
        parse_id(&body)
    }
}

// ============================================================================
// Score Event Builders
// ============================================================================

/// A plus mark ("I") credited to a player
pub fn plus(player_id: Uuid) -> Value {
    json!({ "player_id": player_id, "type": "I" })
}

/// A minus mark ("X") charged to a player
pub fn minus(player_id: Uuid) -> Value {
    json!({ "player_id": player_id, "type": "X" })
}

fn parse_id(body: &Value) -> Uuid {
    body["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .unwrap()
}
