use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request body for the login endpoint
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Response structure for a successful login
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String, // The JWT token
    pub expires_at: DateTime<Utc>,
}

/// JWT claims structure containing session information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub session_id: String,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}
