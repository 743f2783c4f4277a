use axum::{extract::State, http::StatusCode, Extension, Json};
use tracing::{info, instrument};

use super::{
    service::session_service,
    types::{LoginRequest, LoginResponse, SessionClaims},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for logging in with the shared scorekeeper password
///
/// POST /login
/// Returns a JWT token on success
#[instrument(name = "login", skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    info!("Processing login request");

    let service = session_service(&state);
    let response = service.login(request).await?;

    info!("Login successful");

    Ok(Json(response))
}

/// HTTP handler for revoking the current session
///
/// POST /logout
/// Requires a valid session; the token stops working immediately.
#[instrument(name = "logout", skip(state, claims))]
pub async fn logout(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<StatusCode, AppError> {
    info!(session_id = %claims.session_id, "Processing logout request");

    let service = session_service(&state);
    service.revoke_session(&claims.session_id).await?;

    info!(session_id = %claims.session_id, "Logout successful");

    Ok(StatusCode::NO_CONTENT)
}
