use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::SessionModel,
    repository::SessionRepository,
    token::TokenConfig,
    types::{LoginRequest, LoginResponse, SessionClaims},
};
use crate::shared::{AppError, AppState};

/// Service for handling session business logic
///
/// There are no user accounts: a single shared password gates the whole
/// API, and each successful login mints an independent revocable session.
pub struct SessionService {
    repository: Arc<dyn SessionRepository + Send + Sync>,
    token_config: TokenConfig,
    shared_password: String,
}

/// Builds a session service from the shared application state
pub fn session_service(state: &AppState) -> SessionService {
    SessionService::new(
        Arc::clone(&state.session_repository),
        TokenConfig::new(
            state.config.jwt_secret.clone(),
            state.config.session_expiration_days,
        ),
        state.config.shared_password.clone(),
    )
}

impl SessionService {
    pub fn new(
        repository: Arc<dyn SessionRepository + Send + Sync>,
        token_config: TokenConfig,
        shared_password: String,
    ) -> Self {
        Self {
            repository,
            token_config,
            shared_password,
        }
    }

    /// Checks the shared password and creates a new session with a JWT token
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        if request.password != self.shared_password {
            warn!("Login attempt with wrong password");
            return Err(AppError::Unauthorized("Invalid password".to_string()));
        }

        let session = SessionModel::new(self.token_config.expiration_days);
        self.repository.create_session(&session).await?;

        let token = self.token_config.create_token(session.id.clone())?;

        info!(session_id = %session.id, "Login successful, session created");

        Ok(LoginResponse {
            token,
            expires_at: session.expires_at,
        })
    }

    /// Validates a session token and returns the claims if valid
    #[instrument(skip(self, token))]
    pub async fn validate_session(&self, token: &str) -> Result<SessionClaims, AppError> {
        // First validate JWT structure and signature
        let claims = self.token_config.validate_token(token)?;

        // Then validate the session exists and hasn't been revoked
        match self.repository.get_session(&claims.session_id).await? {
            Some(session_model) => {
                if session_model.is_expired() {
                    warn!(
                        session_id = %claims.session_id,
                        "Session found in database but has expired"
                    );
                    return Err(AppError::Unauthorized("Session has expired".to_string()));
                }

                Ok(claims)
            }
            None => {
                warn!(
                    session_id = %claims.session_id,
                    "Session not found in database - may have been revoked"
                );
                Err(AppError::Unauthorized(
                    "Session not found or has been revoked".to_string(),
                ))
            }
        }
    }

    /// Revokes a session by removing it from the database
    #[instrument(skip(self))]
    pub async fn revoke_session(&self, session_id: &str) -> Result<(), AppError> {
        info!(session_id = %session_id, "Revoking session");

        self.repository.delete_session(session_id).await?;

        info!(session_id = %session_id, "Session revoked successfully");
        Ok(())
    }

    /// Cleans up expired sessions from the database
    #[instrument(skip(self))]
    pub async fn cleanup_expired_sessions(&self) -> Result<u64, AppError> {
        info!("Starting cleanup of expired sessions");

        let removed_count = self.repository.cleanup_expired_sessions().await?;

        info!(
            removed_sessions = removed_count,
            "Expired sessions cleanup completed"
        );
        Ok(removed_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::repository::InMemorySessionRepository;

    fn test_service(repo: Arc<InMemorySessionRepository>) -> SessionService {
        SessionService::new(
            repo,
            TokenConfig::new("test-secret".to_string(), 7),
            "letmein".to_string(),
        )
    }

    fn login_request(password: &str) -> LoginRequest {
        LoginRequest {
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_with_correct_password() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let service = test_service(repo.clone());

        let response = service.login(login_request("letmein")).await.unwrap();

        assert!(!response.token.is_empty());
        assert!(response.token.contains('.')); // JWT has dots
        assert_eq!(repo.session_count(), 1);
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let service = test_service(repo.clone());

        let result = service.login(login_request("guess")).await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
        assert_eq!(repo.session_count(), 0);
    }

    #[tokio::test]
    async fn test_validate_session_success() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let service = test_service(repo);

        let response = service.login(login_request("letmein")).await.unwrap();

        let claims = service.validate_session(&response.token).await.unwrap();
        assert!(!claims.session_id.is_empty());
    }

    #[tokio::test]
    async fn test_validate_session_not_found() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let service = test_service(repo);

        // A structurally valid token whose session was never stored
        let token_config = TokenConfig::new("test-secret".to_string(), 7);
        let token = token_config
            .create_token("non-existent-session".to_string())
            .unwrap();

        let result = service.validate_session(&token).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_validate_session_rejects_forged_token() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let service = test_service(repo);

        let forged = TokenConfig::new("other-secret".to_string(), 7)
            .create_token("session".to_string())
            .unwrap();

        let result = service.validate_session(&forged).await;
        assert!(matches!(result, Err(AppError::JwtError(_))));
    }

    #[tokio::test]
    async fn test_revoke_session() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let service = test_service(repo);

        let response = service.login(login_request("letmein")).await.unwrap();
        let claims = service.validate_session(&response.token).await.unwrap();

        service.revoke_session(&claims.session_id).await.unwrap();

        let result = service.validate_session(&response.token).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_each_login_creates_a_fresh_session() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let service = test_service(repo.clone());

        let first = service.login(login_request("letmein")).await.unwrap();
        let second = service.login(login_request("letmein")).await.unwrap();

        assert_ne!(first.token, second.token);
        assert_eq!(repo.session_count(), 2);

        // Revoking one must not affect the other
        let claims = service.validate_session(&first.token).await.unwrap();
        service.revoke_session(&claims.session_id).await.unwrap();
        assert!(service.validate_session(&second.token).await.is_ok());
    }
}
