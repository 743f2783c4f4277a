use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::config::AppConfig;
use crate::game::repository::GameRepository;
use crate::player::repository::PlayerRepository;
use crate::session::repository::SessionRepository;
use crate::tournament::repository::TournamentRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub player_repository: Arc<dyn PlayerRepository + Send + Sync>,
    pub tournament_repository: Arc<dyn TournamentRepository + Send + Sync>,
    pub game_repository: Arc<dyn GameRepository + Send + Sync>,
    pub session_repository: Arc<dyn SessionRepository + Send + Sync>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(
        player_repository: Arc<dyn PlayerRepository + Send + Sync>,
        tournament_repository: Arc<dyn TournamentRepository + Send + Sync>,
        game_repository: Arc<dyn GameRepository + Send + Sync>,
        session_repository: Arc<dyn SessionRepository + Send + Sync>,
        config: AppConfig,
    ) -> Self {
        Self {
            player_repository,
            tournament_repository,
            game_repository,
            session_repository,
            config,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::JwtError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::game::models::GameModel;
    use crate::player::models::PlayerModel;
    use crate::session::models::SessionModel;
    use crate::tournament::models::TournamentModel;
    use crate::tournament::repository::{RosterJoinResult, RosterLeaveResult};
    use async_trait::async_trait;
    use uuid::Uuid;

    /// Dummy player repository that does nothing - for tests that don't care about players
    pub struct DummyPlayerRepository;

    #[async_trait]
    impl PlayerRepository for DummyPlayerRepository {
        async fn create_player(&self, _player: &PlayerModel) -> Result<(), AppError> {
            Ok(())
        }
        async fn get_player(&self, _player_id: Uuid) -> Result<Option<PlayerModel>, AppError> {
            Ok(None)
        }
        async fn list_players(&self, _include_deleted: bool) -> Result<Vec<PlayerModel>, AppError> {
            Ok(Vec::new())
        }
        async fn update_player(&self, _player: &PlayerModel) -> Result<(), AppError> {
            Ok(())
        }
    }

    /// Dummy tournament repository that does nothing - for tests that don't care about tournaments
    pub struct DummyTournamentRepository;

    #[async_trait]
    impl TournamentRepository for DummyTournamentRepository {
        async fn create_tournament(&self, _tournament: &TournamentModel) -> Result<(), AppError> {
            Ok(())
        }
        async fn get_tournament(
            &self,
            _tournament_id: Uuid,
        ) -> Result<Option<TournamentModel>, AppError> {
            Ok(None)
        }
        async fn list_tournaments(&self) -> Result<Vec<TournamentModel>, AppError> {
            Ok(Vec::new())
        }
        async fn update_tournament(&self, _tournament: &TournamentModel) -> Result<(), AppError> {
            Ok(())
        }
        async fn try_join_roster(
            &self,
            _tournament_id: Uuid,
            _player_id: Uuid,
        ) -> Result<RosterJoinResult, AppError> {
            Ok(RosterJoinResult::TournamentNotFound)
        }
        async fn try_leave_roster(
            &self,
            _tournament_id: Uuid,
            _player_id: Uuid,
        ) -> Result<RosterLeaveResult, AppError> {
            Ok(RosterLeaveResult::TournamentNotFound)
        }
    }

    /// Dummy game repository that does nothing - for tests that don't care about games
    pub struct DummyGameRepository;

    #[async_trait]
    impl GameRepository for DummyGameRepository {
        async fn create_game(&self, _game: &GameModel) -> Result<(), AppError> {
            Ok(())
        }
        async fn get_game(&self, _game_id: Uuid) -> Result<Option<GameModel>, AppError> {
            Ok(None)
        }
        async fn list_games(&self) -> Result<Vec<GameModel>, AppError> {
            Ok(Vec::new())
        }
        async fn list_games_for_tournament(
            &self,
            _tournament_id: Uuid,
        ) -> Result<Vec<GameModel>, AppError> {
            Ok(Vec::new())
        }
        async fn list_games_for_year(&self, _year: i32) -> Result<Vec<GameModel>, AppError> {
            Ok(Vec::new())
        }
        async fn delete_game(&self, _game_id: Uuid) -> Result<(), AppError> {
            Ok(())
        }
    }

    /// Dummy session repository that does nothing - for tests that don't care about sessions
    pub struct DummySessionRepository;

    #[async_trait]
    impl SessionRepository for DummySessionRepository {
        async fn create_session(&self, _session: &SessionModel) -> Result<(), AppError> {
            Ok(())
        }
        async fn get_session(&self, _session_id: &str) -> Result<Option<SessionModel>, AppError> {
            Ok(None)
        }
        async fn delete_session(&self, _session_id: &str) -> Result<(), AppError> {
            Ok(())
        }
        async fn cleanup_expired_sessions(&self) -> Result<u64, AppError> {
            Ok(0)
        }
    }

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        player_repository: Option<Arc<dyn PlayerRepository + Send + Sync>>,
        tournament_repository: Option<Arc<dyn TournamentRepository + Send + Sync>>,
        game_repository: Option<Arc<dyn GameRepository + Send + Sync>>,
        session_repository: Option<Arc<dyn SessionRepository + Send + Sync>>,
        config: Option<AppConfig>,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                player_repository: None,
                tournament_repository: None,
                game_repository: None,
                session_repository: None,
                config: None,
            }
        }

        pub fn with_player_repository(
            mut self,
            repo: Arc<dyn PlayerRepository + Send + Sync>,
        ) -> Self {
            self.player_repository = Some(repo);
            self
        }

        pub fn with_tournament_repository(
            mut self,
            repo: Arc<dyn TournamentRepository + Send + Sync>,
        ) -> Self {
            self.tournament_repository = Some(repo);
            self
        }

        pub fn with_game_repository(mut self, repo: Arc<dyn GameRepository + Send + Sync>) -> Self {
            self.game_repository = Some(repo);
            self
        }

        pub fn with_session_repository(
            mut self,
            repo: Arc<dyn SessionRepository + Send + Sync>,
        ) -> Self {
            self.session_repository = Some(repo);
            self
        }

        pub fn with_config(mut self, config: AppConfig) -> Self {
            self.config = Some(config);
            self
        }

        pub fn build(self) -> AppState {
            AppState {
                player_repository: self
                    .player_repository
                    .unwrap_or_else(|| Arc::new(DummyPlayerRepository)),
                tournament_repository: self
                    .tournament_repository
                    .unwrap_or_else(|| Arc::new(DummyTournamentRepository)),
                game_repository: self
                    .game_repository
                    .unwrap_or_else(|| Arc::new(DummyGameRepository)),
                session_repository: self
                    .session_repository
                    .unwrap_or_else(|| Arc::new(DummySessionRepository)),
                config: self.config.unwrap_or_default(),
            }
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
