use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    models::GameModel,
    repository::GameRepository,
    types::{GameCreateRequest, GameListQuery, GameResponse},
};
use crate::player::repository::PlayerRepository;
use crate::shared::AppError;
use crate::tournament::models::TournamentStatus;
use crate::tournament::repository::TournamentRepository;

/// Service for handling game business logic
pub struct GameService {
    repository: Arc<dyn GameRepository + Send + Sync>,
    tournament_repository: Arc<dyn TournamentRepository + Send + Sync>,
    player_repository: Arc<dyn PlayerRepository + Send + Sync>,
    delete_grace_minutes: i64,
}

fn to_response(game: GameModel) -> GameResponse {
    GameResponse {
        id: game.id,
        tournament_id: game.tournament_id,
        played_at: game.played_at,
        created_at: game.created_at,
        event_count: game.events.len() as i32,
        events: game.events,
    }
}

impl GameService {
    pub fn new(
        repository: Arc<dyn GameRepository + Send + Sync>,
        tournament_repository: Arc<dyn TournamentRepository + Send + Sync>,
        player_repository: Arc<dyn PlayerRepository + Send + Sync>,
        delete_grace_minutes: i64,
    ) -> Self {
        Self {
            repository,
            tournament_repository,
            player_repository,
            delete_grace_minutes,
        }
    }

    /// Records a finished game together with its score events
    ///
    /// Tournament games require an active tournament and every scored player
    /// on its roster. Casual games only require the scored players to exist.
    #[instrument(skip(self, request))]
    pub async fn record_game(&self, request: GameCreateRequest) -> Result<GameResponse, AppError> {
        let played_at = request.played_at.unwrap_or_else(Utc::now);
        let game = GameModel::new(request.tournament_id, played_at, request.events);

        match game.tournament_id {
            Some(tournament_id) => {
                self.validate_tournament_game(tournament_id, &game).await?
            }
            None => self.validate_casual_game(&game).await?,
        }

        self.repository.create_game(&game).await?;

        info!(
            game_id = %game.id,
            event_count = game.events.len(),
            "Game recorded successfully"
        );

        Ok(to_response(game))
    }

    async fn validate_tournament_game(
        &self,
        tournament_id: Uuid,
        game: &GameModel,
    ) -> Result<(), AppError> {
        let tournament = self
            .tournament_repository
            .get_tournament(tournament_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))?;

        if tournament.status != TournamentStatus::Active {
            warn!(
                tournament_id = %tournament_id,
                status = %tournament.status,
                "Rejected game for inactive tournament"
            );
            return Err(AppError::Conflict(format!(
                "Games can only be recorded for {} tournaments",
                TournamentStatus::Active
            )));
        }

        for player_id in game.player_ids() {
            if !tournament.has_player(player_id) {
                warn!(
                    tournament_id = %tournament_id,
                    player_id = %player_id,
                    "Rejected game with player outside tournament roster"
                );
                return Err(AppError::Conflict(format!(
                    "Player {} is not on the tournament roster",
                    player_id
                )));
            }
        }

        Ok(())
    }

    async fn validate_casual_game(&self, game: &GameModel) -> Result<(), AppError> {
        for player_id in game.player_ids() {
            let player = self
                .player_repository
                .get_player(player_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Player {} not found", player_id))
                })?;

            if player.is_deleted() {
                return Err(AppError::Conflict(format!(
                    "Player {} has been removed from the registry",
                    player_id
                )));
            }
        }

        Ok(())
    }

    /// Gets game details as a response object for API endpoints
    #[instrument(skip(self))]
    pub async fn get_game(&self, game_id: Uuid) -> Result<GameResponse, AppError> {
        let game = self
            .repository
            .get_game(game_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Game not found".to_string()))?;

        Ok(to_response(game))
    }

    /// Lists games, optionally scoped to a tournament or a calendar year
    #[instrument(skip(self))]
    pub async fn list_games(&self, query: GameListQuery) -> Result<Vec<GameResponse>, AppError> {
        let mut games = match (query.tournament_id, query.year) {
            (Some(_), Some(_)) => {
                return Err(AppError::BadRequest(
                    "Cannot filter by tournament and year at the same time".to_string(),
                ));
            }
            (Some(tournament_id), None) => {
                self.tournament_repository
                    .get_tournament(tournament_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))?;

                self.repository
                    .list_games_for_tournament(tournament_id)
                    .await?
            }
            (None, Some(year)) => self.repository.list_games_for_year(year).await?,
            (None, None) => self.repository.list_games().await?,
        };

        games.sort_by(|a, b| b.played_at.cmp(&a.played_at).then(a.id.cmp(&b.id)));

        info!(game_count = games.len(), "Games retrieved successfully");

        Ok(games.into_iter().map(to_response).collect())
    }

    /// Deletes a recently recorded game
    ///
    /// Deletion is only allowed within the configured grace period after
    /// recording, so scorekeepers can undo a mistake without rewriting
    /// history later.
    #[instrument(skip(self))]
    pub async fn delete_game(&self, game_id: Uuid) -> Result<(), AppError> {
        let game = self
            .repository
            .get_game(game_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Game not found".to_string()))?;

        if !game.within_delete_grace(Utc::now(), self.delete_grace_minutes) {
            warn!(
                game_id = %game_id,
                created_at = %game.created_at,
                "Rejected deletion of game outside grace period"
            );
            return Err(AppError::Forbidden(format!(
                "Games can only be deleted within {} minutes of recording",
                self.delete_grace_minutes
            )));
        }

        self.repository.delete_game(game_id).await?;

        debug!(game_id = %game_id, "Game deleted successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::models::ScoreEventModel;
    use crate::game::repository::InMemoryGameRepository;
    use crate::player::models::PlayerModel;
    use crate::player::repository::InMemoryPlayerRepository;
    use crate::scoring::MarkKind;
    use crate::tournament::models::TournamentModel;
    use crate::tournament::repository::InMemoryTournamentRepository;
    use chrono::Duration;

    struct Setup {
        service: GameService,
        game_repository: Arc<InMemoryGameRepository>,
        tournament_repository: Arc<InMemoryTournamentRepository>,
        player_repository: Arc<InMemoryPlayerRepository>,
    }

    impl Setup {
        fn new() -> Self {
            let game_repository = Arc::new(InMemoryGameRepository::new());
            let tournament_repository = Arc::new(InMemoryTournamentRepository::new());
            let player_repository = Arc::new(InMemoryPlayerRepository::new());
            let service = GameService::new(
                Arc::clone(&game_repository) as Arc<dyn GameRepository + Send + Sync>,
                Arc::clone(&tournament_repository)
                    as Arc<dyn TournamentRepository + Send + Sync>,
                Arc::clone(&player_repository) as Arc<dyn PlayerRepository + Send + Sync>,
                15,
            );

            Self {
                service,
                game_repository,
                tournament_repository,
                player_repository,
            }
        }

        async fn register_player(&self, display_name: &str) -> PlayerModel {
            let player = PlayerModel::new(display_name.to_string());
            self.player_repository.create_player(&player).await.unwrap();
            player
        }

        async fn active_tournament(&self, player_ids: Vec<Uuid>) -> TournamentModel {
            let mut tournament = TournamentModel::new("Friday League".to_string());
            tournament.status = TournamentStatus::Active;
            tournament.player_ids = player_ids;
            self.tournament_repository
                .create_tournament(&tournament)
                .await
                .unwrap();
            tournament
        }
    }

    fn event(player_id: Uuid, kind: MarkKind) -> ScoreEventModel {
        ScoreEventModel { player_id, kind }
    }

    #[tokio::test]
    async fn test_record_casual_game() {
        let setup = Setup::new();
        let player = setup.register_player("Alice").await;

        let response = setup
            .service
            .record_game(GameCreateRequest {
                tournament_id: None,
                played_at: None,
                events: vec![
                    event(player.id, MarkKind::Plus),
                    event(player.id, MarkKind::Minus),
                ],
            })
            .await
            .unwrap();

        assert_eq!(response.tournament_id, None);
        assert_eq!(response.event_count, 2);
        assert_eq!(setup.game_repository.game_count(), 1);
    }

    #[tokio::test]
    async fn test_record_casual_game_with_unknown_player_fails() {
        let setup = Setup::new();

        let result = setup
            .service
            .record_game(GameCreateRequest {
                tournament_id: None,
                played_at: None,
                events: vec![event(Uuid::new_v4(), MarkKind::Plus)],
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
        assert_eq!(setup.game_repository.game_count(), 0);
    }

    #[tokio::test]
    async fn test_record_casual_game_with_deleted_player_fails() {
        let setup = Setup::new();
        let mut player = setup.register_player("Alice").await;
        player.mark_deleted();
        setup
            .player_repository
            .update_player(&player)
            .await
            .unwrap();

        let result = setup
            .service
            .record_game(GameCreateRequest {
                tournament_id: None,
                played_at: None,
                events: vec![event(player.id, MarkKind::Plus)],
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_record_game_without_events() {
        let setup = Setup::new();

        let response = setup
            .service
            .record_game(GameCreateRequest {
                tournament_id: None,
                played_at: None,
                events: vec![],
            })
            .await
            .unwrap();

        assert_eq!(response.event_count, 0);
    }

    #[tokio::test]
    async fn test_record_tournament_game() {
        let setup = Setup::new();
        let player = setup.register_player("Alice").await;
        let tournament = setup.active_tournament(vec![player.id]).await;

        let response = setup
            .service
            .record_game(GameCreateRequest {
                tournament_id: Some(tournament.id),
                played_at: None,
                events: vec![event(player.id, MarkKind::Plus)],
            })
            .await
            .unwrap();

        assert_eq!(response.tournament_id, Some(tournament.id));
    }

    #[tokio::test]
    async fn test_record_tournament_game_for_unknown_tournament_fails() {
        let setup = Setup::new();

        let result = setup
            .service
            .record_game(GameCreateRequest {
                tournament_id: Some(Uuid::new_v4()),
                played_at: None,
                events: vec![],
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_record_tournament_game_requires_active_tournament() {
        let setup = Setup::new();
        let tournament = TournamentModel::new("Draft League".to_string());
        setup
            .tournament_repository
            .create_tournament(&tournament)
            .await
            .unwrap();

        let result = setup
            .service
            .record_game(GameCreateRequest {
                tournament_id: Some(tournament.id),
                played_at: None,
                events: vec![],
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_record_tournament_game_rejects_player_outside_roster() {
        let setup = Setup::new();
        let rostered = setup.register_player("Alice").await;
        let outsider = setup.register_player("Mallory").await;
        let tournament = setup.active_tournament(vec![rostered.id]).await;

        let result = setup
            .service
            .record_game(GameCreateRequest {
                tournament_id: Some(tournament.id),
                played_at: None,
                events: vec![
                    event(rostered.id, MarkKind::Plus),
                    event(outsider.id, MarkKind::Plus),
                ],
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
        assert_eq!(setup.game_repository.game_count(), 0);
    }

    #[tokio::test]
    async fn test_get_game_not_found() {
        let setup = Setup::new();

        let result = setup.service.get_game(Uuid::new_v4()).await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_games_newest_first() {
        let setup = Setup::new();
        let now = Utc::now();

        let older = GameModel::new(None, now - Duration::hours(2), vec![]);
        let newer = GameModel::new(None, now, vec![]);
        setup.game_repository.create_game(&older).await.unwrap();
        setup.game_repository.create_game(&newer).await.unwrap();

        let games = setup
            .service
            .list_games(GameListQuery {
                tournament_id: None,
                year: None,
            })
            .await
            .unwrap();

        assert_eq!(games.len(), 2);
        assert_eq!(games[0].id, newer.id);
        assert_eq!(games[1].id, older.id);
    }

    #[tokio::test]
    async fn test_list_games_rejects_combined_filters() {
        let setup = Setup::new();

        let result = setup
            .service
            .list_games(GameListQuery {
                tournament_id: Some(Uuid::new_v4()),
                year: Some(2024),
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_list_games_for_unknown_tournament_fails() {
        let setup = Setup::new();

        let result = setup
            .service
            .list_games(GameListQuery {
                tournament_id: Some(Uuid::new_v4()),
                year: None,
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_game_within_grace_period() {
        let setup = Setup::new();
        let game = GameModel::new(None, Utc::now(), vec![]);
        setup.game_repository.create_game(&game).await.unwrap();

        setup.service.delete_game(game.id).await.unwrap();
        assert_eq!(setup.game_repository.game_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_game_outside_grace_period_fails() {
        let setup = Setup::new();
        let mut game = GameModel::new(None, Utc::now(), vec![]);
        game.created_at = Utc::now() - Duration::minutes(16);
        setup.game_repository.create_game(&game).await.unwrap();

        let result = setup.service.delete_game(game.id).await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden(_)));
        assert_eq!(setup.game_repository.game_count(), 1);
    }
}
