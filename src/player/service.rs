use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{
    models::PlayerModel,
    repository::PlayerRepository,
    types::{PlayerCreateRequest, PlayerResponse, PlayerUpdateRequest},
};
use crate::shared::AppError;

/// Service for handling player registry business logic
pub struct PlayerService {
    repository: Arc<dyn PlayerRepository + Send + Sync>,
}

fn to_response(player: PlayerModel) -> PlayerResponse {
    PlayerResponse {
        id: player.id,
        display_name: player.display_name,
        created_at: player.created_at,
        deleted: player.deleted_at.is_some(),
    }
}

fn validate_display_name(display_name: &str) -> Result<String, AppError> {
    let trimmed = display_name.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(
            "Display name must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

impl PlayerService {
    pub fn new(repository: Arc<dyn PlayerRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Registers a new player with a generated ID
    #[instrument(skip(self))]
    pub async fn create_player(
        &self,
        request: PlayerCreateRequest,
    ) -> Result<PlayerResponse, AppError> {
        let display_name = validate_display_name(&request.display_name)?;

        let player_model = PlayerModel::new(display_name);
        debug!(player_id = %player_model.id, "Generated player ID");

        self.repository.create_player(&player_model).await?;

        info!(
            player_id = %player_model.id,
            display_name = %player_model.display_name,
            "Player registered successfully"
        );

        Ok(to_response(player_model))
    }

    /// Gets player details, including players removed from the registry
    #[instrument(skip(self))]
    pub async fn get_player(&self, player_id: Uuid) -> Result<PlayerResponse, AppError> {
        let player = self
            .repository
            .get_player(player_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Player not found".to_string()))?;

        Ok(to_response(player))
    }

    /// Lists players sorted by display name for stable output
    #[instrument(skip(self))]
    pub async fn list_players(
        &self,
        include_deleted: bool,
    ) -> Result<Vec<PlayerResponse>, AppError> {
        debug!(include_deleted, "Listing players");

        let mut players = self.repository.list_players(include_deleted).await?;
        players.sort_by(|a, b| a.display_name.cmp(&b.display_name).then(a.id.cmp(&b.id)));

        info!(player_count = players.len(), "Players retrieved successfully");

        Ok(players.into_iter().map(to_response).collect())
    }

    /// Renames a player
    #[instrument(skip(self))]
    pub async fn update_player(
        &self,
        player_id: Uuid,
        request: PlayerUpdateRequest,
    ) -> Result<PlayerResponse, AppError> {
        let display_name = validate_display_name(&request.display_name)?;

        let mut player = self
            .repository
            .get_player(player_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Player not found".to_string()))?;

        player.display_name = display_name;
        self.repository.update_player(&player).await?;

        info!(
            player_id = %player.id,
            display_name = %player.display_name,
            "Player renamed successfully"
        );

        Ok(to_response(player))
    }

    /// Removes a player from the registry without discarding recorded scores
    ///
    /// Deleting an already removed player is a no-op so retries stay safe.
    #[instrument(skip(self))]
    pub async fn delete_player(&self, player_id: Uuid) -> Result<(), AppError> {
        let mut player = self
            .repository
            .get_player(player_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Player not found".to_string()))?;

        if player.is_deleted() {
            debug!(player_id = %player_id, "Player already removed from registry");
            return Ok(());
        }

        player.mark_deleted();
        self.repository.update_player(&player).await?;

        info!(player_id = %player_id, "Player removed from registry");
        Ok(())
    }
}
