use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::PlayerModel;
use crate::shared::AppError;

/// Trait for player repository operations
#[async_trait]
pub trait PlayerRepository {
    async fn create_player(&self, player: &PlayerModel) -> Result<(), AppError>;
    async fn get_player(&self, player_id: Uuid) -> Result<Option<PlayerModel>, AppError>;
    async fn list_players(&self, include_deleted: bool) -> Result<Vec<PlayerModel>, AppError>;
    async fn update_player(&self, player: &PlayerModel) -> Result<(), AppError>;
}

/// In-memory implementation of PlayerRepository for development and testing
///
/// This provides a realistic implementation that can be used in development
/// without requiring a real database connection. Data is stored in memory
/// and will be lost when the application restarts.
pub struct InMemoryPlayerRepository {
    players: Mutex<HashMap<Uuid, PlayerModel>>,
}

impl Default for InMemoryPlayerRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPlayerRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            players: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated players
    pub fn with_players(players: Vec<PlayerModel>) -> Self {
        let mut player_map = HashMap::new();
        for player in players {
            player_map.insert(player.id, player);
        }

        Self {
            players: Mutex::new(player_map),
        }
    }

    /// Returns the current number of players in the repository
    pub fn player_count(&self) -> usize {
        self.players.lock().unwrap().len()
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    #[instrument(skip(self, player))]
    async fn create_player(&self, player: &PlayerModel) -> Result<(), AppError> {
        debug!(player_id = %player.id, display_name = %player.display_name, "Creating player in memory");

        let mut players = self.players.lock().unwrap();
        if players.contains_key(&player.id) {
            warn!(player_id = %player.id, "Player already exists in memory");
            return Err(AppError::DatabaseError("Player already exists".to_string()));
        }
        players.insert(player.id, player.clone());

        debug!(player_id = %player.id, "Player created successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_player(&self, player_id: Uuid) -> Result<Option<PlayerModel>, AppError> {
        debug!(player_id = %player_id, "Fetching player from memory");

        let players = self.players.lock().unwrap();
        let player = players.get(&player_id).cloned();

        match &player {
            Some(p) => {
                debug!(player_id = %player_id, display_name = %p.display_name, "Player found in memory")
            }
            None => debug!(player_id = %player_id, "Player not found in memory"),
        }

        Ok(player)
    }

    #[instrument(skip(self))]
    async fn list_players(&self, include_deleted: bool) -> Result<Vec<PlayerModel>, AppError> {
        debug!(include_deleted, "Listing players in memory");

        let players = self.players.lock().unwrap();
        let player_list = players
            .values()
            .filter(|p| include_deleted || !p.is_deleted())
            .cloned()
            .collect();

        Ok(player_list)
    }

    #[instrument(skip(self, player))]
    async fn update_player(&self, player: &PlayerModel) -> Result<(), AppError> {
        debug!(player_id = %player.id, "Updating player in memory");

        let mut players = self.players.lock().unwrap();
        if !players.contains_key(&player.id) {
            warn!(player_id = %player.id, "Player not found for update in memory");
            return Err(AppError::NotFound("Player not found".to_string()));
        }
        players.insert(player.id, player.clone());

        debug!(player_id = %player.id, "Player updated successfully in memory");
        Ok(())
    }
}

/// PostgreSQL implementation of player repository
pub struct PostgresPlayerRepository {
    pool: PgPool,
}

impl PostgresPlayerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerRepository for PostgresPlayerRepository {
    #[instrument(skip(self, player))]
    async fn create_player(&self, player: &PlayerModel) -> Result<(), AppError> {
        debug!(player_id = %player.id, display_name = %player.display_name, "Creating player in database");

        sqlx::query(
            "INSERT INTO players (id, display_name, created_at, deleted_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(player.id)
        .bind(&player.display_name)
        .bind(player.created_at)
        .bind(player.deleted_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create player in database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(player_id = %player.id, "Player created successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_player(&self, player_id: Uuid) -> Result<Option<PlayerModel>, AppError> {
        debug!(player_id = %player_id, "Fetching player from database");

        let row = sqlx::query(
            "SELECT id, display_name, created_at, deleted_at FROM players WHERE id = $1",
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, player_id = %player_id, "Failed to fetch player from database");
            AppError::DatabaseError(e.to_string())
        })?;

        let player = row.map(|row| PlayerModel {
            id: row.get("id"),
            display_name: row.get("display_name"),
            created_at: row.get("created_at"),
            deleted_at: row.get("deleted_at"),
        });

        Ok(player)
    }

    #[instrument(skip(self))]
    async fn list_players(&self, include_deleted: bool) -> Result<Vec<PlayerModel>, AppError> {
        debug!(include_deleted, "Listing players from database");

        let query = if include_deleted {
            "SELECT id, display_name, created_at, deleted_at FROM players"
        } else {
            "SELECT id, display_name, created_at, deleted_at FROM players WHERE deleted_at IS NULL"
        };

        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to list players from database");
                AppError::DatabaseError(e.to_string())
            })?;

        let players = rows
            .into_iter()
            .map(|row| PlayerModel {
                id: row.get("id"),
                display_name: row.get("display_name"),
                created_at: row.get("created_at"),
                deleted_at: row.get("deleted_at"),
            })
            .collect();

        Ok(players)
    }

    #[instrument(skip(self, player))]
    async fn update_player(&self, player: &PlayerModel) -> Result<(), AppError> {
        debug!(player_id = %player.id, "Updating player in database");

        let result =
            sqlx::query("UPDATE players SET display_name = $2, deleted_at = $3 WHERE id = $1")
                .bind(player.id)
                .bind(&player.display_name)
                .bind(player.deleted_at)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    warn!(error = %e, player_id = %player.id, "Failed to update player in database");
                    AppError::DatabaseError(e.to_string())
                })?;

        if result.rows_affected() == 0 {
            warn!(player_id = %player.id, "Player not found for update");
            return Err(AppError::NotFound("Player not found".to_string()));
        }

        debug!(player_id = %player.id, "Player updated successfully in database");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test helper functions for creating test data
    mod helpers {
        use super::*;

        /// Creates a valid player for testing
        pub fn create_test_player(display_name: &str) -> PlayerModel {
            PlayerModel::new(display_name.to_string())
        }

        /// Creates a player that was removed from the registry
        pub fn create_deleted_player(display_name: &str) -> PlayerModel {
            let mut player = PlayerModel::new(display_name.to_string());
            player.mark_deleted();
            player
        }
    }

    use helpers::*;

    #[tokio::test]
    async fn test_create_and_get_player() {
        let repo = InMemoryPlayerRepository::new();
        let player = create_test_player("ada");

        repo.create_player(&player).await.unwrap();

        let retrieved = repo.get_player(player.id).await.unwrap();
        assert!(retrieved.is_some());
        let retrieved_player = retrieved.unwrap();
        assert_eq!(retrieved_player.id, player.id);
        assert_eq!(retrieved_player.display_name, "ada");
        assert!(!retrieved_player.is_deleted());
    }

    #[tokio::test]
    async fn test_get_nonexistent_player() {
        let repo = InMemoryPlayerRepository::new();

        let result = repo.get_player(Uuid::new_v4()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_player() {
        let repo = InMemoryPlayerRepository::new();
        let player = create_test_player("ada");

        repo.create_player(&player).await.unwrap();

        let result = repo.create_player(&player).await;
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), AppError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_update_player() {
        let repo = InMemoryPlayerRepository::new();
        let mut player = create_test_player("ada");

        repo.create_player(&player).await.unwrap();

        player.display_name = "ada lovelace".to_string();
        repo.update_player(&player).await.unwrap();

        let retrieved = repo.get_player(player.id).await.unwrap().unwrap();
        assert_eq!(retrieved.display_name, "ada lovelace");
    }

    #[tokio::test]
    async fn test_update_nonexistent_player() {
        let repo = InMemoryPlayerRepository::new();
        let player = create_test_player("ada");

        let result = repo.update_player(&player).await;
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_players_hides_deleted_by_default() {
        let repo = InMemoryPlayerRepository::with_players(vec![
            create_test_player("ada"),
            create_test_player("grace"),
            create_deleted_player("charles"),
        ]);

        let active = repo.list_players(false).await.unwrap();
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|p| !p.is_deleted()));

        let all = repo.list_players(true).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_soft_delete_keeps_player_retrievable() {
        let repo = InMemoryPlayerRepository::new();
        let mut player = create_test_player("ada");

        repo.create_player(&player).await.unwrap();

        player.mark_deleted();
        repo.update_player(&player).await.unwrap();

        // Direct lookup still works after removal from the registry
        let retrieved = repo.get_player(player.id).await.unwrap();
        assert!(retrieved.is_some());
        assert!(retrieved.unwrap().is_deleted());
    }

    #[tokio::test]
    async fn test_with_players_preloads_repository() {
        let players = vec![create_test_player("ada"), create_test_player("grace")];
        let repo = InMemoryPlayerRepository::with_players(players.clone());

        assert_eq!(repo.player_count(), 2);
        for player in &players {
            assert!(repo.get_player(player.id).await.unwrap().is_some());
        }
    }
}
