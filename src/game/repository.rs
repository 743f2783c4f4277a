use async_trait::async_trait;
use chrono::Datelike;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::{GameModel, ScoreEventModel};
use crate::scoring::MarkKind;
use crate::shared::AppError;

/// Trait for game repository operations
#[async_trait]
pub trait GameRepository {
    async fn create_game(&self, game: &GameModel) -> Result<(), AppError>;
    async fn get_game(&self, game_id: Uuid) -> Result<Option<GameModel>, AppError>;
    async fn list_games(&self) -> Result<Vec<GameModel>, AppError>;
    async fn list_games_for_tournament(
        &self,
        tournament_id: Uuid,
    ) -> Result<Vec<GameModel>, AppError>;
    /// Lists games played in the given calendar year (UTC)
    async fn list_games_for_year(&self, year: i32) -> Result<Vec<GameModel>, AppError>;
    async fn delete_game(&self, game_id: Uuid) -> Result<(), AppError>;
}

/// In-memory implementation of GameRepository for development and testing
pub struct InMemoryGameRepository {
    games: Mutex<HashMap<Uuid, GameModel>>,
}

impl Default for InMemoryGameRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGameRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            games: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated games
    pub fn with_games(games: Vec<GameModel>) -> Self {
        let mut game_map = HashMap::new();
        for game in games {
            game_map.insert(game.id, game);
        }

        Self {
            games: Mutex::new(game_map),
        }
    }

    /// Returns the current number of games in the repository
    pub fn game_count(&self) -> usize {
        self.games.lock().unwrap().len()
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    #[instrument(skip(self, game))]
    async fn create_game(&self, game: &GameModel) -> Result<(), AppError> {
        debug!(game_id = %game.id, event_count = game.events.len(), "Recording game in memory");

        let mut games = self.games.lock().unwrap();
        if games.contains_key(&game.id) {
            warn!(game_id = %game.id, "Game already exists in memory");
            return Err(AppError::DatabaseError("Game already exists".to_string()));
        }
        games.insert(game.id, game.clone());

        debug!(game_id = %game.id, "Game recorded successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_game(&self, game_id: Uuid) -> Result<Option<GameModel>, AppError> {
        debug!(game_id = %game_id, "Fetching game from memory");

        let games = self.games.lock().unwrap();
        Ok(games.get(&game_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_games(&self) -> Result<Vec<GameModel>, AppError> {
        debug!("Listing all games in memory");

        let games = self.games.lock().unwrap();
        Ok(games.values().cloned().collect())
    }

    #[instrument(skip(self))]
    async fn list_games_for_tournament(
        &self,
        tournament_id: Uuid,
    ) -> Result<Vec<GameModel>, AppError> {
        debug!(tournament_id = %tournament_id, "Listing games for tournament in memory");

        let games = self.games.lock().unwrap();
        let games_for_tournament = games
            .values()
            .filter(|g| g.tournament_id == Some(tournament_id))
            .cloned()
            .collect();

        Ok(games_for_tournament)
    }

    #[instrument(skip(self))]
    async fn list_games_for_year(&self, year: i32) -> Result<Vec<GameModel>, AppError> {
        debug!(year, "Listing games for year in memory");

        let games = self.games.lock().unwrap();
        let games_for_year = games
            .values()
            .filter(|g| g.played_at.year() == year)
            .cloned()
            .collect();

        Ok(games_for_year)
    }

    #[instrument(skip(self))]
    async fn delete_game(&self, game_id: Uuid) -> Result<(), AppError> {
        debug!(game_id = %game_id, "Deleting game from memory");

        let mut games = self.games.lock().unwrap();
        if games.remove(&game_id).is_none() {
            warn!(game_id = %game_id, "Game not found for deletion in memory");
            return Err(AppError::NotFound("Game not found".to_string()));
        }

        debug!(game_id = %game_id, "Game deleted successfully from memory");
        Ok(())
    }
}

/// PostgreSQL implementation of game repository
///
/// Events live in a separate score_events table keyed by game, with a
/// position column preserving recording order.
pub struct PostgresGameRepository {
    pool: PgPool,
}

impl PostgresGameRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_events(&self, game_id: Uuid) -> Result<Vec<ScoreEventModel>, AppError> {
        let rows = sqlx::query(
            "SELECT player_id, kind FROM score_events WHERE game_id = $1 ORDER BY position",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, game_id = %game_id, "Failed to fetch score events from database");
            AppError::DatabaseError(e.to_string())
        })?;

        rows.into_iter()
            .map(|row| {
                let kind: String = row.get("kind");
                let kind = MarkKind::try_from(kind.as_str()).map_err(|e| {
                    AppError::DatabaseError(format!("Invalid score event in database: {}", e))
                })?;
                Ok(ScoreEventModel {
                    player_id: row.get("player_id"),
                    kind,
                })
            })
            .collect()
    }

    async fn load_games(&self, rows: Vec<PgRow>) -> Result<Vec<GameModel>, AppError> {
        let mut games = Vec::with_capacity(rows.len());
        for row in rows {
            let game_id: Uuid = row.get("id");
            games.push(GameModel {
                id: game_id,
                tournament_id: row.get("tournament_id"),
                played_at: row.get("played_at"),
                created_at: row.get("created_at"),
                events: self.load_events(game_id).await?,
            });
        }
        Ok(games)
    }
}

#[async_trait]
impl GameRepository for PostgresGameRepository {
    #[instrument(skip(self, game))]
    async fn create_game(&self, game: &GameModel) -> Result<(), AppError> {
        debug!(game_id = %game.id, event_count = game.events.len(), "Recording game in database");

        let mut tx = self.pool.begin().await.map_err(|e| {
            warn!(error = %e, "Failed to start transaction");
            AppError::DatabaseError(e.to_string())
        })?;

        sqlx::query(
            "INSERT INTO games (id, tournament_id, played_at, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(game.id)
        .bind(game.tournament_id)
        .bind(game.played_at)
        .bind(game.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to record game in database");
            AppError::DatabaseError(e.to_string())
        })?;

        for (position, event) in game.events.iter().enumerate() {
            sqlx::query(
                "INSERT INTO score_events (game_id, position, player_id, kind) VALUES ($1, $2, $3, $4)",
            )
            .bind(game.id)
            .bind(position as i32)
            .bind(event.player_id)
            .bind(event.kind.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to record score event in database");
                AppError::DatabaseError(e.to_string())
            })?;
        }

        tx.commit().await.map_err(|e| {
            warn!(error = %e, "Failed to commit game transaction");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(game_id = %game.id, "Game recorded successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_game(&self, game_id: Uuid) -> Result<Option<GameModel>, AppError> {
        debug!(game_id = %game_id, "Fetching game from database");

        let row = sqlx::query(
            "SELECT id, tournament_id, played_at, created_at FROM games WHERE id = $1",
        )
        .bind(game_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, game_id = %game_id, "Failed to fetch game from database");
            AppError::DatabaseError(e.to_string())
        })?;

        match row {
            Some(row) => Ok(self.load_games(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn list_games(&self) -> Result<Vec<GameModel>, AppError> {
        debug!("Listing all games from database");

        let rows =
            sqlx::query("SELECT id, tournament_id, played_at, created_at FROM games")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    warn!(error = %e, "Failed to list games from database");
                    AppError::DatabaseError(e.to_string())
                })?;

        self.load_games(rows).await
    }

    #[instrument(skip(self))]
    async fn list_games_for_tournament(
        &self,
        tournament_id: Uuid,
    ) -> Result<Vec<GameModel>, AppError> {
        debug!(tournament_id = %tournament_id, "Listing games for tournament from database");

        let rows = sqlx::query(
            "SELECT id, tournament_id, played_at, created_at FROM games WHERE tournament_id = $1",
        )
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, tournament_id = %tournament_id, "Failed to list tournament games from database");
            AppError::DatabaseError(e.to_string())
        })?;

        self.load_games(rows).await
    }

    #[instrument(skip(self))]
    async fn list_games_for_year(&self, year: i32) -> Result<Vec<GameModel>, AppError> {
        debug!(year, "Listing games for year from database");

        let rows = sqlx::query(
            "SELECT id, tournament_id, played_at, created_at FROM games \
             WHERE date_part('year', played_at AT TIME ZONE 'UTC') = $1",
        )
        .bind(year as f64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, year, "Failed to list games for year from database");
            AppError::DatabaseError(e.to_string())
        })?;

        self.load_games(rows).await
    }

    #[instrument(skip(self))]
    async fn delete_game(&self, game_id: Uuid) -> Result<(), AppError> {
        debug!(game_id = %game_id, "Deleting game from database");

        // score_events rows go with the game via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(game_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, game_id = %game_id, "Failed to delete game from database");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!(game_id = %game_id, "Game not found for deletion");
            return Err(AppError::NotFound("Game not found".to_string()));
        }

        debug!(game_id = %game_id, "Game deleted successfully from database");
        Ok(())
    }
}
