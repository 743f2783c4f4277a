use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::models::{TournamentModel, TournamentStatus};
use crate::shared::AppError;

/// Result of attempting to register a player in a roster
#[derive(Debug, Clone)]
pub enum RosterJoinResult {
    /// Player was added, returns updated tournament data
    Success(TournamentModel),
    /// Player is already registered for this tournament
    AlreadyJoined,
    /// The tournament no longer accepts registrations
    RegistrationClosed(TournamentStatus),
    /// Tournament does not exist
    TournamentNotFound,
}

/// Result of attempting to remove a player from a roster
#[derive(Debug, Clone)]
pub enum RosterLeaveResult {
    /// Player was removed, returns updated tournament data
    Success(TournamentModel),
    /// Player was not registered for this tournament
    PlayerNotInRoster,
    /// The roster is locked because the tournament left the draft stage
    RosterLocked(TournamentStatus),
    /// Tournament does not exist
    TournamentNotFound,
}

/// Trait for tournament repository operations
#[async_trait]
pub trait TournamentRepository {
    async fn create_tournament(&self, tournament: &TournamentModel) -> Result<(), AppError>;
    async fn get_tournament(&self, tournament_id: Uuid)
        -> Result<Option<TournamentModel>, AppError>;
    async fn list_tournaments(&self) -> Result<Vec<TournamentModel>, AppError>;
    async fn update_tournament(&self, tournament: &TournamentModel) -> Result<(), AppError>;

    /// Atomically attempts to add a player to the roster, checking that the
    /// tournament still accepts registrations. This prevents race conditions
    /// when several scorekeepers edit the same roster.
    async fn try_join_roster(
        &self,
        tournament_id: Uuid,
        player_id: Uuid,
    ) -> Result<RosterJoinResult, AppError>;

    /// Atomically attempts to remove a player from a draft roster
    async fn try_leave_roster(
        &self,
        tournament_id: Uuid,
        player_id: Uuid,
    ) -> Result<RosterLeaveResult, AppError>;
}

/// In-memory implementation of TournamentRepository for development and testing
pub struct InMemoryTournamentRepository {
    tournaments: Mutex<HashMap<Uuid, TournamentModel>>,
}

impl Default for InMemoryTournamentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTournamentRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            tournaments: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated tournaments
    pub fn with_tournaments(tournaments: Vec<TournamentModel>) -> Self {
        let mut tournament_map = HashMap::new();
        for tournament in tournaments {
            tournament_map.insert(tournament.id, tournament);
        }

        Self {
            tournaments: Mutex::new(tournament_map),
        }
    }
}

#[async_trait]
impl TournamentRepository for InMemoryTournamentRepository {
    #[instrument(skip(self, tournament))]
    async fn create_tournament(&self, tournament: &TournamentModel) -> Result<(), AppError> {
        debug!(tournament_id = %tournament.id, name = %tournament.name, "Creating tournament in memory");

        let mut tournaments = self.tournaments.lock().unwrap();
        if tournaments.contains_key(&tournament.id) {
            warn!(tournament_id = %tournament.id, "Tournament already exists in memory");
            return Err(AppError::DatabaseError(
                "Tournament already exists".to_string(),
            ));
        }
        tournaments.insert(tournament.id, tournament.clone());

        debug!(tournament_id = %tournament.id, "Tournament created successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_tournament(
        &self,
        tournament_id: Uuid,
    ) -> Result<Option<TournamentModel>, AppError> {
        debug!(tournament_id = %tournament_id, "Fetching tournament from memory");

        let tournaments = self.tournaments.lock().unwrap();
        Ok(tournaments.get(&tournament_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_tournaments(&self) -> Result<Vec<TournamentModel>, AppError> {
        debug!("Listing all tournaments in memory");

        let tournaments = self.tournaments.lock().unwrap();
        Ok(tournaments.values().cloned().collect())
    }

    #[instrument(skip(self, tournament))]
    async fn update_tournament(&self, tournament: &TournamentModel) -> Result<(), AppError> {
        debug!(tournament_id = %tournament.id, "Updating tournament in memory");

        let mut tournaments = self.tournaments.lock().unwrap();
        if !tournaments.contains_key(&tournament.id) {
            warn!(tournament_id = %tournament.id, "Tournament not found for update in memory");
            return Err(AppError::NotFound("Tournament not found".to_string()));
        }
        tournaments.insert(tournament.id, tournament.clone());

        debug!(tournament_id = %tournament.id, "Tournament updated successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn try_join_roster(
        &self,
        tournament_id: Uuid,
        player_id: Uuid,
    ) -> Result<RosterJoinResult, AppError> {
        debug!(tournament_id = %tournament_id, player_id = %player_id, "Attempting to join roster atomically");

        let mut tournaments = self.tournaments.lock().unwrap();

        let tournament = match tournaments.get_mut(&tournament_id) {
            Some(tournament) => tournament,
            None => {
                debug!(tournament_id = %tournament_id, "Tournament not found");
                return Ok(RosterJoinResult::TournamentNotFound);
            }
        };

        if !tournament.registration_open() {
            debug!(
                tournament_id = %tournament_id,
                status = %tournament.status,
                "Tournament no longer accepts registrations"
            );
            return Ok(RosterJoinResult::RegistrationClosed(tournament.status));
        }

        if tournament.has_player(player_id) {
            debug!(tournament_id = %tournament_id, player_id = %player_id, "Player already in roster");
            return Ok(RosterJoinResult::AlreadyJoined);
        }

        tournament.add_player(player_id);
        let updated_tournament = tournament.clone();

        info!(
            tournament_id = %tournament_id,
            player_id = %player_id,
            new_player_count = updated_tournament.get_player_count(),
            "Player joined roster successfully (atomic)"
        );

        Ok(RosterJoinResult::Success(updated_tournament))
    }

    #[instrument(skip(self))]
    async fn try_leave_roster(
        &self,
        tournament_id: Uuid,
        player_id: Uuid,
    ) -> Result<RosterLeaveResult, AppError> {
        debug!(tournament_id = %tournament_id, player_id = %player_id, "Attempting to leave roster atomically");

        let mut tournaments = self.tournaments.lock().unwrap();

        let tournament = match tournaments.get_mut(&tournament_id) {
            Some(tournament) => tournament,
            None => {
                debug!(tournament_id = %tournament_id, "Tournament not found");
                return Ok(RosterLeaveResult::TournamentNotFound);
            }
        };

        if tournament.roster_locked() {
            debug!(
                tournament_id = %tournament_id,
                status = %tournament.status,
                "Roster is locked"
            );
            return Ok(RosterLeaveResult::RosterLocked(tournament.status));
        }

        if !tournament.has_player(player_id) {
            debug!(tournament_id = %tournament_id, player_id = %player_id, "Player not in roster");
            return Ok(RosterLeaveResult::PlayerNotInRoster);
        }

        tournament.remove_player(player_id);
        let updated_tournament = tournament.clone();

        info!(
            tournament_id = %tournament_id,
            player_id = %player_id,
            new_player_count = updated_tournament.get_player_count(),
            "Player left roster successfully (atomic)"
        );

        Ok(RosterLeaveResult::Success(updated_tournament))
    }
}

/// PostgreSQL implementation of tournament repository
pub struct PostgresTournamentRepository {
    pool: PgPool,
}

impl PostgresTournamentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_tournament(row: &PgRow) -> Result<TournamentModel, AppError> {
    let status: String = row.get("status");
    let status = status.parse::<TournamentStatus>().map_err(|e| {
        AppError::DatabaseError(format!("Invalid tournament status in database: {}", e))
    })?;

    Ok(TournamentModel {
        id: row.get("id"),
        slug: row.get("slug"),
        name: row.get("name"),
        status,
        player_ids: row.get("player_ids"),
        created_at: row.get("created_at"),
    })
}

#[async_trait]
impl TournamentRepository for PostgresTournamentRepository {
    #[instrument(skip(self, tournament))]
    async fn create_tournament(&self, tournament: &TournamentModel) -> Result<(), AppError> {
        debug!(tournament_id = %tournament.id, name = %tournament.name, "Creating tournament in database");

        sqlx::query(
            "INSERT INTO tournaments (id, slug, name, status, player_ids, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(tournament.id)
        .bind(&tournament.slug)
        .bind(&tournament.name)
        .bind(tournament.status.to_string())
        .bind(&tournament.player_ids)
        .bind(tournament.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create tournament in database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(tournament_id = %tournament.id, "Tournament created successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_tournament(
        &self,
        tournament_id: Uuid,
    ) -> Result<Option<TournamentModel>, AppError> {
        debug!(tournament_id = %tournament_id, "Fetching tournament from database");

        let row = sqlx::query(
            "SELECT id, slug, name, status, player_ids, created_at FROM tournaments WHERE id = $1",
        )
        .bind(tournament_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, tournament_id = %tournament_id, "Failed to fetch tournament from database");
            AppError::DatabaseError(e.to_string())
        })?;

        row.map(|row| row_to_tournament(&row)).transpose()
    }

    #[instrument(skip(self))]
    async fn list_tournaments(&self) -> Result<Vec<TournamentModel>, AppError> {
        debug!("Listing all tournaments from database");

        let rows = sqlx::query(
            "SELECT id, slug, name, status, player_ids, created_at FROM tournaments",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list tournaments from database");
            AppError::DatabaseError(e.to_string())
        })?;

        rows.iter().map(row_to_tournament).collect()
    }

    #[instrument(skip(self, tournament))]
    async fn update_tournament(&self, tournament: &TournamentModel) -> Result<(), AppError> {
        debug!(tournament_id = %tournament.id, "Updating tournament in database");

        let result = sqlx::query(
            "UPDATE tournaments SET slug = $2, name = $3, status = $4, player_ids = $5 WHERE id = $1",
        )
        .bind(tournament.id)
        .bind(&tournament.slug)
        .bind(&tournament.name)
        .bind(tournament.status.to_string())
        .bind(&tournament.player_ids)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, tournament_id = %tournament.id, "Failed to update tournament in database");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            warn!(tournament_id = %tournament.id, "Tournament not found for update");
            return Err(AppError::NotFound("Tournament not found".to_string()));
        }

        debug!(tournament_id = %tournament.id, "Tournament updated successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn try_join_roster(
        &self,
        tournament_id: Uuid,
        player_id: Uuid,
    ) -> Result<RosterJoinResult, AppError> {
        debug!(tournament_id = %tournament_id, player_id = %player_id, "Attempting to join roster atomically");

        // The guarded UPDATE is the atomic step; the follow-up SELECT only
        // classifies why nothing changed.
        let row = sqlx::query(
            "UPDATE tournaments SET player_ids = array_append(player_ids, $2) \
             WHERE id = $1 AND status IN ('DRAFT', 'ACTIVE') AND NOT ($2 = ANY(player_ids)) \
             RETURNING id, slug, name, status, player_ids, created_at",
        )
        .bind(tournament_id)
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, tournament_id = %tournament_id, "Failed to join roster in database");
            AppError::DatabaseError(e.to_string())
        })?;

        if let Some(row) = row {
            let updated_tournament = row_to_tournament(&row)?;
            info!(
                tournament_id = %tournament_id,
                player_id = %player_id,
                new_player_count = updated_tournament.get_player_count(),
                "Player joined roster successfully (atomic)"
            );
            return Ok(RosterJoinResult::Success(updated_tournament));
        }

        match self.get_tournament(tournament_id).await? {
            None => Ok(RosterJoinResult::TournamentNotFound),
            Some(tournament) if tournament.has_player(player_id) => {
                Ok(RosterJoinResult::AlreadyJoined)
            }
            Some(tournament) => Ok(RosterJoinResult::RegistrationClosed(tournament.status)),
        }
    }

    #[instrument(skip(self))]
    async fn try_leave_roster(
        &self,
        tournament_id: Uuid,
        player_id: Uuid,
    ) -> Result<RosterLeaveResult, AppError> {
        debug!(tournament_id = %tournament_id, player_id = %player_id, "Attempting to leave roster atomically");

        let row = sqlx::query(
            "UPDATE tournaments SET player_ids = array_remove(player_ids, $2) \
             WHERE id = $1 AND status = 'DRAFT' AND $2 = ANY(player_ids) \
             RETURNING id, slug, name, status, player_ids, created_at",
        )
        .bind(tournament_id)
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, tournament_id = %tournament_id, "Failed to leave roster in database");
            AppError::DatabaseError(e.to_string())
        })?;

        if let Some(row) = row {
            let updated_tournament = row_to_tournament(&row)?;
            info!(
                tournament_id = %tournament_id,
                player_id = %player_id,
                new_player_count = updated_tournament.get_player_count(),
                "Player left roster successfully (atomic)"
            );
            return Ok(RosterLeaveResult::Success(updated_tournament));
        }

        match self.get_tournament(tournament_id).await? {
            None => Ok(RosterLeaveResult::TournamentNotFound),
            Some(tournament) if tournament.roster_locked() => {
                Ok(RosterLeaveResult::RosterLocked(tournament.status))
            }
            Some(_) => Ok(RosterLeaveResult::PlayerNotInRoster),
        }
    }
}
