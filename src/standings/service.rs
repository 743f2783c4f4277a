use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::types::{StandingsRow, TournamentStandingsResponse, YearStandingsResponse};
use crate::game::models::GameModel;
use crate::game::repository::GameRepository;
use crate::player::repository::PlayerRepository;
use crate::scoring::{score_tournament, ScoreEvent};
use crate::shared::AppError;
use crate::tournament::repository::TournamentRepository;

/// Service that computes standings tables from recorded games
///
/// Standings are never stored. Every request replays the full event history
/// of its scope through the scoring engine, so a deleted game simply stops
/// counting and there is no incremental state to drift.
pub struct StandingsService {
    tournament_repository: Arc<dyn TournamentRepository + Send + Sync>,
    game_repository: Arc<dyn GameRepository + Send + Sync>,
    player_repository: Arc<dyn PlayerRepository + Send + Sync>,
}

fn collect_events(games: &[GameModel]) -> Vec<ScoreEvent> {
    games.iter().flat_map(|game| game.score_events()).collect()
}

/// Scores the roster against the events and shapes the result into sorted
/// rows. Every roster member gets a row, players outside the roster are
/// ignored even when they appear in the events.
fn build_rows(
    roster: &[Uuid],
    events: &[ScoreEvent],
    display_names: &HashMap<Uuid, String>,
) -> Vec<StandingsRow> {
    let roster_ids: Vec<String> = roster.iter().map(Uuid::to_string).collect();
    let scores = score_tournament(events, &roster_ids, None);

    let mut rows: Vec<StandingsRow> = roster
        .iter()
        .map(|player_id| {
            let score = scores
                .get(&player_id.to_string())
                .copied()
                .unwrap_or_default();
            let display_name = display_names
                .get(player_id)
                .cloned()
                .unwrap_or_else(|| player_id.to_string());

            StandingsRow {
                player_id: *player_id,
                display_name,
                plus_clusters: score.plus_clusters,
                plus_remainder: score.plus_remainder,
                minus_clusters: score.minus_clusters,
                minus_remainder: score.minus_remainder,
                net_score: score.net_score,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.net_score
            .cmp(&a.net_score)
            .then(b.plus_clusters.cmp(&a.plus_clusters))
            .then(a.minus_clusters.cmp(&b.minus_clusters))
            .then(a.display_name.cmp(&b.display_name))
            .then(a.player_id.cmp(&b.player_id))
    });

    rows
}

impl StandingsService {
    pub fn new(
        tournament_repository: Arc<dyn TournamentRepository + Send + Sync>,
        game_repository: Arc<dyn GameRepository + Send + Sync>,
        player_repository: Arc<dyn PlayerRepository + Send + Sync>,
    ) -> Self {
        Self {
            tournament_repository,
            game_repository,
            player_repository,
        }
    }

    async fn display_names(&self) -> Result<HashMap<Uuid, String>, AppError> {
        let players = self.player_repository.list_players(true).await?;
        Ok(players
            .into_iter()
            .map(|player| (player.id, player.display_name))
            .collect())
    }

    /// Computes the standings of a tournament from all of its games
    ///
    /// The roster is the authoritative row set: every registered player gets
    /// a row even without a single event.
    #[instrument(skip(self))]
    pub async fn tournament_standings(
        &self,
        tournament_id: Uuid,
    ) -> Result<TournamentStandingsResponse, AppError> {
        let tournament = self
            .tournament_repository
            .get_tournament(tournament_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))?;

        let games = self
            .game_repository
            .list_games_for_tournament(tournament_id)
            .await?;
        let events = collect_events(&games);
        let display_names = self.display_names().await?;

        let standings = build_rows(&tournament.player_ids, &events, &display_names);

        info!(
            tournament_id = %tournament_id,
            game_count = games.len(),
            event_count = events.len(),
            row_count = standings.len(),
            "Tournament standings computed"
        );

        Ok(TournamentStandingsResponse {
            tournament_id: tournament.id,
            slug: tournament.slug,
            name: tournament.name,
            status: tournament.status,
            game_count: games.len() as i32,
            computed_at: Utc::now(),
            standings,
        })
    }

    /// Computes the yearly standings across every game played that year
    ///
    /// Tournament and casual games count alike. The row set is the union of
    /// all currently registered players and everyone who scored that year,
    /// so departed players keep their history without polluting years they
    /// never played in.
    #[instrument(skip(self))]
    pub async fn year_standings(&self, year: i32) -> Result<YearStandingsResponse, AppError> {
        let games = self.game_repository.list_games_for_year(year).await?;
        let events = collect_events(&games);
        let display_names = self.display_names().await?;

        let mut roster: Vec<Uuid> = self
            .player_repository
            .list_players(false)
            .await?
            .into_iter()
            .map(|player| player.id)
            .collect();
        for game in &games {
            for player_id in game.player_ids() {
                if !roster.contains(&player_id) {
                    roster.push(player_id);
                }
            }
        }

        let standings = build_rows(&roster, &events, &display_names);

        info!(
            year,
            game_count = games.len(),
            event_count = events.len(),
            row_count = standings.len(),
            "Yearly standings computed"
        );

        Ok(YearStandingsResponse {
            year,
            game_count: games.len() as i32,
            computed_at: Utc::now(),
            standings,
        })
    }
}
