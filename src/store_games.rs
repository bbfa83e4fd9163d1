use log::info;
use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::model::{Game, GameInput, GameVideo, LineupEntry, Tournament, VideoInput};
use crate::read_model::{self, TournamentView};
use crate::store::{
    GAME_COLUMNS, PITCH_COLUMNS, Store, delete_games, delete_where, ensure_ref, game_from_row,
    pitch_from_row,
};
use crate::store_tournaments::load_team;

impl Store {
    pub fn create_game(&mut self, tournament_id: Uuid, input: GameInput) -> StoreResult<TournamentView> {
        let tx = self.connection_mut().transaction()?;
        let tournament = read_model::load_tournament(&tx, tournament_id)?;
        validate_game_input(&tx, &tournament, &input)?;
        let game = Game {
            id: Uuid::new_v4(),
            tournament_id,
            team_a_id: input.team_a_id,
            team_b_id: Some(input.team_b_id.unwrap_or(input.team_a_id)),
            kickoff: input.kickoff,
            kit_a: input.kit_a,
            kit_b: input.kit_b,
            note: input.note,
            pitch_id: input.pitch_id,
        };
        tx.execute(
            "INSERT INTO game (
                id, tournament_id, team_a_id, team_b_id, kickoff, kit_a, kit_b, note, pitch_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                game.id,
                game.tournament_id,
                game.team_a_id,
                game.team_b_id,
                game.kickoff,
                game.kit_a,
                game.kit_b,
                game.note,
                game.pitch_id,
            ],
        )?;
        let view = read_model::tournament_view(&tx, &tournament)?;
        tx.commit()?;
        info!("created game {} in tournament {tournament_id}", game.id);
        Ok(view)
    }

    /// Replaces every field of a game. A missing team B falls back to team A.
    pub fn update_game(
        &mut self,
        tournament_id: Uuid,
        game_id: Uuid,
        input: GameInput,
    ) -> StoreResult<Game> {
        let tx = self.connection_mut().transaction()?;
        let mut game = load_game(&tx, tournament_id, game_id)?;
        let tournament = read_model::load_tournament(&tx, tournament_id)?;
        validate_game_input(&tx, &tournament, &input)?;
        game.team_a_id = input.team_a_id;
        game.team_b_id = Some(input.team_b_id.unwrap_or(input.team_a_id));
        game.kickoff = input.kickoff;
        game.kit_a = input.kit_a;
        game.kit_b = input.kit_b;
        game.note = input.note;
        game.pitch_id = input.pitch_id;
        tx.execute(
            "UPDATE game SET
                team_a_id = ?2, team_b_id = ?3, kickoff = ?4, kit_a = ?5, kit_b = ?6,
                note = ?7, pitch_id = ?8
             WHERE id = ?1",
            params![
                game.id,
                game.team_a_id,
                game.team_b_id,
                game.kickoff,
                game.kit_a,
                game.kit_b,
                game.note,
                game.pitch_id,
            ],
        )?;
        tx.commit()?;
        info!("updated game {game_id}");
        Ok(game)
    }

    pub fn list_games(&self, tournament_id: Uuid) -> StoreResult<Vec<Game>> {
        read_model::list_games(self.connection(), tournament_id)
    }

    pub fn get_game(&self, tournament_id: Uuid, game_id: Uuid) -> StoreResult<read_model::GameView> {
        let game = load_game(self.connection(), tournament_id, game_id)?;
        read_model::game_view(self.connection(), game)
    }

    pub fn replace_lineup(
        &mut self,
        tournament_id: Uuid,
        game_id: Uuid,
        lineup: Vec<LineupEntry>,
    ) -> StoreResult<usize> {
        let tx = self.connection_mut().transaction()?;
        load_game(&tx, tournament_id, game_id)?;
        delete_where(&tx, "game_lineup", "game_id", game_id)?;
        for entry in &lineup {
            ensure_ref(&tx, "player", "player", entry.player_id)?;
            ensure_ref(&tx, "team", "team", entry.team_id)?;
            tx.execute(
                "INSERT INTO game_lineup (id, game_id, player_id, team_id, number, kit, position)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    Uuid::new_v4(),
                    game_id,
                    entry.player_id,
                    entry.team_id,
                    entry.number,
                    entry.kit,
                    entry.position,
                ],
            )?;
        }
        tx.commit()?;
        info!("game {game_id} lineup replaced: {} entries", lineup.len());
        Ok(lineup.len())
    }

    pub fn add_video(
        &mut self,
        tournament_id: Uuid,
        game_id: Uuid,
        input: VideoInput,
    ) -> StoreResult<GameVideo> {
        load_game(self.connection(), tournament_id, game_id)?;
        let video = GameVideo {
            id: Uuid::new_v4(),
            game_id,
            name: input.name,
            status: input.status,
        };
        self.connection().execute(
            "INSERT INTO game_video (id, game_id, name, status) VALUES (?1, ?2, ?3, ?4)",
            params![video.id, video.game_id, video.name, video.status.as_str()],
        )?;
        info!("game {game_id}: video {} ({})", video.name, video.status);
        Ok(video)
    }

    pub fn delete_game(&mut self, tournament_id: Uuid, game_id: Uuid) -> StoreResult<()> {
        let tx = self.connection_mut().transaction()?;
        load_game(&tx, tournament_id, game_id)?;
        let (_, lineups, videos) = delete_games(&tx, &[game_id])?;
        tx.commit()?;
        info!("deleted game {game_id}: lineups={lineups} videos={videos}");
        Ok(())
    }
}

fn load_game(conn: &Connection, tournament_id: Uuid, game_id: Uuid) -> StoreResult<Game> {
    let sql = format!("SELECT {GAME_COLUMNS} FROM game WHERE id = ?1");
    match conn
        .query_row(&sql, params![game_id], game_from_row)
        .optional()?
    {
        Some(game) if game.tournament_id == tournament_id => Ok(game),
        _ => Err(StoreError::not_found("Game", game_id)),
    }
}

fn validate_game_input(conn: &Connection, tournament: &Tournament, input: &GameInput) -> StoreResult<()> {
    if let Some(kickoff) = input.kickoff
        && let (Some(start), Some(end)) = (tournament.start, tournament.end)
        && !tournament.accepts_kickoff(kickoff)
    {
        return Err(StoreError::KickoffOutOfRange {
            kickoff,
            start,
            end,
        });
    }

    if let Some(pitch_id) = input.pitch_id {
        let sql = format!("SELECT {PITCH_COLUMNS} FROM venue_pitch WHERE id = ?1");
        let pitch = conn
            .query_row(&sql, params![pitch_id], pitch_from_row)
            .optional()?;
        let valid = match (pitch, tournament.venue_id) {
            (None, _) => false,
            (Some(pitch), Some(venue_id)) => pitch.venue_id == venue_id,
            (Some(_), None) => true,
        };
        if !valid {
            return Err(StoreError::InvalidPitch { pitch_id });
        }
    }

    for team_id in [Some(input.team_a_id), input.team_b_id].into_iter().flatten() {
        load_team(conn, tournament.id, team_id).map_err(|err| match err {
            StoreError::NotFound { id, .. } => StoreError::InvalidReference { entity: "team", id },
            other => other,
        })?;
    }
    Ok(())
}
