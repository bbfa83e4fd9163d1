use std::collections::HashSet;

use chrono::Utc;
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::model::{
    NewTeam, NewTournament, RosterSlot, Team, TeamUpdate, Tournament, TournamentUpdate,
    new_unique_id,
};
use crate::read_model::{self, TournamentView};
use crate::store::{
    Store, TEAM_COLUMNS, TOURNAMENT_COLUMNS, collect_ids, delete_games, delete_where, ensure_ref,
    team_from_row, tournament_from_row,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentDeletion {
    pub id: Uuid,
    pub participants: usize,
    pub games: usize,
    pub lineups: usize,
    pub videos: usize,
    pub teams: usize,
    pub roster_entries: usize,
}

impl Store {
    pub fn create_tournament(&mut self, input: NewTournament) -> StoreResult<TournamentView> {
        let tx = self.connection_mut().transaction()?;
        if let Some(venue_id) = input.venue_id {
            ensure_ref(&tx, "venue", "venue", venue_id)?;
        }
        let tournament = Tournament {
            id: Uuid::new_v4(),
            unique_id: new_unique_id(),
            name: input.name,
            country: input.country.unwrap_or_default(),
            start: input.start,
            end: input.end,
            note: input.note,
            venue_id: input.venue_id,
            created_at: Utc::now(),
        };
        tx.execute(
            "INSERT INTO tournament (
                id, unique_id, name, country, start_date, end_date, note, venue_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                tournament.id,
                tournament.unique_id,
                tournament.name,
                tournament.country,
                tournament.start,
                tournament.end,
                tournament.note,
                tournament.venue_id,
                tournament.created_at,
            ],
        )?;
        if let Some(participants) = input.participants {
            insert_participants(&tx, tournament.id, &participants)?;
        }
        let view = read_model::tournament_view(&tx, &tournament)?;
        tx.commit()?;
        info!("created tournament {} ({})", tournament.id, tournament.name);
        Ok(view)
    }

    pub fn find_tournament(&self, tournament_id: Uuid) -> StoreResult<Option<Tournament>> {
        let sql = format!("SELECT {TOURNAMENT_COLUMNS} FROM tournament WHERE id = ?1");
        Ok(self
            .connection()
            .query_row(&sql, params![tournament_id], tournament_from_row)
            .optional()?)
    }

    pub fn get_tournament(&self, tournament_id: Uuid) -> StoreResult<TournamentView> {
        read_model::tournament_view_by_id(self.connection(), tournament_id)
    }

    pub fn list_tournaments(&self) -> StoreResult<Vec<TournamentView>> {
        let conn = self.connection();
        let sql = format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournament ORDER BY created_at DESC, rowid DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], tournament_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(read_model::tournament_view(conn, &row?)?);
        }
        Ok(out)
    }

    pub fn update_tournament(
        &mut self,
        tournament_id: Uuid,
        update: TournamentUpdate,
    ) -> StoreResult<TournamentView> {
        let tx = self.connection_mut().transaction()?;
        let mut tournament = read_model::load_tournament(&tx, tournament_id)?;
        if let Some(v) = update.name {
            tournament.name = v;
        }
        if let Some(v) = update.country {
            tournament.country = v;
        }
        if update.start.is_some() {
            tournament.start = update.start;
        }
        if update.end.is_some() {
            tournament.end = update.end;
        }
        if update.note.is_some() {
            tournament.note = update.note;
        }
        if let Some(venue_id) = update.venue_id {
            ensure_ref(&tx, "venue", "venue", venue_id)?;
            tournament.venue_id = Some(venue_id);
        }
        tx.execute(
            "UPDATE tournament SET
                name = ?2, country = ?3, start_date = ?4, end_date = ?5, note = ?6, venue_id = ?7
             WHERE id = ?1",
            params![
                tournament.id,
                tournament.name,
                tournament.country,
                tournament.start,
                tournament.end,
                tournament.note,
                tournament.venue_id,
            ],
        )?;
        let view = read_model::tournament_view(&tx, &tournament)?;
        tx.commit()?;
        info!("updated tournament {tournament_id}");
        Ok(view)
    }

    pub fn replace_participants(
        &mut self,
        tournament_id: Uuid,
        participants: Vec<Uuid>,
    ) -> StoreResult<TournamentView> {
        let tx = self.connection_mut().transaction()?;
        let tournament = read_model::load_tournament(&tx, tournament_id)?;
        let removed = delete_where(&tx, "tournament_participant", "tournament_id", tournament_id)?;
        let added = insert_participants(&tx, tournament_id, &participants)?;
        let view = read_model::tournament_view(&tx, &tournament)?;
        tx.commit()?;
        info!("tournament {tournament_id} participants replaced: removed={removed} added={added}");
        Ok(view)
    }

    /// Deletes a tournament with its participants, games (lineups, videos),
    /// teams and rosters. Evaluations and action stats recorded at the event
    /// are kept as scouting history.
    pub fn delete_tournament(&mut self, tournament_id: Uuid) -> StoreResult<TournamentDeletion> {
        let tx = self.connection_mut().transaction()?;
        read_model::load_tournament(&tx, tournament_id)?;

        let participants =
            delete_where(&tx, "tournament_participant", "tournament_id", tournament_id)?;
        let game_ids = collect_ids(
            &tx,
            "SELECT id FROM game WHERE tournament_id = ?1",
            tournament_id,
        )?;
        let (games, lineups, videos) = delete_games(&tx, &game_ids)?;

        let team_ids = collect_ids(
            &tx,
            "SELECT id FROM team WHERE tournament_id = ?1",
            tournament_id,
        )?;
        let mut roster_entries = 0usize;
        for team_id in &team_ids {
            roster_entries += delete_where(&tx, "roster_entry", "team_id", *team_id)?;
        }
        let teams = delete_where(&tx, "team", "tournament_id", tournament_id)?;
        delete_where(&tx, "tournament", "id", tournament_id)?;
        tx.commit()?;

        let summary = TournamentDeletion {
            id: tournament_id,
            participants,
            games,
            lineups,
            videos,
            teams,
            roster_entries,
        };
        info!(
            "deleted tournament {tournament_id}: teams={} roster={} games={} lineups={} videos={} participants={}",
            summary.teams,
            summary.roster_entries,
            summary.games,
            summary.lineups,
            summary.videos,
            summary.participants
        );
        Ok(summary)
    }

    /// Adds a team with an optional initial roster. A roster entry whose shirt
    /// number is already taken in the team is skipped.
    pub fn add_team(&mut self, tournament_id: Uuid, input: NewTeam) -> StoreResult<TournamentView> {
        let tx = self.connection_mut().transaction()?;
        let tournament = read_model::load_tournament(&tx, tournament_id)?;
        let team = Team {
            id: Uuid::new_v4(),
            unique_id: new_unique_id(),
            tournament_id,
            name: input.name,
            kit_color: input.kit_color,
        };
        tx.execute(
            "INSERT INTO team (id, unique_id, tournament_id, name, kit_color)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                team.id,
                team.unique_id,
                team.tournament_id,
                team.name,
                team.kit_color
            ],
        )?;

        let mut numbers = HashSet::new();
        for slot in &input.roster {
            if !numbers.insert(slot.number.as_str()) {
                debug!(
                    "team {}: shirt number {} already taken, skipping player {}",
                    team.id, slot.number, slot.player_id
                );
                continue;
            }
            insert_roster_slot(&tx, team.id, slot)?;
        }

        let view = read_model::tournament_view(&tx, &tournament)?;
        tx.commit()?;
        info!(
            "added team {} ({}) to tournament {tournament_id}",
            team.id, team.name
        );
        Ok(view)
    }

    pub fn update_team(
        &mut self,
        tournament_id: Uuid,
        team_id: Uuid,
        update: TeamUpdate,
    ) -> StoreResult<TournamentView> {
        let tx = self.connection_mut().transaction()?;
        let mut team = load_team(&tx, tournament_id, team_id)?;
        if let Some(v) = update.name {
            team.name = v;
        }
        if update.kit_color.is_some() {
            team.kit_color = update.kit_color;
        }
        tx.execute(
            "UPDATE team SET name = ?2, kit_color = ?3 WHERE id = ?1",
            params![team.id, team.name, team.kit_color],
        )?;
        let view = read_model::tournament_view_by_id(&tx, tournament_id)?;
        tx.commit()?;
        info!("updated team {team_id}");
        Ok(view)
    }

    pub fn replace_roster(
        &mut self,
        tournament_id: Uuid,
        team_id: Uuid,
        roster: Vec<RosterSlot>,
    ) -> StoreResult<TournamentView> {
        let tx = self.connection_mut().transaction()?;
        load_team(&tx, tournament_id, team_id)?;
        let removed = delete_where(&tx, "roster_entry", "team_id", team_id)?;
        for slot in &roster {
            insert_roster_slot(&tx, team_id, slot)?;
        }
        let view = read_model::tournament_view_by_id(&tx, tournament_id)?;
        tx.commit()?;
        info!(
            "team {team_id} roster replaced: removed={removed} added={}",
            roster.len()
        );
        Ok(view)
    }

    /// Deletes a team, its roster, and every game it plays in (with lineups
    /// and videos).
    pub fn delete_team(&mut self, tournament_id: Uuid, team_id: Uuid) -> StoreResult<TournamentView> {
        let tx = self.connection_mut().transaction()?;
        load_team(&tx, tournament_id, team_id)?;
        let roster_entries = delete_where(&tx, "roster_entry", "team_id", team_id)?;
        let game_ids = collect_ids(
            &tx,
            "SELECT id FROM game WHERE team_a_id = ?1 OR team_b_id = ?1",
            team_id,
        )?;
        let (games, lineups, videos) = delete_games(&tx, &game_ids)?;
        delete_where(&tx, "team", "id", team_id)?;
        let view = read_model::tournament_view_by_id(&tx, tournament_id)?;
        tx.commit()?;
        info!(
            "deleted team {team_id}: roster={roster_entries} games={games} lineups={lineups} videos={videos}"
        );
        Ok(view)
    }
}

pub(crate) fn load_team(conn: &Connection, tournament_id: Uuid, team_id: Uuid) -> StoreResult<Team> {
    let sql = format!("SELECT {TEAM_COLUMNS} FROM team WHERE id = ?1");
    match conn
        .query_row(&sql, params![team_id], team_from_row)
        .optional()?
    {
        Some(team) if team.tournament_id == tournament_id => Ok(team),
        _ => Err(StoreError::not_found("Team", team_id)),
    }
}

fn insert_participants(
    conn: &Connection,
    tournament_id: Uuid,
    participants: &[Uuid],
) -> StoreResult<usize> {
    let mut seen = HashSet::new();
    for player_id in participants {
        if !seen.insert(*player_id) {
            continue;
        }
        ensure_ref(conn, "player", "player", *player_id)?;
        conn.execute(
            "INSERT INTO tournament_participant (id, tournament_id, player_id) VALUES (?1, ?2, ?3)",
            params![Uuid::new_v4(), tournament_id, player_id],
        )?;
    }
    Ok(seen.len())
}

fn insert_roster_slot(conn: &Connection, team_id: Uuid, slot: &RosterSlot) -> StoreResult<()> {
    ensure_ref(conn, "player", "player", slot.player_id)?;
    conn.execute(
        "INSERT INTO roster_entry (id, team_id, player_id, number) VALUES (?1, ?2, ?3, ?4)",
        params![Uuid::new_v4(), team_id, slot.player_id, slot.number],
    )?;
    Ok(())
}
