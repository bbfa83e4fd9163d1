use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::model::{Game, GameLineup, GameVideo, RosterSlot, Team, Tournament, Venue, VenuePitch};
use crate::store::{
    GAME_COLUMNS, LINEUP_COLUMNS, PITCH_COLUMNS, ROSTER_COLUMNS, TEAM_COLUMNS, TOURNAMENT_COLUMNS,
    VENUE_COLUMNS, VIDEO_COLUMNS, game_from_row, lineup_from_row, pitch_from_row, roster_from_row,
    team_from_row, tournament_from_row, venue_from_row, video_from_row,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    pub id: Uuid,
    pub unique_id: String,
    pub name: String,
    pub kit_color: Option<String>,
    pub roster: Vec<RosterSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineupView {
    pub player_id: Uuid,
    pub team_id: Uuid,
    pub number: String,
    pub kit: Option<String>,
    pub position: Option<String>,
}

impl From<GameLineup> for LineupView {
    fn from(row: GameLineup) -> Self {
        Self {
            player_id: row.player_id,
            team_id: row.team_id,
            number: row.number,
            kit: row.kit,
            position: row.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    #[serde(flatten)]
    pub game: Game,
    pub lineup: Vec<LineupView>,
    pub videos: Vec<GameVideo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueView {
    #[serde(flatten)]
    pub venue: Venue,
    pub pitches: Vec<VenuePitch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentView {
    pub id: Uuid,
    pub unique_id: String,
    pub name: String,
    pub country: String,
    pub start: Option<chrono::NaiveDate>,
    pub end: Option<chrono::NaiveDate>,
    pub note: Option<String>,
    pub teams: Vec<TeamView>,
    pub participants: Vec<Uuid>,
    pub games: Vec<GameView>,
    pub venue: Option<VenueView>,
}

impl TournamentView {
    pub fn team(&self, team_id: Uuid) -> Option<&TeamView> {
        self.teams.iter().find(|t| t.id == team_id)
    }
}

pub fn load_tournament(conn: &Connection, tournament_id: Uuid) -> StoreResult<Tournament> {
    let sql = format!("SELECT {TOURNAMENT_COLUMNS} FROM tournament WHERE id = ?1");
    conn.query_row(&sql, params![tournament_id], tournament_from_row)
        .optional()?
        .ok_or(StoreError::not_found("Tournament", tournament_id))
}

pub fn tournament_view(conn: &Connection, tournament: &Tournament) -> StoreResult<TournamentView> {
    let teams = list_teams(conn, tournament.id)?
        .into_iter()
        .map(|team| team_view(conn, team))
        .collect::<StoreResult<Vec<_>>>()?;

    let participants = {
        let mut stmt = conn.prepare(
            "SELECT player_id FROM tournament_participant WHERE tournament_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![tournament.id], |row| row.get::<_, Uuid>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        out
    };

    let games = list_games(conn, tournament.id)?
        .into_iter()
        .map(|game| game_view(conn, game))
        .collect::<StoreResult<Vec<_>>>()?;

    let venue = match tournament.venue_id {
        Some(venue_id) => find_venue(conn, venue_id)?
            .map(|venue| venue_view(conn, venue))
            .transpose()?,
        None => None,
    };

    Ok(TournamentView {
        id: tournament.id,
        unique_id: tournament.unique_id.clone(),
        name: tournament.name.clone(),
        country: tournament.country.clone(),
        start: tournament.start,
        end: tournament.end,
        note: tournament.note.clone(),
        teams,
        participants,
        games,
        venue,
    })
}

pub fn tournament_view_by_id(conn: &Connection, tournament_id: Uuid) -> StoreResult<TournamentView> {
    let tournament = load_tournament(conn, tournament_id)?;
    tournament_view(conn, &tournament)
}

pub fn team_view(conn: &Connection, team: Team) -> StoreResult<TeamView> {
    let sql = format!("SELECT {ROSTER_COLUMNS} FROM roster_entry WHERE team_id = ?1 ORDER BY rowid");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![team.id], roster_from_row)?;
    let mut roster = Vec::new();
    for row in rows {
        let entry = row?;
        roster.push(RosterSlot {
            player_id: entry.player_id,
            number: entry.number,
        });
    }
    Ok(TeamView {
        id: team.id,
        unique_id: team.unique_id,
        name: team.name,
        kit_color: team.kit_color,
        roster,
    })
}

pub fn game_view(conn: &Connection, game: Game) -> StoreResult<GameView> {
    let lineup = {
        let sql = format!("SELECT {LINEUP_COLUMNS} FROM game_lineup WHERE game_id = ?1 ORDER BY rowid");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![game.id], lineup_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(LineupView::from(row?));
        }
        out
    };
    let videos = {
        let sql = format!("SELECT {VIDEO_COLUMNS} FROM game_video WHERE game_id = ?1 ORDER BY rowid");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![game.id], video_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        out
    };
    Ok(GameView {
        game,
        lineup,
        videos,
    })
}

pub fn venue_view(conn: &Connection, venue: Venue) -> StoreResult<VenueView> {
    let sql = format!("SELECT {PITCH_COLUMNS} FROM venue_pitch WHERE venue_id = ?1 ORDER BY rowid");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![venue.id], pitch_from_row)?;
    let mut pitches = Vec::new();
    for row in rows {
        pitches.push(row?);
    }
    Ok(VenueView { venue, pitches })
}

pub fn list_teams(conn: &Connection, tournament_id: Uuid) -> StoreResult<Vec<Team>> {
    let sql = format!("SELECT {TEAM_COLUMNS} FROM team WHERE tournament_id = ?1 ORDER BY rowid");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![tournament_id], team_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn list_games(conn: &Connection, tournament_id: Uuid) -> StoreResult<Vec<Game>> {
    let sql = format!("SELECT {GAME_COLUMNS} FROM game WHERE tournament_id = ?1 ORDER BY rowid");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![tournament_id], game_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn find_venue(conn: &Connection, venue_id: Uuid) -> StoreResult<Option<Venue>> {
    let sql = format!("SELECT {VENUE_COLUMNS} FROM venue WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![venue_id], venue_from_row)
        .optional()?)
}
