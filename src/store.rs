use std::path::{Path, PathBuf};

use log::debug;
use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::model::{
    ActionStat, Evaluation, Game, GameLineup, GameVideo, Player, RosterEntry, Team, Tournament,
    Venue, VenuePitch, VideoStatus,
};

/// Referential integrity between tables is maintained here, not by SQLite:
/// foreign keys are declared as plain indexed columns and every cascade runs
/// inside a single transaction.
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        init_schema(&conn)?;
        debug!("opened store at {}", path.display());
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn, path: None })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

pub fn init_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = OFF;
        CREATE TABLE IF NOT EXISTS player (
            id BLOB PRIMARY KEY,
            unique_id TEXT NOT NULL UNIQUE,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            birthdate TEXT NOT NULL,
            nation TEXT NOT NULL,
            plays_in TEXT NULL,
            position TEXT NULL,
            club TEXT NULL,
            level TEXT NULL,
            height TEXT NULL,
            foot TEXT NULL,
            note TEXT NULL,
            photo_data TEXT NULL,
            shortlisted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS venue (
            id BLOB PRIMARY KEY,
            name TEXT NOT NULL,
            address TEXT NULL,
            home_club TEXT NULL,
            contact TEXT NULL,
            price TEXT NULL,
            note TEXT NULL,
            photo_data TEXT NULL
        );

        CREATE TABLE IF NOT EXISTS venue_pitch (
            id BLOB PRIMARY KEY,
            venue_id BLOB NOT NULL,
            label TEXT NOT NULL,
            surface TEXT NULL,
            lights INTEGER NULL
        );
        CREATE INDEX IF NOT EXISTS idx_venue_pitch_venue ON venue_pitch(venue_id);

        CREATE TABLE IF NOT EXISTS tournament (
            id BLOB PRIMARY KEY,
            unique_id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            country TEXT NOT NULL,
            start_date TEXT NULL,
            end_date TEXT NULL,
            note TEXT NULL,
            venue_id BLOB NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_tournament_venue ON tournament(venue_id);

        CREATE TABLE IF NOT EXISTS tournament_participant (
            id BLOB PRIMARY KEY,
            tournament_id BLOB NOT NULL,
            player_id BLOB NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_participant_tournament ON tournament_participant(tournament_id);
        CREATE INDEX IF NOT EXISTS idx_participant_player ON tournament_participant(player_id);

        CREATE TABLE IF NOT EXISTS team (
            id BLOB PRIMARY KEY,
            unique_id TEXT NOT NULL UNIQUE,
            tournament_id BLOB NOT NULL,
            name TEXT NOT NULL,
            kit_color TEXT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_team_tournament ON team(tournament_id);

        CREATE TABLE IF NOT EXISTS roster_entry (
            id BLOB PRIMARY KEY,
            team_id BLOB NOT NULL,
            player_id BLOB NOT NULL,
            number TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_roster_team ON roster_entry(team_id);
        CREATE INDEX IF NOT EXISTS idx_roster_player ON roster_entry(player_id);

        CREATE TABLE IF NOT EXISTS game (
            id BLOB PRIMARY KEY,
            tournament_id BLOB NOT NULL,
            team_a_id BLOB NOT NULL,
            team_b_id BLOB NULL,
            kickoff TEXT NULL,
            kit_a TEXT NULL,
            kit_b TEXT NULL,
            note TEXT NULL,
            pitch_id BLOB NULL
        );
        CREATE INDEX IF NOT EXISTS idx_game_tournament ON game(tournament_id);
        CREATE INDEX IF NOT EXISTS idx_game_team_a ON game(team_a_id);
        CREATE INDEX IF NOT EXISTS idx_game_team_b ON game(team_b_id);
        CREATE INDEX IF NOT EXISTS idx_game_pitch ON game(pitch_id);

        CREATE TABLE IF NOT EXISTS game_lineup (
            id BLOB PRIMARY KEY,
            game_id BLOB NOT NULL,
            player_id BLOB NOT NULL,
            team_id BLOB NOT NULL,
            number TEXT NOT NULL,
            kit TEXT NULL,
            position TEXT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_lineup_game ON game_lineup(game_id);
        CREATE INDEX IF NOT EXISTS idx_lineup_player ON game_lineup(player_id);
        CREATE INDEX IF NOT EXISTS idx_lineup_team ON game_lineup(team_id);

        CREATE TABLE IF NOT EXISTS game_video (
            id BLOB PRIMARY KEY,
            game_id BLOB NOT NULL,
            name TEXT NOT NULL,
            status TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_video_game ON game_video(game_id);

        CREATE TABLE IF NOT EXISTS evaluation (
            id BLOB PRIMARY KEY,
            event_id BLOB NOT NULL,
            player_id BLOB NOT NULL,
            scout_name TEXT NOT NULL,
            rating_technique INTEGER NOT NULL,
            rating_physical INTEGER NOT NULL,
            rating_intelligence INTEGER NOT NULL,
            rating_mentality INTEGER NOT NULL,
            rating_impact INTEGER NOT NULL,
            strengths TEXT NULL,
            weaknesses TEXT NULL,
            remarks TEXT NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_evaluation_player ON evaluation(player_id);
        CREATE INDEX IF NOT EXISTS idx_evaluation_event ON evaluation(event_id);

        CREATE TABLE IF NOT EXISTS action_stat (
            id BLOB PRIMARY KEY,
            event_id BLOB NOT NULL,
            player_id BLOB NOT NULL,
            minutes INTEGER NOT NULL,
            shots INTEGER NOT NULL,
            passes INTEGER NOT NULL,
            duels INTEGER NOT NULL,
            goals INTEGER NOT NULL,
            assists INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_action_stat_player ON action_stat(player_id);
        CREATE INDEX IF NOT EXISTS idx_action_stat_event ON action_stat(event_id);
        "#,
    )?;
    Ok(())
}

pub(crate) const PLAYER_REFERENCING_TABLES: [&str; 5] = [
    "roster_entry",
    "tournament_participant",
    "evaluation",
    "action_stat",
    "game_lineup",
];

pub(crate) fn row_exists(conn: &Connection, table: &str, id: Uuid) -> StoreResult<bool> {
    let sql = format!("SELECT 1 FROM {table} WHERE id = ?1");
    let found = conn
        .query_row(&sql, params![id], |_| Ok(()))
        .optional()?
        .is_some();
    Ok(found)
}

pub(crate) fn ensure_ref(
    conn: &Connection,
    table: &str,
    entity: &'static str,
    id: Uuid,
) -> StoreResult<()> {
    if row_exists(conn, table, id)? {
        Ok(())
    } else {
        Err(StoreError::InvalidReference { entity, id })
    }
}

pub(crate) fn delete_where(
    conn: &Connection,
    table: &str,
    column: &str,
    id: Uuid,
) -> StoreResult<usize> {
    let sql = format!("DELETE FROM {table} WHERE {column} = ?1");
    Ok(conn.execute(&sql, params![id])?)
}

pub(crate) fn delete_games(conn: &Connection, game_ids: &[Uuid]) -> StoreResult<(usize, usize, usize)> {
    let mut lineups = 0usize;
    let mut videos = 0usize;
    let mut games = 0usize;
    for game_id in game_ids {
        lineups += delete_where(conn, "game_lineup", "game_id", *game_id)?;
        videos += delete_where(conn, "game_video", "game_id", *game_id)?;
        games += delete_where(conn, "game", "id", *game_id)?;
    }
    Ok((games, lineups, videos))
}

pub(crate) fn collect_ids(conn: &Connection, sql: &str, id: Uuid) -> StoreResult<Vec<Uuid>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![id], |row| row.get::<_, Uuid>(0))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub(crate) const PLAYER_COLUMNS: &str = "id, unique_id, first_name, last_name, birthdate, nation, \
     plays_in, position, club, level, height, foot, note, photo_data, shortlisted, created_at";

pub(crate) fn player_from_row(row: &Row<'_>) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        unique_id: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        birthdate: row.get(4)?,
        nation: row.get(5)?,
        plays_in: row.get(6)?,
        position: row.get(7)?,
        club: row.get(8)?,
        level: row.get(9)?,
        height: row.get(10)?,
        foot: row.get(11)?,
        note: row.get(12)?,
        photo_data: row.get(13)?,
        shortlisted: row.get(14)?,
        created_at: row.get(15)?,
    })
}

pub(crate) const TOURNAMENT_COLUMNS: &str =
    "id, unique_id, name, country, start_date, end_date, note, venue_id, created_at";

pub(crate) fn tournament_from_row(row: &Row<'_>) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        unique_id: row.get(1)?,
        name: row.get(2)?,
        country: row.get(3)?,
        start: row.get(4)?,
        end: row.get(5)?,
        note: row.get(6)?,
        venue_id: row.get(7)?,
        created_at: row.get(8)?,
    })
}

pub(crate) const TEAM_COLUMNS: &str = "id, unique_id, tournament_id, name, kit_color";

pub(crate) fn team_from_row(row: &Row<'_>) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        unique_id: row.get(1)?,
        tournament_id: row.get(2)?,
        name: row.get(3)?,
        kit_color: row.get(4)?,
    })
}

pub(crate) const ROSTER_COLUMNS: &str = "id, team_id, player_id, number";

pub(crate) fn roster_from_row(row: &Row<'_>) -> rusqlite::Result<RosterEntry> {
    Ok(RosterEntry {
        id: row.get(0)?,
        team_id: row.get(1)?,
        player_id: row.get(2)?,
        number: row.get(3)?,
    })
}

pub(crate) const GAME_COLUMNS: &str =
    "id, tournament_id, team_a_id, team_b_id, kickoff, kit_a, kit_b, note, pitch_id";

pub(crate) fn game_from_row(row: &Row<'_>) -> rusqlite::Result<Game> {
    Ok(Game {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        team_a_id: row.get(2)?,
        team_b_id: row.get(3)?,
        kickoff: row.get(4)?,
        kit_a: row.get(5)?,
        kit_b: row.get(6)?,
        note: row.get(7)?,
        pitch_id: row.get(8)?,
    })
}

pub(crate) const LINEUP_COLUMNS: &str = "id, game_id, player_id, team_id, number, kit, position";

pub(crate) fn lineup_from_row(row: &Row<'_>) -> rusqlite::Result<GameLineup> {
    Ok(GameLineup {
        id: row.get(0)?,
        game_id: row.get(1)?,
        player_id: row.get(2)?,
        team_id: row.get(3)?,
        number: row.get(4)?,
        kit: row.get(5)?,
        position: row.get(6)?,
    })
}

pub(crate) const VIDEO_COLUMNS: &str = "id, game_id, name, status";

pub(crate) fn video_from_row(row: &Row<'_>) -> rusqlite::Result<GameVideo> {
    let raw_status: String = row.get(3)?;
    let status = raw_status.parse::<VideoStatus>().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            err.into(),
        )
    })?;
    Ok(GameVideo {
        id: row.get(0)?,
        game_id: row.get(1)?,
        name: row.get(2)?,
        status,
    })
}

pub(crate) const VENUE_COLUMNS: &str =
    "id, name, address, home_club, contact, price, note, photo_data";

pub(crate) fn venue_from_row(row: &Row<'_>) -> rusqlite::Result<Venue> {
    Ok(Venue {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        home_club: row.get(3)?,
        contact: row.get(4)?,
        price: row.get(5)?,
        note: row.get(6)?,
        photo_data: row.get(7)?,
    })
}

pub(crate) const PITCH_COLUMNS: &str = "id, venue_id, label, surface, lights";

pub(crate) fn pitch_from_row(row: &Row<'_>) -> rusqlite::Result<VenuePitch> {
    Ok(VenuePitch {
        id: row.get(0)?,
        venue_id: row.get(1)?,
        label: row.get(2)?,
        surface: row.get(3)?,
        lights: row.get(4)?,
    })
}

pub(crate) const EVALUATION_COLUMNS: &str = "id, event_id, player_id, scout_name, \
     rating_technique, rating_physical, rating_intelligence, rating_mentality, rating_impact, \
     strengths, weaknesses, remarks, created_at";

pub(crate) fn evaluation_from_row(row: &Row<'_>) -> rusqlite::Result<Evaluation> {
    Ok(Evaluation {
        id: row.get(0)?,
        event_id: row.get(1)?,
        player_id: row.get(2)?,
        scout_name: row.get(3)?,
        rating_technique: row.get(4)?,
        rating_physical: row.get(5)?,
        rating_intelligence: row.get(6)?,
        rating_mentality: row.get(7)?,
        rating_impact: row.get(8)?,
        strengths: row.get(9)?,
        weaknesses: row.get(10)?,
        remarks: row.get(11)?,
        created_at: row.get(12)?,
    })
}

pub(crate) const ACTION_STAT_COLUMNS: &str =
    "id, event_id, player_id, minutes, shots, passes, duels, goals, assists";

pub(crate) fn action_stat_from_row(row: &Row<'_>) -> rusqlite::Result<ActionStat> {
    Ok(ActionStat {
        id: row.get(0)?,
        event_id: row.get(1)?,
        player_id: row.get(2)?,
        minutes: row.get(3)?,
        shots: row.get(4)?,
        passes: row.get(5)?,
        duels: row.get(6)?,
        goals: row.get(7)?,
        assists: row.get(8)?,
    })
}
